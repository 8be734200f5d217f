//! Comparison slots and the normalized render projection.
//!
//! A session holds one to three records of a single kind. The anchor
//! (slot 0) seeds the session and stays pinned; additional slots come
//! and go. Slot order is insertion order and is never reordered by
//! late-arriving data.

use db::models::product::CatalogProduct;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::{
    formatter::{self, format_field},
    reviews::ReviewLookup,
    taxonomy::SpecCategory,
};

pub const MAX_SLOTS: usize = 3;

/// Why an `add` was refused. Refused adds leave the slots untouched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AddRejection {
    MaxSlots,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionPhase {
    /// One slot: the anchor alone.
    Seeded,
    /// Two or three slots.
    Comparing,
}

#[derive(Debug, Clone)]
pub struct ComparisonSession<P> {
    slots: Vec<P>,
    anchor_id: Uuid,
}

impl<P: CatalogProduct> ComparisonSession<P> {
    pub fn new(anchor: P) -> Self {
        let anchor_id = anchor.id();
        Self {
            slots: vec![anchor],
            anchor_id,
        }
    }

    pub fn anchor_id(&self) -> Uuid {
        self.anchor_id
    }

    pub fn slots(&self) -> &[P] {
        &self.slots
    }

    pub fn product_ids(&self) -> Vec<Uuid> {
        self.slots.iter().map(|p| p.id()).collect()
    }

    pub fn open_slots(&self) -> usize {
        MAX_SLOTS - self.slots.len()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.slots.len() >= 2 {
            SessionPhase::Comparing
        } else {
            SessionPhase::Seeded
        }
    }

    pub fn add(&mut self, product: P) -> Result<(), AddRejection> {
        if self.slots.len() >= MAX_SLOTS {
            return Err(AddRejection::MaxSlots);
        }
        if self.slots.iter().any(|s| s.id() == product.id()) {
            return Err(AddRejection::Duplicate);
        }
        self.slots.push(product);
        Ok(())
    }

    /// Removes the slot with the given id. The anchor is pinned for the
    /// session's lifetime, so removing it (or the id of a product not
    /// present) is a no-op returning false.
    pub fn remove(&mut self, id: Uuid) -> bool {
        if id == self.anchor_id {
            return false;
        }
        let before = self.slots.len();
        self.slots.retain(|s| s.id() != id);
        self.slots.len() != before
    }

    /// Projects every slot through the taxonomy into formatted rows.
    /// Categories with no data across all slots are still emitted: the
    /// comparison keeps the same shape regardless of slot count.
    pub fn to_render_model(
        &self,
        taxonomy: &[SpecCategory<P>],
        reviews: &ReviewLookup,
    ) -> RenderModel {
        let slots = self
            .slots
            .iter()
            .map(|p| SlotHeader {
                id: p.id(),
                name: p.name().to_string(),
                brand: p.brand().to_string(),
                price_label: formatter::format_price(p.price()),
                image_url: p.image_url().map(str::to_string),
                removable: p.id() != self.anchor_id,
            })
            .collect();

        let categories = taxonomy
            .iter()
            .map(|category| {
                let rows: Vec<RenderRow> = category
                    .specs
                    .iter()
                    .map(|field| RenderRow {
                        key: field.key.to_string(),
                        label: field.title.to_string(),
                        values: self
                            .slots
                            .iter()
                            .map(|product| format_field(field, product, reviews.get(product.id())))
                            .collect(),
                    })
                    .collect();
                let has_any_value = rows
                    .iter()
                    .any(|row| row.values.iter().any(|v| !formatter::is_sentinel(v)));
                RenderCategory {
                    key: category.key.to_string(),
                    title: category.title.to_string(),
                    has_any_value,
                    rows,
                }
            })
            .collect();

        RenderModel { slots, categories }
    }
}

/// Per-slot header shown above the spec rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct SlotHeader {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub price_label: String,
    pub image_url: Option<String>,
    pub removable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct RenderRow {
    pub key: String,
    pub label: String,
    /// One formatted value per slot, in slot order.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct RenderCategory {
    pub key: String,
    pub title: String,
    /// Whether any slot carries real data in this category.
    pub has_any_value: bool,
    pub rows: Vec<RenderRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct RenderModel {
    pub slots: Vec<SlotHeader>,
    pub categories: Vec<RenderCategory>,
}
