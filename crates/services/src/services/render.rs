//! Table and card projections of one render model.
//!
//! Wide viewports get a column-per-slot table; narrow viewports get a
//! card strip with per-category sections. Both are derived cell-for-cell
//! from the same formatted rows, so the text a user sees never differs
//! between breakpoints.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::comparison::{MAX_SLOTS, RenderModel, SlotHeader};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TableRow {
    pub key: String,
    pub label: String,
    /// One cell per column, in column order.
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TableGroup {
    pub key: String,
    pub title: String,
    pub has_any_value: bool,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TableLayout {
    pub columns: Vec<SlotHeader>,
    /// Trailing empty columns rendered as "add product" affordances.
    pub open_slots: usize,
    pub groups: Vec<TableGroup>,
}

impl TableLayout {
    pub fn project(model: &RenderModel) -> Self {
        Self {
            columns: model.slots.clone(),
            open_slots: MAX_SLOTS - model.slots.len(),
            groups: model
                .categories
                .iter()
                .map(|category| TableGroup {
                    key: category.key.clone(),
                    title: category.title.clone(),
                    has_any_value: category.has_any_value,
                    rows: category
                        .rows
                        .iter()
                        .map(|row| TableRow {
                            key: row.key.clone(),
                            label: row.label.clone(),
                            cells: row.values.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CardValue {
    pub slot_id: Uuid,
    pub slot_name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CardEntry {
    pub key: String,
    pub label: String,
    /// Every slot's value stacked, in slot order.
    pub values: Vec<CardValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CardSection {
    pub key: String,
    pub title: String,
    pub has_any_value: bool,
    pub entries: Vec<CardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CardLayout {
    /// Horizontally scrollable strip for slot selection and removal.
    pub cards: Vec<SlotHeader>,
    pub open_slots: usize,
    pub sections: Vec<CardSection>,
}

impl CardLayout {
    pub fn project(model: &RenderModel) -> Self {
        Self {
            cards: model.slots.clone(),
            open_slots: MAX_SLOTS - model.slots.len(),
            sections: model
                .categories
                .iter()
                .map(|category| CardSection {
                    key: category.key.clone(),
                    title: category.title.clone(),
                    has_any_value: category.has_any_value,
                    entries: category
                        .rows
                        .iter()
                        .map(|row| CardEntry {
                            key: row.key.clone(),
                            label: row.label.clone(),
                            values: row
                                .values
                                .iter()
                                .zip(&model.slots)
                                .map(|(value, slot)| CardValue {
                                    slot_id: slot.id,
                                    slot_name: slot.name.clone(),
                                    value: value.clone(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
