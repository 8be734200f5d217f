//! Category/field tables that project sparse catalog records into a
//! fixed display structure. Order here is display order; adding an
//! attribute to the comparison view is a single entry in these tables.

use db::models::{laptop_product::LaptopProduct, mobile_product::MobileProduct};
use once_cell::sync::Lazy;

/// A raw attribute value lifted off a record, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Text(String),
    Flag(bool),
    List(Vec<String>),
    Amount(i64),
}

/// Editorial fields joined from the review store rather than read off
/// the product record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpertField {
    Rating,
    Verdict,
}

/// Where a field's display value comes from.
pub enum FieldSource<P> {
    Attr(fn(&P) -> FieldValue),
    Expert(ExpertField),
}

pub struct SpecField<P> {
    pub key: &'static str,
    pub title: &'static str,
    pub source: FieldSource<P>,
}

pub struct SpecCategory<P> {
    pub key: &'static str,
    pub title: &'static str,
    pub specs: Vec<SpecField<P>>,
}

fn attr<P>(key: &'static str, title: &'static str, read: fn(&P) -> FieldValue) -> SpecField<P> {
    SpecField {
        key,
        title,
        source: FieldSource::Attr(read),
    }
}

fn expert<P>(key: &'static str, title: &'static str, field: ExpertField) -> SpecField<P> {
    SpecField {
        key,
        title,
        source: FieldSource::Expert(field),
    }
}

fn text(value: &Option<String>) -> FieldValue {
    match value.as_deref() {
        Some(s) => FieldValue::Text(s.to_string()),
        None => FieldValue::Missing,
    }
}

fn flag(value: Option<bool>) -> FieldValue {
    value.map(FieldValue::Flag).unwrap_or(FieldValue::Missing)
}

static MOBILE_TAXONOMY: Lazy<Vec<SpecCategory<MobileProduct>>> = Lazy::new(|| {
    vec![
        SpecCategory {
            key: "general",
            title: "General",
            specs: vec![
                attr("brand", "Brand", |p: &MobileProduct| {
                    FieldValue::Text(p.brand.clone())
                }),
                attr("price", "Price", |p: &MobileProduct| {
                    FieldValue::Amount(p.price)
                }),
                attr("os", "Operating System", |p: &MobileProduct| text(&p.os)),
                attr("sim", "SIM", |p: &MobileProduct| text(&p.sim)),
            ],
        },
        SpecCategory {
            key: "display",
            title: "Display",
            specs: vec![
                attr("display", "Display", |p: &MobileProduct| text(&p.display)),
                attr("resolution", "Resolution", |p: &MobileProduct| {
                    text(&p.resolution)
                }),
            ],
        },
        SpecCategory {
            key: "performance",
            title: "Performance",
            specs: vec![
                attr("chipset", "Chipset", |p: &MobileProduct| text(&p.chipset)),
                attr("ram", "RAM", |p: &MobileProduct| text(&p.ram)),
                attr("storage", "Storage", |p: &MobileProduct| text(&p.storage)),
            ],
        },
        SpecCategory {
            key: "camera",
            title: "Camera",
            specs: vec![
                attr("camera", "Rear Camera", |p: &MobileProduct| text(&p.camera)),
                attr("front_camera", "Front Camera", |p: &MobileProduct| {
                    text(&p.front_camera)
                }),
            ],
        },
        SpecCategory {
            key: "battery",
            title: "Battery",
            specs: vec![
                attr("battery", "Battery", |p: &MobileProduct| text(&p.battery)),
                attr("fast_charging", "Fast Charging", |p: &MobileProduct| {
                    flag(p.fast_charging)
                }),
            ],
        },
        SpecCategory {
            key: "connectivity",
            title: "Connectivity",
            specs: vec![
                attr("network_bands", "Network Bands", |p: &MobileProduct| {
                    FieldValue::List(p.network_band_list())
                }),
                attr("nfc", "NFC", |p: &MobileProduct| flag(p.nfc)),
                attr("sensors", "Sensors", |p: &MobileProduct| {
                    FieldValue::List(p.sensor_list())
                }),
                attr("fingerprint", "Fingerprint Sensor", |p: &MobileProduct| {
                    flag(p.fingerprint)
                }),
            ],
        },
        SpecCategory {
            key: "design",
            title: "Design",
            specs: vec![
                attr("color", "Color", |p: &MobileProduct| text(&p.color)),
                attr("weight", "Weight", |p: &MobileProduct| text(&p.weight)),
                attr("dimensions", "Dimensions", |p: &MobileProduct| {
                    text(&p.dimensions)
                }),
            ],
        },
        // Joined from the review store, not read off the record.
        SpecCategory {
            key: "expert_review",
            title: "Expert Review",
            specs: vec![
                expert("expert_rating", "Expert Rating", ExpertField::Rating),
                expert("expert_verdict", "Verdict", ExpertField::Verdict),
            ],
        },
    ]
});

static LAPTOP_TAXONOMY: Lazy<Vec<SpecCategory<LaptopProduct>>> = Lazy::new(|| {
    vec![
        SpecCategory {
            key: "general",
            title: "General",
            specs: vec![
                attr("brand", "Brand", |p: &LaptopProduct| {
                    FieldValue::Text(p.brand.clone())
                }),
                attr("price", "Price", |p: &LaptopProduct| {
                    FieldValue::Amount(p.price)
                }),
                attr("os", "Operating System", |p: &LaptopProduct| text(&p.os)),
            ],
        },
        SpecCategory {
            key: "display",
            title: "Display",
            specs: vec![
                attr("display", "Display", |p: &LaptopProduct| text(&p.display)),
                attr("resolution", "Resolution", |p: &LaptopProduct| {
                    text(&p.resolution)
                }),
                attr("touchscreen", "Touchscreen", |p: &LaptopProduct| {
                    flag(p.touchscreen)
                }),
            ],
        },
        SpecCategory {
            key: "performance",
            title: "Performance",
            specs: vec![
                attr("processor", "Processor", |p: &LaptopProduct| {
                    text(&p.processor)
                }),
                attr("graphics", "Graphics", |p: &LaptopProduct| text(&p.graphics)),
                attr("ram", "RAM", |p: &LaptopProduct| text(&p.ram)),
                attr("ram_type", "RAM Type", |p: &LaptopProduct| text(&p.ram_type)),
                attr("storage", "Storage", |p: &LaptopProduct| text(&p.storage)),
                attr("storage_type", "Storage Type", |p: &LaptopProduct| {
                    text(&p.storage_type)
                }),
            ],
        },
        SpecCategory {
            key: "battery",
            title: "Battery",
            specs: vec![attr("battery", "Battery", |p: &LaptopProduct| {
                text(&p.battery)
            })],
        },
        SpecCategory {
            key: "connectivity",
            title: "Connectivity",
            specs: vec![
                attr("ports", "Ports", |p: &LaptopProduct| {
                    FieldValue::List(p.port_list())
                }),
                attr("webcam", "Webcam", |p: &LaptopProduct| flag(p.webcam)),
            ],
        },
        SpecCategory {
            key: "design",
            title: "Design",
            specs: vec![
                attr("color", "Color", |p: &LaptopProduct| text(&p.color)),
                attr("weight", "Weight", |p: &LaptopProduct| text(&p.weight)),
                attr("dimensions", "Dimensions", |p: &LaptopProduct| {
                    text(&p.dimensions)
                }),
                attr("backlit_keyboard", "Backlit Keyboard", |p: &LaptopProduct| {
                    flag(p.backlit_keyboard)
                }),
            ],
        },
    ]
});

pub fn mobile_taxonomy() -> &'static [SpecCategory<MobileProduct>] {
    &MOBILE_TAXONOMY
}

pub fn laptop_taxonomy() -> &'static [SpecCategory<LaptopProduct>] {
    &LAPTOP_TAXONOMY
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::services::formatter::format_field;

    fn blank_mobile() -> MobileProduct {
        MobileProduct {
            id: Uuid::new_v4(),
            name: "X1".to_string(),
            brand: "Acme".to_string(),
            price: 0,
            image_url: None,
            gallery_images: None,
            display: None,
            resolution: None,
            chipset: None,
            ram: None,
            storage: None,
            color: None,
            battery: None,
            camera: None,
            front_camera: None,
            os: None,
            sim: None,
            weight: None,
            dimensions: None,
            network_bands: None,
            sensors: None,
            nfc: None,
            fast_charging: None,
            fingerprint: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn blank_laptop() -> LaptopProduct {
        LaptopProduct {
            id: Uuid::new_v4(),
            name: "AeroBook".to_string(),
            brand: "Acme".to_string(),
            price: 0,
            image_url: None,
            gallery_images: None,
            display: None,
            resolution: None,
            processor: None,
            graphics: None,
            ram: None,
            ram_type: None,
            storage: None,
            storage_type: None,
            color: None,
            battery: None,
            os: None,
            weight: None,
            dimensions: None,
            ports: None,
            webcam: None,
            backlit_keyboard: None,
            touchscreen: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn every_field_formats_a_fully_sparse_record() {
        let phone = blank_mobile();
        for category in mobile_taxonomy() {
            for field in &category.specs {
                let formatted = format_field(field, &phone, None);
                assert!(!formatted.is_empty(), "field {} formatted empty", field.key);
            }
        }

        let laptop = blank_laptop();
        for category in laptop_taxonomy() {
            for field in &category.specs {
                let formatted = format_field(field, &laptop, None);
                assert!(!formatted.is_empty(), "field {} formatted empty", field.key);
            }
        }
    }

    #[test]
    fn empty_strings_and_flags_format_like_their_populated_peers() {
        let mut phone = blank_mobile();
        phone.display = Some(String::new());
        phone.sensors = Some("[]".to_string());
        phone.nfc = Some(false);
        phone.fast_charging = Some(true);

        for category in mobile_taxonomy() {
            for field in &category.specs {
                // Must not panic for any populated shape either.
                let _ = format_field(field, &phone, None);
            }
        }
    }

    #[test]
    fn mobile_taxonomy_keys_are_unique() {
        let mut keys: Vec<&str> = mobile_taxonomy()
            .iter()
            .flat_map(|c| c.specs.iter().map(|s| s.key))
            .collect();
        let before = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn expert_fields_appear_only_in_the_mobile_taxonomy() {
        let mobile_expert = mobile_taxonomy()
            .iter()
            .flat_map(|c| c.specs.iter())
            .filter(|s| matches!(s.source, FieldSource::Expert(_)))
            .count();
        assert_eq!(mobile_expert, 2);

        let laptop_expert = laptop_taxonomy()
            .iter()
            .flat_map(|c| c.specs.iter())
            .filter(|s| matches!(s.source, FieldSource::Expert(_)))
            .count();
        assert_eq!(laptop_expert, 0);
    }
}
