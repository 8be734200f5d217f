//! Sibling lookup and purchasable-axis resolution: records sharing
//! `(name, brand)` differ only in storage and color, and swapping an
//! axis must land on the exact record for that combination.

use db::models::product::CatalogProduct;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use ts_rs::TS;

/// The distinct purchasable axes derived from a sibling group. Never
/// stored; recomputed per view.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct VariantAxes {
    pub storage_options: Vec<String>,
    pub color_options: Vec<String>,
}

pub async fn siblings<P: CatalogProduct>(
    pool: &SqlitePool,
    product: &P,
) -> Result<Vec<P>, sqlx::Error> {
    P::find_siblings(pool, product.name(), product.brand()).await
}

pub fn axes<P: CatalogProduct>(siblings: &[P]) -> VariantAxes {
    VariantAxes {
        storage_options: storage_options(siblings),
        color_options: color_options(siblings),
    }
}

/// Distinct storage options, smallest capacity first.
pub fn storage_options<P: CatalogProduct>(siblings: &[P]) -> Vec<String> {
    let mut options = dedup_axis(siblings.iter().filter_map(|s| s.storage()));
    options.sort_by_key(|option| storage_sort_key(option));
    options
}

/// Distinct colors in first-seen order.
pub fn color_options<P: CatalogProduct>(siblings: &[P]) -> Vec<String> {
    dedup_axis(siblings.iter().filter_map(|s| s.color()))
}

fn dedup_axis<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !value.trim().is_empty() && !out.iter().any(|seen| seen == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Capacity in bytes for strings like "128GB", "1TB", "512 GB". A bare
/// number reads as gigabytes. Returns None when no leading number or a
/// recognizable unit is found.
fn storage_bytes(option: &str) -> Option<u64> {
    let s = option.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let number: u64 = s[..split].parse().ok()?;
    let unit = s[split..]
        .trim()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_uppercase();
    let scale: u64 = match unit.as_str() {
        "MB" => 1 << 20,
        "GB" | "" => 1 << 30,
        "TB" => 1 << 40,
        _ => return None,
    };
    Some(number * scale)
}

/// Unit-aware ordering: "1TB" sorts after "128GB". Options that do not
/// parse sort last, lexicographically.
fn storage_sort_key(option: &str) -> (u8, u64, String) {
    match storage_bytes(option) {
        Some(bytes) => (0, bytes, String::new()),
        None => (1, 0, option.to_ascii_lowercase()),
    }
}

/// The sibling matching the requested axis change, holding the current
/// value on the untouched axis. No fuzzy matching: when the exact
/// combination has no record, the caller keeps the prior selection.
pub fn resolve<'a, P: CatalogProduct>(
    siblings: &'a [P],
    current: &P,
    target_storage: Option<&str>,
    target_color: Option<&str>,
) -> Option<&'a P> {
    let want_storage = target_storage.or_else(|| current.storage());
    let want_color = target_color.or_else(|| current.color());
    siblings
        .iter()
        .find(|s| axis_matches(s.storage(), want_storage) && axis_matches(s.color(), want_color))
}

fn axis_matches(have: Option<&str>, want: Option<&str>) -> bool {
    match want {
        None => true,
        Some(w) => have.is_some_and(|h| h.eq_ignore_ascii_case(w)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::mobile_product::MobileProduct;
    use uuid::Uuid;

    use super::*;

    fn phone(storage: Option<&str>, color: Option<&str>) -> MobileProduct {
        MobileProduct {
            id: Uuid::new_v4(),
            name: "X1".to_string(),
            brand: "Acme".to_string(),
            price: 49_999,
            image_url: None,
            gallery_images: None,
            display: None,
            resolution: None,
            chipset: None,
            ram: None,
            storage: storage.map(str::to_string),
            color: color.map(str::to_string),
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

    #[test]
    fn storage_sorts_by_byte_magnitude_not_digits() {
        let group = [
            phone(Some("128GB"), None),
            phone(Some("1TB"), None),
            phone(Some("256GB"), None),
        ];
        assert_eq!(storage_options(&group), vec!["128GB", "256GB", "1TB"]);
    }

    #[test]
    fn unparsable_storage_sorts_last() {
        let group = [
            phone(Some("Expandable"), None),
            phone(Some("512GB"), None),
            phone(Some("64GB"), None),
        ];
        assert_eq!(
            storage_options(&group),
            vec!["64GB", "512GB", "Expandable"]
        );
    }

    #[test]
    fn colors_keep_first_seen_order() {
        let group = [
            phone(None, Some("Black")),
            phone(None, Some("Blue")),
            phone(None, Some("Black")),
            phone(None, Some("")),
        ];
        assert_eq!(color_options(&group), vec!["Black", "Blue"]);
    }

    #[test]
    fn resolve_holds_the_untouched_axis() {
        let group = [
            phone(Some("128GB"), Some("Black")),
            phone(Some("256GB"), Some("Black")),
            phone(Some("128GB"), Some("Blue")),
        ];
        let current = &group[0];

        let swapped = resolve(&group, current, Some("256GB"), None).unwrap();
        assert_eq!(swapped.storage.as_deref(), Some("256GB"));
        assert_eq!(swapped.color.as_deref(), Some("Black"));
    }

    #[test]
    fn resolve_returns_none_for_absent_combinations() {
        let group = [
            phone(Some("128GB"), Some("Black")),
            phone(Some("256GB"), Some("Black")),
            phone(Some("128GB"), Some("Blue")),
        ];
        let current = &group[2]; // 128GB Blue

        // No 256GB Blue record exists; the display keeps the prior
        // selection.
        assert!(resolve(&group, current, Some("256GB"), None).is_none());
        assert!(resolve(&group, current, Some("256GB"), Some("Green")).is_none());
    }

    #[test]
    fn resolve_matches_exact_requested_pair() {
        let group = [
            phone(Some("128GB"), Some("Black")),
            phone(Some("256GB"), Some("Black")),
            phone(Some("256GB"), Some("Blue")),
        ];
        let current = &group[0];

        let hit = resolve(&group, current, Some("256GB"), Some("Blue")).unwrap();
        assert_eq!(hit.storage.as_deref(), Some("256GB"));
        assert_eq!(hit.color.as_deref(), Some("Blue"));
    }
}
