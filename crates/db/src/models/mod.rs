pub mod expert_review;
pub mod laptop_product;
pub mod mobile_product;
pub mod product;
pub mod product_kind;

/// Decode a JSON-array TEXT column. NULL, empty and malformed values
/// all read as an empty list.
pub(crate) fn parse_string_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

/// Encode a list for storage in a JSON-array TEXT column.
pub(crate) fn to_string_list(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        serde_json::to_string(items).ok()
    }
}
