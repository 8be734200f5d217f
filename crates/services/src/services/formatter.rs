//! Display formatting for spec fields. Pure and total: every value
//! shape a sparse record can hold formats to some string.

use db::models::expert_review::ExpertReview;

use super::taxonomy::{ExpertField, FieldSource, FieldValue, SpecField};

pub const NOT_SPECIFIED: &str = "Not Specified";
pub const NO_REVIEW: &str = "No review";
pub const NO_VERDICT: &str = "No verdict available";

/// True for the placeholder strings shown when data is absent.
pub fn is_sentinel(value: &str) -> bool {
    value == NOT_SPECIFIED || value == NO_REVIEW || value == NO_VERDICT
}

pub fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Missing => NOT_SPECIFIED.to_string(),
        FieldValue::Text(s) if s.trim().is_empty() => NOT_SPECIFIED.to_string(),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Flag(true) => "Yes".to_string(),
        FieldValue::Flag(false) => "No".to_string(),
        FieldValue::List(items) if items.is_empty() => NOT_SPECIFIED.to_string(),
        FieldValue::List(items) => items.join(", "),
        FieldValue::Amount(amount) => format_price(*amount),
    }
}

/// Minor-unit-free amount to a grouped currency string.
pub fn format_price(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn format_expert(field: ExpertField, review: Option<&ExpertReview>) -> String {
    match field {
        ExpertField::Rating => match review {
            Some(r) => format!("{:.1} / 10", r.rating),
            None => NO_REVIEW.to_string(),
        },
        ExpertField::Verdict => review
            .and_then(|r| r.verdict.as_deref())
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| NO_VERDICT.to_string()),
    }
}

/// One cell of the comparison: attribute fields read the record, expert
/// fields read the joined review.
pub fn format_field<P>(field: &SpecField<P>, product: &P, review: Option<&ExpertReview>) -> String {
    match &field.source {
        FieldSource::Attr(read) => format_value(&read(product)),
        FieldSource::Expert(expert_field) => format_expert(*expert_field, review),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn review(rating: f64, verdict: Option<&str>) -> ExpertReview {
        ExpertReview {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            rating,
            verdict: verdict.map(str::to_string),
            pros: None,
            cons: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn every_value_shape_formats_without_panicking() {
        let cases = [
            (FieldValue::Missing, NOT_SPECIFIED),
            (FieldValue::Text(String::new()), NOT_SPECIFIED),
            (FieldValue::Text("   ".to_string()), NOT_SPECIFIED),
            (FieldValue::Text("OLED".to_string()), "OLED"),
            (FieldValue::Flag(true), "Yes"),
            (FieldValue::Flag(false), "No"),
            (FieldValue::List(vec![]), NOT_SPECIFIED),
            (FieldValue::List(vec!["5G".to_string()]), "5G"),
            (
                FieldValue::List(vec!["5G".to_string(), "LTE".to_string()]),
                "5G, LTE",
            ),
            (FieldValue::Amount(0), "$0"),
        ];
        for (value, expected) in cases {
            assert_eq!(format_value(&value), expected);
        }
    }

    #[test]
    fn prices_group_thousands() {
        assert_eq!(format_price(999), "$999");
        assert_eq!(format_price(49_999), "$49,999");
        assert_eq!(format_price(1_299_000), "$1,299,000");
        assert_eq!(format_price(-5_000), "-$5,000");
    }

    #[test]
    fn expert_fields_fall_back_to_sentinels() {
        assert_eq!(format_expert(ExpertField::Rating, None), NO_REVIEW);
        assert_eq!(format_expert(ExpertField::Verdict, None), NO_VERDICT);

        let without_verdict = review(8.0, None);
        assert_eq!(
            format_expert(ExpertField::Verdict, Some(&without_verdict)),
            NO_VERDICT
        );

        let full = review(8.45, Some("Excellent value"));
        assert_eq!(format_expert(ExpertField::Rating, Some(&full)), "8.5 / 10");
        assert_eq!(
            format_expert(ExpertField::Verdict, Some(&full)),
            "Excellent value"
        );
    }
}
