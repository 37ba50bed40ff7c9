//! Shape of a persisted tip calculation.
//!
//! The schema checks presence of every required field at the storage boundary
//! and fills in `date` when the caller leaves it out. Value ranges are the
//! endpoint's concern, so a negative tip passes here.

use crate::models::{TipCalculation, TipCalculationDraft};
use chrono::{DateTime, Utc};
use thiserror::Error;

pub const COLLECTION_NAME: &str = "tipcalculations";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

pub fn build_record(
    draft: TipCalculationDraft,
    id: String,
    now: DateTime<Utc>,
) -> Result<TipCalculation, SchemaError> {
    Ok(TipCalculation {
        id,
        customer_name: required_text(draft.customer_name, "customerName")?,
        mobile_number: required_text(draft.mobile_number, "mobileNumber")?,
        bill_amount: required(draft.bill_amount, "billAmount")?,
        tip_amount: required(draft.tip_amount, "tipAmount")?,
        total_amount: required(draft.total_amount, "totalAmount")?,
        tip_percentage: required(draft.tip_percentage, "tipPercentage")?,
        date: draft.date.unwrap_or(now),
    })
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, SchemaError> {
    value.ok_or(SchemaError::MissingField(field))
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, SchemaError> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(SchemaError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn complete_draft() -> TipCalculationDraft {
        TipCalculationDraft {
            customer_name: Some("Asha".to_string()),
            mobile_number: Some("9876543210".to_string()),
            bill_amount: Some(200.0),
            tip_amount: Some(36.0),
            total_amount: Some(236.0),
            tip_percentage: Some(18),
            date: None,
        }
    }

    #[test]
    fn missing_date_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        let record = build_record(complete_draft(), "abc".to_string(), now).unwrap();
        assert_eq!(record.date, now);
        assert_eq!(record.id, "abc");
        assert_eq!(record.total_amount, 236.0);
    }

    #[test]
    fn explicit_date_is_kept() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2025, 1, 1, 8, 30, 0).unwrap();
        let draft = TipCalculationDraft {
            date: Some(earlier),
            ..complete_draft()
        };
        let record = build_record(draft, "abc".to_string(), now).unwrap();
        assert_eq!(record.date, earlier);
    }

    #[test]
    fn missing_amount_is_rejected() {
        let draft = TipCalculationDraft {
            tip_amount: None,
            ..complete_draft()
        };
        let err = build_record(draft, "abc".to_string(), Utc::now()).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("tipAmount"));
    }

    #[test]
    fn empty_name_counts_as_missing() {
        let draft = TipCalculationDraft {
            customer_name: Some(String::new()),
            ..complete_draft()
        };
        let err = build_record(draft, "abc".to_string(), Utc::now()).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("customerName"));
    }

    #[test]
    fn negative_amounts_are_not_range_checked() {
        let draft = TipCalculationDraft {
            tip_amount: Some(-5.0),
            ..complete_draft()
        };
        let record = build_record(draft, "abc".to_string(), Utc::now()).unwrap();
        assert_eq!(record.tip_amount, -5.0);
    }
}
