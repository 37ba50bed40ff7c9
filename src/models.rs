use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted tip calculation as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipCalculation {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_name: String,
    pub mobile_number: String,
    pub bill_amount: f64,
    pub tip_amount: f64,
    pub total_amount: f64,
    pub tip_percentage: i64,
    pub date: DateTime<Utc>,
}

/// Body of `POST /api/tip-calculations`. Every field is optional on the wire so
/// that presence is checked by the endpoint and the schema, not by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TipCalculationDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_percentage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
