//! Cost correction payload for a charging session
//!
//! The dashboard posts loosely typed JSON: every field may be a string, a
//! number, `null`, or missing. [`CostPayload`] captures that shape once and
//! [`CostUpdate`] holds the values actually bound into the `UPDATE`.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors turning a raw payload into a [`CostUpdate`]
#[derive(Debug, Error)]
pub enum CostError {
    #[error("invalid cost payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("cost payload has no id")]
    MissingId,
}

/// Decoded cost payload, every field still optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CostPayload {
    #[serde(default, deserialize_with = "loose_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cost_total: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cost_currency: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cost_per_kwh: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cost_per_session: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cost_per_minute: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cost_idle_fee_total: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cost_kwh_meter_invoice: Option<String>,
}

impl CostPayload {
    pub fn from_json(json: &str) -> Result<Self, CostError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Strings pass through, numbers keep their JSON text, `null` is absent
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Loose>::deserialize(deserializer)?.map(|value| match value {
        Loose::Text(text) => text,
        Loose::Number(number) => number.to_string(),
    }))
}

/// Value bound for one cost column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostValue {
    /// SQL `NULL`
    Null,
    /// Integer zero
    Zero,
    /// Client text, stored verbatim
    Text(String),
}

/// `NULL` for absent or empty text
pub fn null_if_empty(value: Option<&str>) -> CostValue {
    match value {
        None | Some("") => CostValue::Null,
        Some(text) => CostValue::Text(text.to_string()),
    }
}

/// `NULL` for absent, empty, `"0"` and `"0.00"`
pub fn null_if_empty_or_zero(value: Option<&str>) -> CostValue {
    match value {
        None | Some("") | Some("0") | Some("0.00") => CostValue::Null,
        Some(text) => CostValue::Text(text.to_string()),
    }
}

/// True when `value` is present and parses to a float equal to zero
pub fn is_zero(value: Option<&str>) -> bool {
    match value {
        None | Some("") => false,
        Some(text) => text.trim().parse::<f64>().map(|v| v == 0.0).unwrap_or(false),
    }
}

/// Row update for `chargingstate`, ready to bind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostUpdate {
    pub id: String,
    pub cost_total: CostValue,
    pub cost_currency: CostValue,
    pub cost_per_kwh: CostValue,
    pub cost_per_session: CostValue,
    pub cost_per_minute: CostValue,
    pub cost_idle_fee_total: CostValue,
    pub cost_kwh_meter_invoice: CostValue,
}

impl CostUpdate {
    /// Apply the column mapping rules to a decoded payload
    ///
    /// A session billed at a flat zero fee keeps an explicit total of zero
    /// instead of `NULL`.
    pub fn from_payload(payload: &CostPayload) -> Result<Self, CostError> {
        let id = payload.id.clone().ok_or(CostError::MissingId)?;

        let mut cost_total = null_if_empty_or_zero(payload.cost_total.as_deref());
        if cost_total == CostValue::Null && is_zero(payload.cost_per_session.as_deref()) {
            cost_total = CostValue::Zero;
        }

        Ok(Self {
            id,
            cost_total,
            cost_currency: null_if_empty(payload.cost_currency.as_deref()),
            cost_per_kwh: null_if_empty(payload.cost_per_kwh.as_deref()),
            cost_per_session: null_if_empty(payload.cost_per_session.as_deref()),
            cost_per_minute: null_if_empty(payload.cost_per_minute.as_deref()),
            cost_idle_fee_total: null_if_empty(payload.cost_idle_fee_total.as_deref()),
            cost_kwh_meter_invoice: null_if_empty(payload.cost_kwh_meter_invoice.as_deref()),
        })
    }

    /// Parse and map raw JSON in one step
    pub fn from_json(json: &str) -> Result<Self, CostError> {
        Self::from_payload(&CostPayload::from_json(json)?)
    }

    /// Cost columns in `UPDATE` order
    pub fn columns(&self) -> [(&'static str, &CostValue); 7] {
        [
            ("cost_total", &self.cost_total),
            ("cost_currency", &self.cost_currency),
            ("cost_per_kwh", &self.cost_per_kwh),
            ("cost_per_session", &self.cost_per_session),
            ("cost_per_minute", &self.cost_per_minute),
            ("cost_idle_fee_total", &self.cost_idle_fee_total),
            ("cost_kwh_meter_invoice", &self.cost_kwh_meter_invoice),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CostValue {
        CostValue::Text(s.to_string())
    }

    #[test]
    fn test_null_if_empty_or_zero() {
        assert_eq!(null_if_empty_or_zero(None), CostValue::Null);
        assert_eq!(null_if_empty_or_zero(Some("")), CostValue::Null);
        assert_eq!(null_if_empty_or_zero(Some("0")), CostValue::Null);
        assert_eq!(null_if_empty_or_zero(Some("0.00")), CostValue::Null);
        // only the two literal spellings count as zero
        assert_eq!(null_if_empty_or_zero(Some("0.0")), text("0.0"));
        assert_eq!(null_if_empty_or_zero(Some("12.34")), text("12.34"));
    }

    #[test]
    fn test_null_if_empty_keeps_any_text() {
        assert_eq!(null_if_empty(None), CostValue::Null);
        assert_eq!(null_if_empty(Some("")), CostValue::Null);
        assert_eq!(null_if_empty(Some("0")), text("0"));
        assert_eq!(null_if_empty(Some("-1.5")), text("-1.5"));
        assert_eq!(null_if_empty(Some("abc")), text("abc"));
    }

    #[test]
    fn test_is_zero() {
        assert!(!is_zero(None));
        assert!(!is_zero(Some("")));
        assert!(!is_zero(Some("abc")));
        assert!(!is_zero(Some("0.01")));
        assert!(is_zero(Some("0")));
        assert!(is_zero(Some("0.00")));
        assert!(is_zero(Some("-0")));
    }

    #[test]
    fn test_empty_total_with_zero_session_fee_is_zero() {
        let update =
            CostUpdate::from_json(r#"{"id":"42","cost_total":"","cost_per_session":"0"}"#).unwrap();

        assert_eq!(update.id, "42");
        assert_eq!(update.cost_total, CostValue::Zero);
        assert_eq!(update.cost_per_session, text("0"));
        assert_eq!(update.cost_currency, CostValue::Null);
    }

    #[test]
    fn test_zero_total_with_zero_session_fee_is_zero() {
        let update =
            CostUpdate::from_json(r#"{"id":"1","cost_total":"0.00","cost_per_session":"0.0"}"#)
                .unwrap();
        assert_eq!(update.cost_total, CostValue::Zero);
    }

    #[test]
    fn test_empty_total_otherwise_null() {
        for json in [
            r#"{"id":"1","cost_total":""}"#,
            r#"{"id":"1","cost_total":"0","cost_per_session":""}"#,
            r#"{"id":"1","cost_total":"0.00","cost_per_session":"1.50"}"#,
            r#"{"id":"1","cost_per_session":"abc"}"#,
        ] {
            let update = CostUpdate::from_json(json).unwrap();
            assert_eq!(update.cost_total, CostValue::Null, "{json}");
        }
    }

    #[test]
    fn test_non_empty_total_is_kept() {
        let update =
            CostUpdate::from_json(r#"{"id":"1","cost_total":"7.30","cost_per_session":"0"}"#)
                .unwrap();
        assert_eq!(update.cost_total, text("7.30"));
    }

    #[test]
    fn test_full_payload() {
        let update = CostUpdate::from_json(
            r#"{
                "id": "17",
                "cost_total": "23.45",
                "cost_currency": "EUR",
                "cost_per_kwh": "0.39",
                "cost_per_session": "",
                "cost_per_minute": "-0.01",
                "cost_idle_fee_total": "n/a",
                "cost_kwh_meter_invoice": ""
            }"#,
        )
        .unwrap();

        assert_eq!(
            update,
            CostUpdate {
                id: "17".into(),
                cost_total: text("23.45"),
                cost_currency: text("EUR"),
                cost_per_kwh: text("0.39"),
                cost_per_session: CostValue::Null,
                cost_per_minute: text("-0.01"),
                cost_idle_fee_total: text("n/a"),
                cost_kwh_meter_invoice: CostValue::Null,
            }
        );
    }

    #[test]
    fn test_numbers_and_nulls() {
        let update = CostUpdate::from_json(
            r#"{"id":42,"cost_total":null,"cost_per_session":0,"cost_per_kwh":0.25}"#,
        )
        .unwrap();

        assert_eq!(update.id, "42");
        assert_eq!(update.cost_total, CostValue::Zero);
        assert_eq!(update.cost_per_session, text("0"));
        assert_eq!(update.cost_per_kwh, text("0.25"));
    }

    #[test]
    fn test_missing_id() {
        let err = CostUpdate::from_json(r#"{"cost_total":"1"}"#).unwrap_err();
        assert!(matches!(err, CostError::MissingId));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            CostUpdate::from_json("{not json").unwrap_err(),
            CostError::InvalidJson(_)
        ));
        assert!(matches!(
            CostUpdate::from_json(r#"{"id":"1","cost_total":true}"#).unwrap_err(),
            CostError::InvalidJson(_)
        ));
    }

    #[test]
    fn test_column_order() {
        let update = CostUpdate::from_json(r#"{"id":"1"}"#).unwrap();
        let names: Vec<_> = update.columns().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            [
                "cost_total",
                "cost_currency",
                "cost_per_kwh",
                "cost_per_session",
                "cost_per_minute",
                "cost_idle_fee_total",
                "cost_kwh_meter_invoice",
            ]
        );
    }
}
