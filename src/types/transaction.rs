//! Transaction records as delivered by the model service's `/transactions` feed.
//!
//! Sources disagree on casing (`riskScore`, `risk_score`, `RiskScore`,
//! `Time_Stamp`), so every incoming key is canonicalised once and resolved
//! through [`FIELD_ALIASES`]. Nothing past this module needs to care how a
//! field was spelled on the wire.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lowest risk score the scoring service is expected to emit.
pub const MIN_RISK_SCORE: i64 = 0;

/// Highest risk score the scoring service is expected to emit.
pub const MAX_RISK_SCORE: i64 = 100;

/// Fields of a [`TransactionRecord`] that can be populated from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Id,
    Date,
    Customer,
    Amount,
    Channel,
    RiskScore,
    Status,
}

/// Canonical key to record field. Keys are compared after [`canonical_key`].
pub const FIELD_ALIASES: &[(&str, RecordField)] = &[
    ("id", RecordField::Id),
    ("transactionid", RecordField::Id),
    ("txnid", RecordField::Id),
    ("date", RecordField::Date),
    ("timestamp", RecordField::Date),
    ("transactiondate", RecordField::Date),
    ("customer", RecordField::Customer),
    ("customerid", RecordField::Customer),
    ("client", RecordField::Customer),
    ("amount", RecordField::Amount),
    ("channel", RecordField::Channel),
    ("transactiontype", RecordField::Channel),
    ("riskscore", RecordField::RiskScore),
    ("risk", RecordField::RiskScore),
    ("status", RecordField::Status),
];

/// Lowercase a wire key and strip separators so `risk_score`, `riskScore`
/// and `Risk-Score` all compare equal.
pub fn canonical_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl RecordField {
    /// Resolve a wire key through the alias table.
    pub fn resolve(key: &str) -> Option<Self> {
        let key = canonical_key(key);
        FIELD_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, field)| *field)
    }
}

/// A raw transaction record. Immutable once received; the engine only borrows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Display identifier, e.g. `TXN0042`
    pub id: String,

    /// Free-form date text, not guaranteed parseable
    #[serde(rename = "date")]
    pub date_text: String,

    /// Account holder identifier
    pub customer: String,

    /// Transaction amount in display units
    pub amount: f64,

    /// Transfer rail or transaction type
    pub channel: String,

    /// Risk score as received (`None` when absent or not numeric)
    pub risk_score: Option<i64>,

    /// Current disposition, e.g. `Blocked`, `Under Review`
    pub status: String,
}

impl TransactionRecord {
    /// Create a record with the fields the engine reads.
    pub fn new(
        id: impl Into<String>,
        date_text: impl Into<String>,
        customer: impl Into<String>,
        amount: f64,
        risk_score: i64,
    ) -> Self {
        Self {
            id: id.into(),
            date_text: date_text.into(),
            customer: customer.into(),
            amount,
            channel: String::new(),
            risk_score: Some(risk_score),
            status: String::new(),
        }
    }

    /// Set the channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Risk score used for threshold comparisons.
    ///
    /// Missing or out-of-range scores count as 0.
    pub fn effective_risk_score(&self) -> i64 {
        match self.risk_score {
            Some(score) if (MIN_RISK_SCORE..=MAX_RISK_SCORE).contains(&score) => score,
            _ => 0,
        }
    }

    fn assign(&mut self, field: RecordField, value: Value) {
        if value.is_null() {
            return;
        }

        match field {
            RecordField::Id => self.id = value_to_text(value),
            RecordField::Date => self.date_text = value_to_text(value),
            RecordField::Customer => self.customer = value_to_text(value),
            RecordField::Amount => self.amount = value_to_f64(&value).unwrap_or(0.0),
            RecordField::Channel => self.channel = value_to_text(value),
            RecordField::RiskScore => {
                // A categorical value (e.g. `"risk": "High"`) must not erase a numeric score
                if let Some(score) = value_to_score(&value) {
                    self.risk_score = Some(score);
                }
            }
            RecordField::Status => self.status = value_to_text(value),
        }
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn value_to_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| v.trunc() as i64)
            })
        }
        _ => None,
    }
}

impl<'de> Deserialize<'de> for TransactionRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = TransactionRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a transaction record object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut record = TransactionRecord::default();

        while let Some(key) = map.next_key::<String>()? {
            let value: Value = map.next_value()?;
            if let Some(field) = RecordField::resolve(&key) {
                record.assign(field, value);
            }
        }

        Ok(record)
    }
}
