//! Request and response types relayed to and from the external scoring service.
//!
//! The service speaks snake_case while browser clients tend to send
//! camelCase, so inbound types accept both spellings.

use serde::{Deserialize, Serialize};

/// Risk level reported by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[serde(alias = "low", alias = "Low")]
    Low,
    #[serde(alias = "medium", alias = "Medium")]
    Medium,
    #[serde(alias = "high", alias = "High")]
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Score bands the scoring service uses to derive a [`RiskLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBands {
    pub medium: i64,
    pub high: i64,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            medium: 50,
            high: 80,
        }
    }
}

impl RiskLevel {
    /// Classify a 0-100 risk score.
    pub fn from_score(score: i64, bands: &RiskBands) -> Self {
        if score >= bands.high {
            RiskLevel::High
        } else if score >= bands.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Single-transaction scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudScoreRequest {
    pub amount: f64,

    /// Spelled the way the model service expects it
    #[serde(
        alias = "tranctionType",
        alias = "transactionType",
        alias = "transaction_type"
    )]
    pub tranction_type: String,

    #[serde(alias = "merchantCountry")]
    pub merchant_country: String,

    /// 1 = cash, 2 = clearing, 3 = transfer
    #[serde(alias = "paymentMode")]
    pub payment_mode: i32,

    /// ISO-8601 timestamp
    #[serde(alias = "timeStamp")]
    pub time_stamp: String,
}

/// Scoring service verdict for a single transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudScoreResponse {
    #[serde(alias = "fraudProbability")]
    pub fraud_probability: f64,

    #[serde(alias = "riskScore")]
    pub risk_score: i64,

    #[serde(alias = "riskLevel")]
    pub risk_level: RiskLevel,

    #[serde(alias = "isAnomaly")]
    pub is_anomaly: bool,

    #[serde(alias = "rawDecisionScore")]
    pub raw_decision_score: f64,
}

/// Loan application scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanScoreRequest {
    #[serde(alias = "applicant_income")]
    pub applicant_income: f64,

    #[serde(alias = "loan_amount")]
    pub loan_amount: f64,

    #[serde(alias = "tenure_months")]
    pub tenure_months: i32,

    #[serde(alias = "credit_score")]
    pub credit_score: i32,

    #[serde(alias = "existing_loans")]
    pub existing_loans: i32,
}

/// Scoring service verdict for a loan application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanScoreResponse {
    #[serde(alias = "default_probability")]
    pub default_probability: f64,

    #[serde(alias = "risk_score")]
    pub risk_score: i64,

    #[serde(alias = "risk_level")]
    pub risk_level: RiskLevel,
}
