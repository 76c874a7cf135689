//! Dashboard-facing metric DTOs.
//!
//! Field names serialize in camelCase, the shape the dashboard client reads.

use serde::{Deserialize, Serialize};

/// One entry of the "most urgent" list on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAlert {
    pub transaction_id: String,
    pub message: String,
    /// `YYYY-MM-DD HH:mm`, UTC
    pub date: String,
    pub risk_score: i64,
}

/// Headline numbers for the main dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_alerts_today: usize,
    /// Always equal to `total_alerts_today`; kept as a separate field for the client.
    pub flagged_today: usize,
    pub active_customers: usize,
    pub system_health: f64,
    pub ai_accuracy: f64,
    pub recent_alerts: Vec<RecentAlert>,
}

/// Fraud detection KPIs over the whole transaction snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudMetrics {
    pub total_transactions: usize,
    pub flagged_suspicious: usize,
    pub high_risk_clients: usize,
    /// Mean risk score rounded half away from zero to one decimal
    pub average_risk_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_summary_field_names() {
        let summary = DashboardSummary {
            total_alerts_today: 2,
            flagged_today: 2,
            active_customers: 5,
            system_health: 99.8,
            ai_accuracy: 94.2,
            recent_alerts: vec![RecentAlert {
                transaction_id: "TXN0001".to_string(),
                message: "High-risk transaction detected – ₹1,000".to_string(),
                date: "2025-12-04 10:00".to_string(),
                risk_score: 90,
            }],
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["totalAlertsToday"], 2);
        assert_eq!(value["flaggedToday"], 2);
        assert_eq!(value["activeCustomers"], 5);
        assert_eq!(value["systemHealth"], 99.8);
        assert_eq!(value["aiAccuracy"], 94.2);
        assert_eq!(value["recentAlerts"][0]["transactionId"], "TXN0001");
        assert_eq!(value["recentAlerts"][0]["riskScore"], 90);
    }

    #[test]
    fn test_fraud_metrics_default_is_zero() {
        let value = serde_json::to_value(FraudMetrics::default()).unwrap();
        assert_eq!(value["totalTransactions"], 0);
        assert_eq!(value["flaggedSuspicious"], 0);
        assert_eq!(value["highRiskClients"], 0);
        assert_eq!(value["averageRiskScore"], 0.0);
    }
}
