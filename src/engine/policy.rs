//! Classification thresholds and pass-through gauges for the aggregator.

use serde::Deserialize;

/// Minimum score for a same-day transaction to count as an alert.
pub const ALERT_TODAY_THRESHOLD: i64 = 60;

/// Minimum score for a transaction to count as flagged/suspicious.
pub const FLAGGED_SUSPICIOUS_THRESHOLD: i64 = 70;

/// Minimum score that makes the transaction's customer a high-risk client.
pub const HIGH_RISK_CLIENT_THRESHOLD: i64 = 80;

/// Length of the active-customer window, in days before the reference day.
pub const ACTIVE_WINDOW_DAYS: u64 = 30;

/// Number of entries in the recent-alerts ranking.
pub const RECENT_ALERT_LIMIT: usize = 3;

/// Static system health gauge shown on the dashboard.
pub const DEFAULT_SYSTEM_HEALTH: f64 = 99.8;

/// Static model accuracy gauge shown on the dashboard.
pub const DEFAULT_AI_ACCURACY: f64 = 94.2;

/// Currency symbol prefixed to amounts in alert messages.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Risk policy injected into [`RiskAggregator`](super::RiskAggregator).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    pub alert_today_threshold: i64,
    pub flagged_suspicious_threshold: i64,
    pub high_risk_client_threshold: i64,
    pub active_window_days: u64,
    /// Count records dated after the reference time as active
    pub include_future_records: bool,
    pub recent_alert_limit: usize,
    pub system_health: f64,
    pub ai_accuracy: f64,
    pub currency_symbol: String,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            alert_today_threshold: ALERT_TODAY_THRESHOLD,
            flagged_suspicious_threshold: FLAGGED_SUSPICIOUS_THRESHOLD,
            high_risk_client_threshold: HIGH_RISK_CLIENT_THRESHOLD,
            active_window_days: ACTIVE_WINDOW_DAYS,
            include_future_records: true,
            recent_alert_limit: RECENT_ALERT_LIMIT,
            system_health: DEFAULT_SYSTEM_HEALTH,
            ai_accuracy: DEFAULT_AI_ACCURACY,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}
