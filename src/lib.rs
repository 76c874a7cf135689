//! Risk Dashboard Library
//!
//! Transaction risk aggregation for a compliance dashboard: normalizes the
//! model service's transaction feed and derives alert counts, active
//! customers, flagged/high-risk counts and a ranked list of urgent alerts.

pub mod api;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod types;
pub mod upstream;

pub use config::AppConfig;
pub use engine::{normalize, RiskAggregator, RiskPolicy, RiskReport};
pub use types::{dashboard::DashboardSummary, dashboard::FraudMetrics, transaction::TransactionRecord};
pub use upstream::ModelServiceClient;
