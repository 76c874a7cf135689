//! Wire types for the risk dashboard service

pub mod dashboard;
pub mod scoring;
pub mod transaction;

pub use dashboard::{DashboardSummary, FraudMetrics, RecentAlert};
pub use scoring::{
    FraudScoreRequest, FraudScoreResponse, LoanScoreRequest, LoanScoreResponse, RiskBands,
    RiskLevel,
};
pub use transaction::TransactionRecord;
