//! Transaction risk aggregation engine.
//!
//! Pure, synchronous computation: raw records go through [`normalize`] and
//! then [`RiskAggregator`]. No I/O, no shared state.

pub mod aggregator;
pub mod format;
pub mod normalizer;
pub mod policy;

pub use aggregator::{RiskAggregator, RiskReport};
pub use normalizer::{normalize, parse_date_text, NormalizedRecord};
pub use policy::RiskPolicy;
