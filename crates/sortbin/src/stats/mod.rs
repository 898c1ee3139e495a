//! Per-image waste statistics and recycling recommendations.

pub mod aggregator;
pub mod recommend;

pub use aggregator::{aggregate, WasteStatistics};
pub use recommend::{recommend, RecommendationRules};
