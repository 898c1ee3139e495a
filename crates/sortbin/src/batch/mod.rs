//! Runs the single-image pipeline over many uploads with per-item failure
//! isolation.

pub mod job;
pub mod orchestrator;
pub mod pool;

pub use job::{classify_item, BatchItem, BatchItemOutcome, BatchReport};
pub use orchestrator::BatchOrchestrator;
pub use pool::WorkerPool;
