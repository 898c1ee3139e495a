pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod result;
pub mod runner;

pub use config::PipelineConfig;
pub use context::PipelineContext;
pub use error::PipelineError;
pub use progress::{NoopProgress, PipelinePhase, ProgressEvent, ProgressReporter};
pub use result::{AnnotatedClassification, ClassificationResult, ImageSize};
pub use runner::ClassificationPipeline;
