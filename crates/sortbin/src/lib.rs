pub mod annotate;
pub mod batch;
pub mod categorizer;
pub mod codec;
pub mod config;
pub mod detection;
pub mod error;
pub mod guide;
pub mod pipeline;
pub mod sanitize;
pub mod stats;
pub mod telemetry;

pub use annotate::{annotate, AnnotationStyle};
pub use batch::{BatchItem, BatchItemOutcome, BatchOrchestrator, BatchReport};
pub use categorizer::{CategoryRegistry, EnrichedDetection, Enricher, MaterialInfo, WasteCategory};
pub use config::{load_config, load_config_from_str, Config};
#[cfg(feature = "yolo")]
pub use detection::YoloDetector;
pub use detection::{BoundingBox, Detector, FixedDetector, RawDetection};
pub use error::{
    BatchError, CodecError, ConfigError, DetectionError, Result, SortbinError, TelemetryError,
    WorkerError,
};
pub use guide::{HealthInfo, RecyclingGuide};
pub use pipeline::{ClassificationPipeline, ClassificationResult, ImageSize, PipelineError};
pub use stats::{aggregate, recommend, RecommendationRules, WasteStatistics};
