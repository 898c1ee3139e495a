use std::sync::Arc;

use tracing::warn;

use sortbin::batch::BatchOrchestrator;
use sortbin::config::Config;
use sortbin::detection::{Detector, FixedDetector};
use sortbin::pipeline::ClassificationPipeline;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<BatchOrchestrator>,
    pub model_loaded: bool,
}

impl AppState {
    pub fn new(config: Config, detector: Arc<dyn Detector>, model_loaded: bool) -> Self {
        let pipeline = ClassificationPipeline::from_config(&config, detector);
        let orchestrator = BatchOrchestrator::new(Arc::new(pipeline), config.batch.clone());
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            model_loaded,
        }
    }

    pub fn pipeline(&self) -> &ClassificationPipeline {
        self.orchestrator.pipeline()
    }
}

/// Builds the configured detector. Without a usable model the service still
/// starts, reporting `model_loaded: false` and detecting nothing.
pub fn build_detector(config: &Config) -> (Arc<dyn Detector>, bool) {
    #[cfg(feature = "yolo")]
    {
        match sortbin::detection::YoloDetector::from_config(&config.detector) {
            Ok(detector) => return (Arc::new(detector), true),
            Err(e) => warn!(error = %e, "Failed to load YOLO model"),
        }
    }

    #[cfg(not(feature = "yolo"))]
    warn!("Built without the `yolo` feature; no model will be loaded");

    let fallback = FixedDetector::empty().with_class_names(config.detector.class_names.clone());
    (Arc::new(fallback), false)
}
