//! Test harness for isolated pipeline and batch execution.
//!
//! `TestHarness` wires a `ClassificationPipeline` and `BatchOrchestrator`
//! around a `ScriptedDetector`, and owns a temp directory for config files.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use image::RgbImage;
use tempfile::TempDir;

use sortbin::batch::BatchOrchestrator;
use sortbin::config::Config;
use sortbin::detection::{Detector, RawDetection};
use sortbin::error::DetectionError;
use sortbin::pipeline::ClassificationPipeline;

/// What the scripted detector does for an image of a given width.
#[derive(Clone)]
pub enum Script {
    Detect(Vec<RawDetection>),
    Fail(String),
    Panic,
}

/// Detector whose behavior is keyed by the input image width, so batch
/// tests can make individual items misbehave.
pub struct ScriptedDetector {
    default: Vec<RawDetection>,
    by_width: HashMap<u32, Script>,
}

impl ScriptedDetector {
    pub fn new(default: Vec<RawDetection>) -> Self {
        Self {
            default,
            by_width: HashMap::new(),
        }
    }

    pub fn on_width(mut self, width: u32, script: Script) -> Self {
        self.by_width.insert(width, script);
        self
    }
}

impl Detector for ScriptedDetector {
    fn name(&self) -> &str {
        "scripted"
    }

    fn class_names(&self) -> Vec<String> {
        self.default.iter().map(|d| d.class_name.clone()).collect()
    }

    fn detect(&self, image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError> {
        match self.by_width.get(&image.width()) {
            Some(Script::Detect(detections)) => Ok(detections.clone()),
            Some(Script::Fail(message)) => Err(DetectionError::Inference(message.clone())),
            Some(Script::Panic) => panic!("scripted detector panic"),
            None => Ok(self.default.clone()),
        }
    }
}

/// Test harness providing an isolated execution environment.
pub struct TestHarness {
    temp_dir: TempDir,
    pub config: Config,
    detector: Arc<dyn Detector>,
}

impl TestHarness {
    pub fn new(config: Config, detector: impl Detector + 'static) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            temp_dir,
            config,
            detector: Arc::new(detector),
        }
    }

    /// Harness whose detector returns `detections` for every image.
    pub fn with_detections(detections: Vec<RawDetection>) -> Self {
        Self::new(
            super::ConfigBuilder::new().build(),
            ScriptedDetector::new(detections),
        )
    }

    pub fn pipeline(&self) -> ClassificationPipeline {
        ClassificationPipeline::from_config(&self.config, Arc::clone(&self.detector))
    }

    pub fn orchestrator(&self) -> BatchOrchestrator {
        BatchOrchestrator::new(Arc::new(self.pipeline()), self.config.batch.clone())
    }

    /// Write a config file into the temp directory.
    pub fn write_config(&self, filename: &str, config: &Config) -> PathBuf {
        let json = serde_json::to_string_pretty(config).expect("Failed to serialize config");
        self.write_config_str(filename, &json)
    }

    pub fn write_config_str(&self, filename: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(filename);
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }
}
