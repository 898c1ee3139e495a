use serde::{Deserialize, Serialize};

use crate::annotate::AnnotationStyle;
use crate::categorizer::registry::DEFAULT_MATERIALS;
use crate::categorizer::MaterialInfo;
use crate::stats::RecommendationRules;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default = "default_materials")]
    pub materials: Vec<MaterialInfo>,
    #[serde(default)]
    pub recommendations: RecommendationRules,
    #[serde(default)]
    pub annotation: AnnotationStyle,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            app_name: default_app_name(),
            detector: DetectorConfig::default(),
            batch: BatchConfig::default(),
            upload: UploadConfig::default(),
            materials: default_materials(),
            recommendations: RecommendationRules::default(),
            annotation: AnnotationStyle::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_app_name() -> String {
    "Sortbin".to_string()
}

fn default_materials() -> Vec<MaterialInfo> {
    DEFAULT_MATERIALS
        .iter()
        .map(|(name, category, tip)| MaterialInfo::new(name, *category, tip))
        .collect()
}

/// Object detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Path to the ONNX model file (only used by the `yolo` backend).
    #[serde(default)]
    pub model_path: Option<String>,
    /// Class names indexed by model class id.
    #[serde(default = "default_class_names")]
    pub class_names: Vec<String>,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f32,
    /// Square input edge length the model was exported with.
    #[serde(default = "default_image_size")]
    pub image_size: u32,
}

fn default_class_names() -> Vec<String> {
    DEFAULT_MATERIALS
        .iter()
        .map(|(name, _, _)| name.to_string())
        .collect()
}

fn default_confidence_threshold() -> f32 {
    0.25
}

fn default_iou_threshold() -> f32 {
    0.45
}

fn default_image_size() -> u32 {
    640
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            class_names: default_class_names(),
            confidence_threshold: default_confidence_threshold(),
            iou_threshold: default_iou_threshold(),
            image_size: default_image_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
}

fn default_max_items() -> usize {
    20
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            worker_count: default_worker_count(),
        }
    }
}

/// Limits applied by the transport layer before bytes reach the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_allowed_mime_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/jpg", "image/webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_mime_types: default_allowed_mime_types(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl UploadConfig {
    pub fn is_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}
