//! Read-only service information: the recycling guide and health summary.

use serde::{Deserialize, Serialize};

use crate::categorizer::{CategoryRegistry, MaterialInfo};
use crate::detection::Detector;

pub const GENERAL_TIPS: &[&str] = &[
    "Always clean containers before recycling",
    "Remove lids and caps when required",
    "Flatten cardboard boxes to save space",
    "Check local recycling guidelines for specific rules",
    "When in doubt, throw it out to avoid contamination",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecyclingGuide {
    pub materials: Vec<MaterialInfo>,
    pub general_tips: Vec<String>,
}

impl RecyclingGuide {
    pub fn from_registry(registry: &CategoryRegistry) -> Self {
        Self {
            materials: registry.list_known_materials(),
            general_tips: GENERAL_TIPS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInfo {
    pub status: String,
    /// Configured `app_name`.
    pub service: String,
    pub model_loaded: bool,
    pub total_classes: usize,
    pub class_names: Vec<String>,
    pub version: String,
}

impl HealthInfo {
    pub fn new(service: &str, detector: &dyn Detector, model_loaded: bool) -> Self {
        let class_names = detector.class_names();
        Self {
            status: "healthy".to_string(),
            service: service.to_string(),
            model_loaded,
            total_classes: class_names.len(),
            class_names,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
