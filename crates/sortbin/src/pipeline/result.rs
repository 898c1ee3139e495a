use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::categorizer::EnrichedDetection;
use crate::stats::WasteStatistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub height: u32,
    pub width: u32,
}

/// Everything known about one classified image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Sorted by confidence, highest first; ties keep detector order.
    pub detections: Vec<EnrichedDetection>,
    pub total_objects: usize,
    pub processing_time_seconds: f64,
    pub image_size: ImageSize,
    pub waste_statistics: WasteStatistics,
    pub recommendations: Vec<String>,
}

/// Output of the annotate-from-bytes path: the rendered JPEG alongside the
/// decoded annotated image and its classification.
#[derive(Debug, Clone)]
pub struct AnnotatedClassification {
    pub image: RgbImage,
    pub jpeg: Vec<u8>,
    pub result: ClassificationResult,
}
