use std::time::Instant;

use crate::categorizer::EnrichedDetection;
use crate::detection::RawDetection;
use crate::stats::WasteStatistics;

use super::result::ImageSize;

pub struct PipelineContext {
    // Input
    pub image_size: ImageSize,
    pub started: Instant,

    // Step 1 result
    pub raw_detections: Vec<RawDetection>,

    // Step 2 result, confidence-descending after step_sort
    pub detections: Vec<EnrichedDetection>,

    // Step 3 result, measured right after sorting
    pub processing_time_seconds: f64,

    // Step 4 results
    pub statistics: WasteStatistics,
    pub recommendations: Vec<String>,
}

impl PipelineContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image_size: ImageSize { height, width },
            started: Instant::now(),
            raw_detections: Vec::new(),
            detections: Vec::new(),
            processing_time_seconds: 0.0,
            statistics: WasteStatistics::default(),
            recommendations: Vec::new(),
        }
    }
}
