//! Builders for detections, configs and encoded test images.

#![allow(dead_code)]

use image::{Rgb, RgbImage};

use sortbin::batch::BatchItem;
use sortbin::categorizer::{MaterialInfo, WasteCategory};
use sortbin::codec;
use sortbin::config::Config;
use sortbin::detection::{BoundingBox, RawDetection};

/// Builder for creating `RawDetection` instances.
pub struct DetectionBuilder {
    class_id: u32,
    class_name: String,
    confidence: f32,
    bbox: BoundingBox,
}

impl DetectionBuilder {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_id: 0,
            class_name: class_name.to_string(),
            confidence: 0.5,
            bbox: BoundingBox::new(2.0, 20.0, 30.0, 40.0),
        }
    }

    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn bbox(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = BoundingBox::new(x1, y1, x2, y2);
        self
    }

    pub fn build(self) -> RawDetection {
        RawDetection {
            class_id: self.class_id,
            class_name: self.class_name,
            confidence: self.confidence,
            bbox: self.bbox,
        }
    }
}

/// Shorthand for a detection with only name and confidence set.
pub fn detection(class_name: &str, confidence: f32) -> RawDetection {
    DetectionBuilder::new(class_name)
        .confidence(confidence)
        .build()
}

/// Builder for creating `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Defaults, with a single worker so batch order is trivially stable.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.batch.worker_count = 1;
        Self { config }
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.config.batch.max_items = max_items;
        self
    }

    pub fn worker_count(mut self, worker_count: usize) -> Self {
        self.config.batch.worker_count = worker_count;
        self
    }

    pub fn separate_bins_threshold(mut self, threshold: usize) -> Self {
        self.config.recommendations.separate_bins_threshold = threshold;
        self
    }

    pub fn material(mut self, class_name: &str, category: WasteCategory, tip: &str) -> Self {
        self.config
            .materials
            .push(MaterialInfo::new(class_name, category, tip));
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A small gradient image so encoders have something non-trivial to work on.
pub fn test_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 90])
    })
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    codec::encode_png(&test_image(width, height)).expect("Failed to encode test PNG")
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    codec::encode_jpeg(&test_image(width, height), 90).expect("Failed to encode test JPEG")
}

/// Batch of valid PNG items named `image_1.png`, `image_2.png`, ...
pub fn png_items(count: usize) -> Vec<BatchItem> {
    (1..=count)
        .map(|i| BatchItem::new(format!("image_{i}.png"), png_bytes(16, 16)))
        .collect()
}
