//! Object detector boundary: raw detection types and the `Detector` trait.

pub mod postprocess;
#[cfg(feature = "yolo")]
pub mod yolo;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::DetectionError;

#[cfg(feature = "yolo")]
pub use yolo::YoloDetector;

/// Axis-aligned box in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a box from a center point and size, the layout YOLO heads emit.
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x1: cx - width / 2.0,
            y1: cy - height / 2.0,
            x2: cx + width / 2.0,
            y2: cy + height / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 > x1 && y2 > y1 {
            (x2 - x1) * (y2 - y1)
        } else {
            0.0
        }
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

/// One object as reported by the detector, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub class_id: u32,
    pub class_name: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Pluggable object detection backend.
///
/// Implementations must be shareable across batch workers; the pipeline holds
/// one instance behind an `Arc` and calls `detect` concurrently.
pub trait Detector: Send + Sync {
    /// Backend name for logs and the health endpoint.
    fn name(&self) -> &str;

    /// Class names indexed by class id.
    fn class_names(&self) -> Vec<String>;

    /// Detect objects in an RGB image.
    fn detect(&self, image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError>;
}

/// Detector that returns the same preset detections for every image.
///
/// Useful for tests and for running the service without a model.
pub struct FixedDetector {
    detections: Vec<RawDetection>,
    class_names: Vec<String>,
}

impl FixedDetector {
    pub fn new(detections: Vec<RawDetection>) -> Self {
        let mut class_names: Vec<String> = Vec::new();
        for detection in &detections {
            if !class_names.contains(&detection.class_name) {
                class_names.push(detection.class_name.clone());
            }
        }
        Self {
            detections,
            class_names,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_class_names(mut self, class_names: Vec<String>) -> Self {
        self.class_names = class_names;
        self
    }
}

impl Detector for FixedDetector {
    fn name(&self) -> &str {
        "fixed"
    }

    fn class_names(&self) -> Vec<String> {
        self.class_names.clone()
    }

    fn detect(&self, _image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError> {
        Ok(self.detections.clone())
    }
}

/// Resolves a model class id to its name, `Unknown_{id}` when out of range.
pub fn class_name_for(class_names: &[String], class_id: u32) -> String {
    class_names
        .get(class_id as usize)
        .cloned()
        .unwrap_or_else(|| format!("Unknown_{}", class_id))
}
