use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::detection::{BoundingBox, RawDetection};

use super::{CategoryRegistry, WasteCategory};

/// A raw detection with its waste category and recycling tip attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDetection {
    pub class_id: u32,
    pub class_name: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
    pub waste_category: WasteCategory,
    pub recycling_tip: String,
}

/// Attaches registry semantics to detector output.
///
/// Pure: the only input besides the detection is the immutable registry.
#[derive(Debug, Clone)]
pub struct Enricher {
    registry: Arc<CategoryRegistry>,
}

impl Enricher {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Never rejects input; confidence and box values pass through untouched.
    pub fn enrich(&self, raw: RawDetection) -> EnrichedDetection {
        let waste_category = self.registry.lookup_category(&raw.class_name);
        let recycling_tip = self.registry.lookup_tip(&raw.class_name).to_string();

        EnrichedDetection {
            class_id: raw.class_id,
            class_name: raw.class_name,
            confidence: raw.confidence,
            bbox: raw.bbox,
            waste_category,
            recycling_tip,
        }
    }

    pub fn enrich_all(&self, raws: Vec<RawDetection>) -> Vec<EnrichedDetection> {
        raws.into_iter().map(|raw| self.enrich(raw)).collect()
    }
}
