use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::categorizer::{EnrichedDetection, WasteCategory};

/// Counts over one image's enriched detections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasteStatistics {
    pub by_category: BTreeMap<WasteCategory, usize>,
    pub by_material: BTreeMap<String, usize>,
    pub total_recyclable: usize,
    pub total_biodegradable: usize,
    pub total_non_recyclable: usize,
}

impl WasteStatistics {
    /// Number of detections these statistics were built from.
    pub fn total(&self) -> usize {
        self.total_recyclable + self.total_biodegradable + self.total_non_recyclable
    }
}

/// Each detection bumps one category entry, one material entry and exactly
/// one of the three totals.
pub fn aggregate(detections: &[EnrichedDetection]) -> WasteStatistics {
    let mut stats = WasteStatistics::default();

    for detection in detections {
        *stats
            .by_category
            .entry(detection.waste_category)
            .or_insert(0) += 1;
        *stats
            .by_material
            .entry(detection.class_name.clone())
            .or_insert(0) += 1;

        match detection.waste_category {
            WasteCategory::Recyclable => stats.total_recyclable += 1,
            WasteCategory::Biodegradable => stats.total_biodegradable += 1,
            WasteCategory::NonRecyclable => stats.total_non_recyclable += 1,
        }
    }

    stats
}
