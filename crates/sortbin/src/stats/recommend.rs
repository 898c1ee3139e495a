use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::categorizer::EnrichedDetection;

pub const SEPARATE_PLASTICS: &str = "Separate plastics by type for better recycling efficiency.";
pub const HANDLE_GLASS: &str = "Handle glass carefully to avoid breakage and contamination.";
pub const COMPOST_BIODEGRADABLE: &str = "Compost biodegradable waste separately from recyclables.";
pub const SEPARATE_BINS: &str = "Consider using separate bins for different material types.";
pub const PROPERLY_SORTED: &str = "All detected materials appear to be properly sorted.";

/// Tunable thresholds for the recommendation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRules {
    /// More distinct materials than this triggers the separate-bins advice.
    #[serde(default = "default_separate_bins_threshold")]
    pub separate_bins_threshold: usize,
}

fn default_separate_bins_threshold() -> usize {
    3
}

impl Default for RecommendationRules {
    fn default() -> Self {
        Self {
            separate_bins_threshold: default_separate_bins_threshold(),
        }
    }
}

impl RecommendationRules {
    /// Rules fire in fixed order against the distinct material names; the
    /// fallback only appears when nothing else fired.
    pub fn recommend(&self, detections: &[EnrichedDetection]) -> Vec<String> {
        let materials: HashSet<&str> = detections
            .iter()
            .map(|d| d.class_name.as_str())
            .collect();

        let mut recommendations = Vec::new();

        if materials.contains("PLASTIC") {
            recommendations.push(SEPARATE_PLASTICS.to_string());
        }
        if materials.contains("GLASS") {
            recommendations.push(HANDLE_GLASS.to_string());
        }
        if materials.contains("BIODEGRADABLE") {
            recommendations.push(COMPOST_BIODEGRADABLE.to_string());
        }
        if materials.len() > self.separate_bins_threshold {
            recommendations.push(SEPARATE_BINS.to_string());
        }

        if recommendations.is_empty() {
            recommendations.push(PROPERLY_SORTED.to_string());
        }

        recommendations
    }
}

/// Recommendations with the default thresholds.
pub fn recommend(detections: &[EnrichedDetection]) -> Vec<String> {
    RecommendationRules::default().recommend(detections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::WasteCategory;
    use crate::detection::BoundingBox;

    fn detections(names: &[&str]) -> Vec<EnrichedDetection> {
        names
            .iter()
            .map(|name| EnrichedDetection {
                class_id: 0,
                class_name: name.to_string(),
                confidence: 0.5,
                bbox: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
                waste_category: WasteCategory::Recyclable,
                recycling_tip: String::new(),
            })
            .collect()
    }

    struct RecommendCase {
        name: &'static str,
        materials: &'static [&'static str],
        expected: &'static [&'static str],
    }

    const CASES: &[RecommendCase] = &[
        RecommendCase {
            name: "empty",
            materials: &[],
            expected: &[PROPERLY_SORTED],
        },
        RecommendCase {
            name: "plastic_and_glass",
            materials: &["GLASS", "PLASTIC"],
            expected: &[SEPARATE_PLASTICS, HANDLE_GLASS],
        },
        RecommendCase {
            name: "only_cardboard",
            materials: &["CARDBOARD", "CARDBOARD"],
            expected: &[PROPERLY_SORTED],
        },
        RecommendCase {
            name: "biodegradable",
            materials: &["BIODEGRADABLE"],
            expected: &[COMPOST_BIODEGRADABLE],
        },
        RecommendCase {
            name: "three_distinct_is_not_enough",
            materials: &["METAL", "PAPER", "CARDBOARD"],
            expected: &[PROPERLY_SORTED],
        },
        RecommendCase {
            name: "four_distinct_without_named_rules",
            materials: &["METAL", "PAPER", "CARDBOARD", "Unknown_7"],
            expected: &[SEPARATE_BINS],
        },
        RecommendCase {
            name: "everything",
            materials: &["BIODEGRADABLE", "GLASS", "PLASTIC", "METAL", "PLASTIC"],
            expected: &[
                SEPARATE_PLASTICS,
                HANDLE_GLASS,
                COMPOST_BIODEGRADABLE,
                SEPARATE_BINS,
            ],
        },
        RecommendCase {
            name: "lowercase_names_do_not_match",
            materials: &["plastic"],
            expected: &[PROPERLY_SORTED],
        },
    ];

    #[test]
    fn test_recommendation_table() {
        for case in CASES {
            let got = recommend(&detections(case.materials));
            assert_eq!(got, case.expected, "case '{}'", case.name);
        }
    }

    #[test]
    fn test_custom_threshold() {
        let rules = RecommendationRules {
            separate_bins_threshold: 1,
        };
        let got = rules.recommend(&detections(&["METAL", "PAPER"]));
        assert_eq!(got, vec![SEPARATE_BINS.to_string()]);
    }
}
