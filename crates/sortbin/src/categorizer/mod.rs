pub mod enricher;
pub mod registry;

use serde::{Deserialize, Serialize};

pub use enricher::{EnrichedDetection, Enricher};
pub use registry::{CategoryRegistry, MaterialInfo, FALLBACK_TIP};

/// Coarse recyclability bucket assigned to every material class.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum WasteCategory {
    /// Also the fallback for materials the registry does not know.
    #[default]
    Recyclable,
    Biodegradable,
    NonRecyclable,
}

impl WasteCategory {
    pub const ALL: [WasteCategory; 3] = [
        WasteCategory::Recyclable,
        WasteCategory::Biodegradable,
        WasteCategory::NonRecyclable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WasteCategory::Recyclable => "recyclable",
            WasteCategory::Biodegradable => "biodegradable",
            WasteCategory::NonRecyclable => "non_recyclable",
        }
    }
}

impl std::fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WasteCategory::Recyclable => write!(f, "Recyclable"),
            WasteCategory::Biodegradable => write!(f, "Biodegradable"),
            WasteCategory::NonRecyclable => write!(f, "Non-recyclable"),
        }
    }
}
