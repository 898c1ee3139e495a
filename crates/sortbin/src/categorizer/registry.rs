use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::WasteCategory;

/// Tip returned for materials the registry has no entry for.
pub const FALLBACK_TIP: &str = "Check local recycling guidelines.";

/// Material classes of the stock garbage model, in model class-id order.
pub const DEFAULT_MATERIALS: &[(&str, WasteCategory, &str)] = &[
    (
        "BIODEGRADABLE",
        WasteCategory::Biodegradable,
        "Compost food scraps and plant matter; keep packaging out of the compost bin.",
    ),
    (
        "CARDBOARD",
        WasteCategory::Recyclable,
        "Flatten boxes, keep them dry and remove tape or packing material.",
    ),
    (
        "GLASS",
        WasteCategory::Recyclable,
        "Rinse bottles and jars, remove lids and sort by color where required.",
    ),
    (
        "METAL",
        WasteCategory::Recyclable,
        "Rinse cans and make sure aerosol cans are completely empty.",
    ),
    (
        "PAPER",
        WasteCategory::Recyclable,
        "Keep paper clean and dry; food-soiled paper belongs in residual waste.",
    ),
    (
        "PLASTIC",
        WasteCategory::Recyclable,
        "Check the resin code, rinse containers and remove caps before recycling.",
    ),
];

/// One registry entry, as listed by the classes and recycling-guide endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialInfo {
    pub class_name: String,
    pub waste_category: WasteCategory,
    pub recycling_tip: String,
}

impl MaterialInfo {
    pub fn new(class_name: &str, waste_category: WasteCategory, recycling_tip: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            waste_category,
            recycling_tip: recycling_tip.to_string(),
        }
    }
}

/// Read-only mapping from material class name to waste category and tip.
///
/// Built once at startup and shared behind an `Arc`; lookups never fail.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    materials: Vec<MaterialInfo>,
    index: HashMap<String, usize>,
}

impl CategoryRegistry {
    /// Builds a registry from material entries. A repeated class name replaces
    /// the earlier entry but keeps its position in the listing.
    pub fn from_materials<I>(materials: I) -> Self
    where
        I: IntoIterator<Item = MaterialInfo>,
    {
        let mut registry = Self {
            materials: Vec::new(),
            index: HashMap::new(),
        };

        for material in materials {
            match registry.index.get(&material.class_name) {
                Some(&position) => registry.materials[position] = material,
                None => {
                    registry
                        .index
                        .insert(material.class_name.clone(), registry.materials.len());
                    registry.materials.push(material);
                }
            }
        }

        registry
    }

    pub fn lookup_category(&self, material_name: &str) -> WasteCategory {
        self.get(material_name)
            .map(|m| m.waste_category)
            .unwrap_or_default()
    }

    pub fn lookup_tip(&self, material_name: &str) -> &str {
        self.get(material_name)
            .map(|m| m.recycling_tip.as_str())
            .unwrap_or(FALLBACK_TIP)
    }

    /// All known materials in registration order.
    pub fn list_known_materials(&self) -> Vec<MaterialInfo> {
        self.materials.clone()
    }

    pub fn contains(&self, material_name: &str) -> bool {
        self.index.contains_key(material_name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    fn get(&self, material_name: &str) -> Option<&MaterialInfo> {
        self.index
            .get(material_name)
            .map(|&position| &self.materials[position])
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::from_materials(
            DEFAULT_MATERIALS
                .iter()
                .map(|(name, category, tip)| MaterialInfo::new(name, *category, tip)),
        )
    }
}
