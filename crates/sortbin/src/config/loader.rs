use std::collections::HashSet;
use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let detector = &config.detector;
    for (name, value) in [
        ("confidence_threshold", detector.confidence_threshold),
        ("iou_threshold", detector.iou_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation {
                message: format!("detector.{} must be within [0, 1], got {}", name, value),
            });
        }
    }
    if detector.image_size == 0 {
        return Err(ConfigError::Validation {
            message: "detector.image_size must be > 0".to_string(),
        });
    }

    if config.batch.max_items == 0 {
        return Err(ConfigError::Validation {
            message: "batch.max_items must be > 0".to_string(),
        });
    }
    if config.batch.worker_count == 0 {
        return Err(ConfigError::Validation {
            message: "batch.worker_count must be > 0".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for material in &config.materials {
        if material.class_name.trim().is_empty() {
            return Err(ConfigError::InvalidMaterial {
                name: material.class_name.clone(),
                reason: "Material name must not be empty".to_string(),
            });
        }
        if !seen.insert(material.class_name.as_str()) {
            return Err(ConfigError::InvalidMaterial {
                name: material.class_name.clone(),
                reason: "Duplicate material name".to_string(),
            });
        }
    }

    Ok(())
}
