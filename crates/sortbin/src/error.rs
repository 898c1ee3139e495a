use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SortbinError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid material '{name}': {reason}")]
    InvalidMaterial { name: String, reason: String },
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not encode image: {0}")]
    Encode(String),
}

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Failed to load detection model '{path}': {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Detector returned an invalid result: {0}")]
    InvalidOutput(String),
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Maximum {limit} images allowed per batch, got {count}")]
    LimitExceeded { count: usize, limit: usize },
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,

    #[error("Worker panicked while classifying '{filename}'")]
    WorkerPanicked { filename: String },
}

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

pub type Result<T> = std::result::Result<T, SortbinError>;
