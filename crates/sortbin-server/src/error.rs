use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use sortbin::error::BatchError;
use sortbin::pipeline::PipelineError;

/// Rejections raised while reading a multipart upload.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File type not supported. Allowed types: {allowed}")]
    UnsupportedMediaType { allowed: String },

    #[error("File too large. Maximum size is {max_mb}MB.")]
    PayloadTooLarge { max_mb: usize },

    #[error("Invalid multipart request: {0}")]
    Multipart(String),

    #[error("No file provided in field '{field}'")]
    MissingFile { field: &'static str },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            ApiError::Upload(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Batch(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Pipeline(PipelineError::Decode(_)) => (
                StatusCode::BAD_REQUEST,
                "Could not decode image. Please check the file format.".to_string(),
            ),
            ApiError::Pipeline(_) | ApiError::Task(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error processing image. Please try again.".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}
