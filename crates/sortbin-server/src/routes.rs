use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use sortbin::batch::{BatchItem, BatchItemOutcome, BatchReport};
use sortbin::error::BatchError;
use sortbin::sanitize::redact_filename;
use sortbin::{ClassificationResult, HealthInfo, MaterialInfo, RecyclingGuide};

use crate::error::ApiError;
use crate::state::AppState;
use crate::upload::{read_files, read_single_file};

/// Extra room for multipart framing on top of the file payloads.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .upload
        .max_bytes
        .saturating_mul(state.config.batch.max_items.max(1))
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/classify", post(classify))
        .route("/api/classify/annotate-image", post(classify_annotate))
        .route("/api/batch_classify", post(batch_classify))
        .route("/api/classes", get(classes))
        .route("/api/recycling-guide", get(recycling_guide))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthInfo> {
    Json(HealthInfo::new(
        &state.config.app_name,
        state.pipeline().detector(),
        state.model_loaded,
    ))
}

async fn classes(State(state): State<AppState>) -> Json<Vec<MaterialInfo>> {
    Json(state.pipeline().registry().list_known_materials())
}

#[derive(Debug, Serialize)]
struct GuideResponse {
    guide: RecyclingGuide,
}

async fn recycling_guide(State(state): State<AppState>) -> Json<GuideResponse> {
    Json(GuideResponse {
        guide: RecyclingGuide::from_registry(state.pipeline().registry()),
    })
}

#[instrument(skip_all)]
async fn classify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassificationResult>, ApiError> {
    let upload = read_single_file(&mut multipart, "file").await?;
    upload.validate(&state.config.upload)?;
    info!(file = %redact_filename(&upload.filename), bytes = upload.bytes.len(), "Classifying upload");

    let orchestrator = Arc::clone(&state.orchestrator);
    let result = tokio::task::spawn_blocking(move || {
        orchestrator.pipeline().classify_bytes(&upload.bytes)
    })
    .await
    .map_err(|e| ApiError::Task(e.to_string()))??;

    Ok(Json(result))
}

#[instrument(skip_all)]
async fn classify_annotate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_single_file(&mut multipart, "file").await?;
    upload.validate(&state.config.upload)?;
    info!(file = %redact_filename(&upload.filename), bytes = upload.bytes.len(), "Annotating upload");

    let orchestrator = Arc::clone(&state.orchestrator);
    let annotated = tokio::task::spawn_blocking(move || {
        orchestrator
            .pipeline()
            .classify_and_annotate_bytes(&upload.bytes)
    })
    .await
    .map_err(|e| ApiError::Task(e.to_string()))??;

    let headers = [
        ("content-type", "image/jpeg".to_string()),
        (
            "x-detection-count",
            annotated.result.total_objects.to_string(),
        ),
        (
            "x-processing-time",
            format!("{:.3}", annotated.result.processing_time_seconds),
        ),
    ];
    Ok((headers, annotated.jpeg))
}

#[derive(Debug, Deserialize)]
struct BatchQuery {
    limit: Option<usize>,
}

/// Upload validation failures are recorded against their own item; only an
/// oversized batch rejects the whole request.
///
/// `?limit=N` can lower the configured `batch.max_items` but never raise it,
/// since the request body cap is sized from the configured value.
#[instrument(skip_all)]
async fn batch_classify(
    State(state): State<AppState>,
    query: Result<Query<BatchQuery>, QueryRejection>,
    mut multipart: Multipart,
) -> Result<Json<BatchReport>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let limit = effective_limit(query.limit, state.config.batch.max_items);
    let uploads = read_files(&mut multipart, "files").await?;

    if uploads.len() > limit {
        return Err(BatchError::LimitExceeded {
            count: uploads.len(),
            limit,
        }
        .into());
    }

    let mut rejected: Vec<(usize, BatchItemOutcome)> = Vec::new();
    let mut accepted: Vec<(usize, BatchItem)> = Vec::new();
    for (index, upload) in uploads.into_iter().enumerate() {
        match upload.validate(&state.config.upload) {
            Ok(()) => accepted.push((index, BatchItem::new(upload.filename, upload.bytes))),
            Err(e) => rejected.push((
                index,
                BatchItemOutcome::failure(upload.filename, e.to_string()),
            )),
        }
    }
    info!(
        accepted = accepted.len(),
        rejected = rejected.len(),
        limit,
        "Batch upload received"
    );

    let orchestrator = Arc::clone(&state.orchestrator);
    let (indices, items): (Vec<usize>, Vec<BatchItem>) = accepted.into_iter().unzip();
    let report = tokio::task::spawn_blocking(move || orchestrator.run_batch(items, limit))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;

    if rejected.is_empty() {
        return Ok(Json(report));
    }

    let batch_id = report.batch_id;
    let started_at = report.started_at;
    let mut merged: Vec<(usize, BatchItemOutcome)> =
        indices.into_iter().zip(report.outcomes).collect();
    merged.extend(rejected);
    merged.sort_by_key(|(index, _)| *index);

    Ok(Json(BatchReport::from_outcomes(
        batch_id,
        started_at,
        merged.into_iter().map(|(_, outcome)| outcome).collect(),
    )))
}

fn effective_limit(requested: Option<usize>, configured: usize) -> usize {
    requested.map_or(configured, |limit| limit.min(configured))
}

async fn not_found() -> impl IntoResponse {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Not Found" })),
    )
}
