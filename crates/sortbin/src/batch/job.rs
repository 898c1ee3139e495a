use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info_span, warn};
use uuid::Uuid;

use crate::error::WorkerError;
use crate::pipeline::{ClassificationPipeline, ClassificationResult};
use crate::sanitize;

/// One uploaded image awaiting classification.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl BatchItem {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Result of one batch item. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemOutcome {
    filename: String,
    result: Option<ClassificationResult>,
    error: Option<String>,
}

impl BatchItemOutcome {
    pub fn success(filename: String, result: ClassificationResult) -> Self {
        Self {
            filename,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(filename: String, error: String) -> Self {
        Self {
            filename,
            result: None,
            error: Some(error),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

/// Outcomes of a whole batch in input order, plus counters.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(rename = "results")]
    pub outcomes: Vec<BatchItemOutcome>,
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn from_outcomes(
        batch_id: Uuid,
        started_at: DateTime<Utc>,
        outcomes: Vec<BatchItemOutcome>,
    ) -> Self {
        let successful = outcomes.iter().filter(|o| o.is_success()).count();
        let total_processed = outcomes.len();
        Self {
            batch_id,
            started_at,
            outcomes,
            total_processed,
            successful,
            failed: total_processed - successful,
        }
    }
}

/// Decodes and classifies one item, turning every failure (including a
/// panic inside the detector) into a failed outcome.
pub fn classify_item(pipeline: &ClassificationPipeline, item: BatchItem) -> BatchItemOutcome {
    let BatchItem { filename, bytes } = item;
    let redacted = sanitize::redact_filename(&filename);
    let _span = info_span!("batch_item", filename = %redacted).entered();

    let attempt = panic::catch_unwind(AssertUnwindSafe(|| pipeline.classify_bytes(&bytes)));

    match attempt {
        Ok(Ok(result)) => BatchItemOutcome::success(filename, result),
        Ok(Err(e)) => {
            warn!(error = %e, "Batch item failed");
            BatchItemOutcome::failure(filename, e.to_string())
        }
        Err(_) => {
            let e = WorkerError::WorkerPanicked {
                filename: redacted,
            };
            error!(error = %e, "Batch item panicked");
            BatchItemOutcome::failure(filename, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ImageSize;
    use crate::stats::WasteStatistics;

    fn empty_result() -> ClassificationResult {
        ClassificationResult {
            detections: Vec::new(),
            total_objects: 0,
            processing_time_seconds: 0.01,
            image_size: ImageSize {
                height: 1,
                width: 1,
            },
            waste_statistics: WasteStatistics::default(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn test_outcome_constructors_are_exclusive() {
        let ok = BatchItemOutcome::success("a.jpg".to_string(), empty_result());
        assert!(ok.is_success());
        assert!(ok.error().is_none());

        let failed = BatchItemOutcome::failure("b.jpg".to_string(), "boom".to_string());
        assert!(!failed.is_success());
        assert!(failed.result().is_none());
        assert_eq!(failed.error(), Some("boom"));
        assert_eq!(failed.filename(), "b.jpg");
    }

    #[test]
    fn test_report_counters() {
        let report = BatchReport::from_outcomes(
            Uuid::new_v4(),
            Utc::now(),
            vec![
                BatchItemOutcome::success("a.jpg".to_string(), empty_result()),
                BatchItemOutcome::failure("b.jpg".to_string(), "boom".to_string()),
                BatchItemOutcome::success("c.jpg".to_string(), empty_result()),
            ],
        );

        assert_eq!(report.total_processed, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_report_serializes_outcomes_as_results() {
        let report = BatchReport::from_outcomes(
            Uuid::new_v4(),
            Utc::now(),
            vec![BatchItemOutcome::failure(
                "b.jpg".to_string(),
                "boom".to_string(),
            )],
        );
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["results"][0]["filename"], "b.jpg");
        assert_eq!(json["results"][0]["error"], "boom");
        assert!(json["results"][0]["result"].is_null());
        assert_eq!(json["failed"], 1);
    }
}
