use std::fmt;

/// Steps of a single-image classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Decoding,
    Detecting,
    Enriching,
    Aggregating,
    Annotating,
    Encoding,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelinePhase::Decoding => "decoding",
            PipelinePhase::Detecting => "detecting",
            PipelinePhase::Enriching => "enriching",
            PipelinePhase::Aggregating => "aggregating",
            PipelinePhase::Annotating => "annotating",
            PipelinePhase::Encoding => "encoding",
        };
        f.write_str(name)
    }
}

/// Events emitted by the pipeline during processing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Phase {
        phase: PipelinePhase,
        message: String,
    },
    Completed {
        total_objects: usize,
        processing_time_seconds: f64,
    },
    Failed {
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Reporter that drops every event.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}
