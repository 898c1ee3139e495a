//! Process-wide tracing setup.

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;
use crate::error::TelemetryError;

/// Installs the global subscriber and bridges `log` records into it.
///
/// `RUST_LOG` wins over `config.filter` when set. Call once at startup.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), &config.filter)?;

    let output: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
        fmt::layer().json().with_current_span(true).boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    let subscriber = tracing_subscriber::registry().with(output).with(filter);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TelemetryError::Install(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| TelemetryError::Install(e.to_string()))?;

    Ok(())
}

/// Picks the env override when present and non-blank, else the fallback.
pub fn build_filter(env_value: Option<String>, fallback: &str) -> Result<EnvFilter, TelemetryError> {
    let directives = env_value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());

    EnvFilter::try_new(&directives).map_err(|e| TelemetryError::InvalidFilter {
        filter: directives.clone(),
        reason: e.to_string(),
    })
}
