//! Tracing Setup
//!
//! Initializes the global `tracing` subscriber from [`LoggingConfig`].
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides `observability.logging.level` when set
//! - `observability.logging.format`: `pretty` (console) or `json`
//! - `observability.logging.include_spans`: attach span context to events
//!
//! # Usage
//!
//! ```rust,ignore
//! use pntvl_engine::telemetry::init_telemetry;
//!
//! let config = load_config(None)?;
//! init_telemetry(&config.observability.logging)?;
//! ```

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::{LogFormat, LoggingConfig};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("INVALID_LOG_FILTER: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber is already installed.
    #[error("SUBSCRIBER_INIT: {0}")]
    Init(String),
}

/// Build the level filter: `RUST_LOG` if set, the configured level otherwise.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] if the configured level does not parse.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.level)?),
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] if the filter is invalid or a subscriber was
/// already installed.
pub fn init_telemetry(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;
    let span_events = if config.include_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(span_events)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    tracing::debug!(
        level = %config.level,
        format = ?config.format,
        include_spans = config.include_spans,
        "Tracing initialized"
    );
    Ok(())
}
