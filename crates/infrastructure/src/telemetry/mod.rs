//! Logging initialization
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` takes precedence
//! over the configured filter. Output goes to stderr so that command
//! output on stdout stays machine-readable.

use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TelemetryAppConfig;

/// Telemetry initialization errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to initialize subscriber: {0}")]
    Init(String),
}

/// Build the filter from `RUST_LOG` or, when unset, the configured directive
pub fn build_filter(config: &TelemetryAppConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_filter).map_err(|e| TelemetryError::InvalidFilter {
        filter: config.log_filter.clone(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_telemetry(config: &TelemetryAppConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    }

    info!(json = config.json, filter = %config.log_filter, "Telemetry initialized");
    Ok(())
}
