//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryAppConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryAppConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json: false,
        }
    }
}
