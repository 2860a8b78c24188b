//! Batch run and schedule configuration.

use std::time::Duration;

use application::services::BatchConfig;
use serde::{Deserialize, Serialize};

/// Settings for one multi-region run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAppConfig {
    /// Regions processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Upper bound for one region's fetch, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Upper bound for one region's commit, in seconds
    #[serde(default = "default_persist_timeout")]
    pub persist_timeout_secs: u64,

    /// Extra fetch attempts after a transport failure
    #[serde(default)]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Cron expression (6 fields, seconds first) for `schedule`
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

const fn default_concurrency() -> usize {
    4
}

const fn default_fetch_timeout() -> u64 {
    20
}

const fn default_persist_timeout() -> u64 {
    10
}

const fn default_retry_delay() -> u64 {
    500
}

fn default_schedule() -> String {
    crate::scheduler::HOURLY.to_string()
}

impl Default for BatchAppConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            fetch_timeout_secs: default_fetch_timeout(),
            persist_timeout_secs: default_persist_timeout(),
            retry_attempts: 0,
            retry_delay_ms: default_retry_delay(),
            schedule: default_schedule(),
        }
    }
}

impl BatchAppConfig {
    #[must_use]
    pub fn runner_config(&self) -> BatchConfig {
        BatchConfig {
            concurrency: self.concurrency.max(1),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            persist_timeout: Duration::from_secs(self.persist_timeout_secs),
            retry_attempts: self.retry_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}
