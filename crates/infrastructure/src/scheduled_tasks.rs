//! Factory functions for scheduled tasks
//!
//! Builds the task closures the `TaskScheduler` runs.

use std::sync::Arc;

use application::services::BatchRunner;
use chrono::Utc;
use futures::future::BoxFuture;
use tracing::{debug, error, warn};

use crate::adapters::TracingBatchReporter;

/// Task name for the periodic weather refresh
pub const WEATHER_REFRESH_TASK: &str = "weather_refresh";

/// Create the weather refresh task closure.
///
/// Every execution runs one batch with a fresh reference instant and its
/// own reporter. Region failures are logged but do not fail the task; only
/// a run that could not start (regions unreadable) does.
pub fn create_weather_refresh_task(
    runner: Arc<BatchRunner>,
) -> impl Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static {
    move || {
        let runner = Arc::clone(&runner);

        Box::pin(async move {
            let reporter = TracingBatchReporter::new();
            debug!(run_id = %reporter.run_id(), "Scheduled weather refresh triggered");

            match runner.run(Utc::now(), &reporter).await {
                Ok(summary) => {
                    if summary.has_failures() {
                        warn!(
                            failed = summary.failed,
                            total = summary.total,
                            "Weather refresh completed with region failures"
                        );
                    }
                    Ok(())
                },
                Err(e) => {
                    error!(error = %e, "Weather refresh could not run");
                    Err(format!("Weather refresh failed: {e}"))
                },
            }
        })
    }
}
