//! Batch reporter that writes run progress as tracing events

use std::sync::atomic::{AtomicUsize, Ordering};

use application::{
    error::ApplicationError,
    ports::{BatchReporter, CommitOutcome},
    services::BatchSummary,
};
use chrono::{DateTime, Utc};
use domain::Region;
use tracing::{info, warn};
use uuid::Uuid;

/// Reporter scoped to one batch run.
///
/// Every event carries the run id so interleaved runs stay distinguishable
/// in the log stream.
#[derive(Debug)]
pub struct TracingBatchReporter {
    run_id: Uuid,
    saved: AtomicUsize,
    failed: AtomicUsize,
}

impl Default for TracingBatchReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingBatchReporter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            saved: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Regions committed so far
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved.load(Ordering::Relaxed)
    }

    /// Regions failed so far
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Whether the per-region events seen agree with the final summary
    fn counters_match(&self, summary: &BatchSummary) -> bool {
        self.saved() == summary.processed && self.failed() == summary.failed
    }
}

impl BatchReporter for TracingBatchReporter {
    fn run_started(&self, total: usize, reference: DateTime<Utc>) {
        info!(run_id = %self.run_id, total, reference = %reference, "Weather refresh started");
    }

    fn region_skipped(&self, region: &Region) {
        info!(run_id = %self.run_id, code = %region.code, "Region skipped: no coordinates");
    }

    fn region_saved(&self, region: &Region, outcome: &CommitOutcome) {
        self.saved.fetch_add(1, Ordering::Relaxed);
        info!(
            run_id = %self.run_id,
            code = %region.code,
            inserted = outcome.history_inserted,
            ignored = outcome.history_ignored,
            "Region saved"
        );
    }

    fn region_failed(&self, region: &Region, error: &ApplicationError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        warn!(
            run_id = %self.run_id,
            code = %region.code,
            kind = error.kind(),
            error = %error,
            "Region failed"
        );
    }

    fn run_finished(&self, summary: &BatchSummary) {
        let elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds();
        if !self.counters_match(summary) {
            warn!(
                run_id = %self.run_id,
                saved_events = self.saved(),
                failed_events = self.failed(),
                processed = summary.processed,
                failed = summary.failed,
                "Reported region events disagree with the run summary"
            );
        }
        if summary.has_failures() {
            warn!(
                run_id = %self.run_id,
                processed = summary.processed,
                skipped = summary.skipped,
                failed = summary.failed,
                elapsed_ms,
                "Weather refresh finished with failures"
            );
        } else {
            info!(
                run_id = %self.run_id,
                processed = summary.processed,
                skipped = summary.skipped,
                inserted = summary.history_inserted,
                elapsed_ms,
                "Weather refresh finished"
            );
        }
    }
}
