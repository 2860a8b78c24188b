//! Per-run reporting port
//!
//! A reporter is handed to one batch run and receives its progress events.

use chrono::{DateTime, Utc};
use domain::Region;
#[cfg(test)]
use mockall::automock;

use super::snapshot_store::CommitOutcome;
use crate::error::ApplicationError;
use crate::services::BatchSummary;

/// Receives progress events of a batch run
#[cfg_attr(test, automock)]
pub trait BatchReporter: Send + Sync {
    fn run_started(&self, total: usize, reference: DateTime<Utc>);

    fn region_skipped(&self, region: &Region);

    fn region_saved(&self, region: &Region, outcome: &CommitOutcome);

    fn region_failed(&self, region: &Region, error: &ApplicationError);

    fn run_finished(&self, summary: &BatchSummary);
}

/// Reporter that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBatchReporter;

impl BatchReporter for NullBatchReporter {
    fn run_started(&self, _total: usize, _reference: DateTime<Utc>) {}

    fn region_skipped(&self, _region: &Region) {}

    fn region_saved(&self, _region: &Region, _outcome: &CommitOutcome) {}

    fn region_failed(&self, _region: &Region, _error: &ApplicationError) {}

    fn run_finished(&self, _summary: &BatchSummary) {}
}
