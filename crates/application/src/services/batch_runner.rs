//! Multi-region batch run
//!
//! Fetches, aggregates and persists every known region. Regions are
//! independent: each one is committed atomically on its own, and a failing
//! region is reported and skipped without stopping the run.

use std::{fmt, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use domain::Region;
use futures::{StreamExt, stream};
use serde::Serialize;
use tokio::time::{sleep, timeout};
use tracing::{info, instrument, warn};

use super::snapshot_aggregator::{RegionCollection, SnapshotAggregator};
use crate::{
    error::ApplicationError,
    ports::{BatchReporter, CommitOutcome, RegionStore, SnapshotStore},
};

/// Configuration for batch runs
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Regions processed at the same time (default: 4)
    pub concurrency: usize,
    /// Upper bound for one region's fetch (default: 20s)
    pub fetch_timeout: Duration,
    /// Upper bound for one region's commit (default: 10s)
    pub persist_timeout: Duration,
    /// Extra fetch attempts after a transport failure (default: 0)
    pub retry_attempts: u32,
    /// Pause between fetch attempts (default: 500ms)
    pub retry_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            fetch_timeout: Duration::from_secs(20),
            persist_timeout: Duration::from_secs(10),
            retry_attempts: 0,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// A region that failed during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionFailure {
    pub code: String,
    pub kind: String,
    pub message: String,
}

/// Outcome of one batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    /// Regions fetched and committed
    pub processed: usize,
    /// Regions without coordinates
    pub skipped: usize,
    pub failed: usize,
    pub history_inserted: u64,
    pub history_ignored: u64,
    pub failures: Vec<RegionFailure>,
    pub skipped_codes: Vec<String>,
}

impl BatchSummary {
    fn new(started_at: DateTime<Utc>, total: usize) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            total,
            processed: 0,
            skipped: 0,
            failed: 0,
            history_inserted: 0,
            history_ignored: 0,
            failures: Vec::new(),
            skipped_codes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Process exit status: 0 when every region succeeded or was skipped,
    /// 2 when at least one failed
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.has_failures() { 2 } else { 0 }
    }
}

enum RegionOutcome {
    Saved(CommitOutcome),
    Skipped,
    Failed(ApplicationError),
}

/// Runs the aggregator over every region and persists the results
#[derive(Clone)]
pub struct BatchRunner {
    regions: Arc<dyn RegionStore>,
    snapshots: Arc<dyn SnapshotStore>,
    aggregator: SnapshotAggregator,
    config: BatchConfig,
}

impl fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRunner")
            .field("aggregator", &self.aggregator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BatchRunner {
    #[must_use]
    pub fn new(
        regions: Arc<dyn RegionStore>,
        snapshots: Arc<dyn SnapshotStore>,
        aggregator: SnapshotAggregator,
        config: BatchConfig,
    ) -> Self {
        Self {
            regions,
            snapshots,
            aggregator,
            config,
        }
    }

    /// Process every region against the reference instant `now`.
    ///
    /// Per-region failures end up in the summary. The only error returned
    /// is a failure to list the regions in the first place.
    #[instrument(skip(self, reporter))]
    pub async fn run(
        &self,
        now: DateTime<Utc>,
        reporter: &dyn BatchReporter,
    ) -> Result<BatchSummary, ApplicationError> {
        let regions = self.regions.list_regions().await?;
        let mut summary = BatchSummary::new(now, regions.len());
        reporter.run_started(regions.len(), now);
        info!(regions = regions.len(), concurrency = self.config.concurrency, "Batch run started");

        let outcomes: Vec<_> = stream::iter(regions)
            .map(|region| async move {
                let outcome = self.process_region(&region, now).await;
                (region, outcome)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        for (region, outcome) in outcomes {
            match outcome {
                RegionOutcome::Saved(commit) => {
                    summary.processed += 1;
                    summary.history_inserted += commit.history_inserted;
                    summary.history_ignored += commit.history_ignored;
                    reporter.region_saved(&region, &commit);
                },
                RegionOutcome::Skipped => {
                    summary.skipped += 1;
                    reporter.region_skipped(&region);
                    summary.skipped_codes.push(region.code);
                },
                RegionOutcome::Failed(error) => {
                    summary.failed += 1;
                    summary.failures.push(RegionFailure {
                        code: region.code.clone(),
                        kind: error.kind().to_string(),
                        message: error.to_string(),
                    });
                    reporter.region_failed(&region, &error);
                },
            }
        }

        summary.failures.sort_by(|a, b| a.code.cmp(&b.code));
        summary.skipped_codes.sort();
        summary.finished_at = Utc::now().max(now);

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            history_inserted = summary.history_inserted,
            "Batch run finished"
        );
        reporter.run_finished(&summary);
        Ok(summary)
    }

    async fn process_region(&self, region: &Region, now: DateTime<Utc>) -> RegionOutcome {
        let collection = match self.collect_with_retry(region, now).await {
            Ok(collection) => collection,
            Err(ApplicationError::MissingCoordinates { .. }) => return RegionOutcome::Skipped,
            Err(error) => return RegionOutcome::Failed(error),
        };

        match self.persist(&collection).await {
            Ok(outcome) => RegionOutcome::Saved(outcome),
            Err(error) => RegionOutcome::Failed(error),
        }
    }

    async fn collect_with_retry(
        &self,
        region: &Region,
        now: DateTime<Utc>,
    ) -> Result<RegionCollection, ApplicationError> {
        let mut attempt = 0;
        loop {
            let result = timeout(
                self.config.fetch_timeout,
                self.aggregator.collect_region(region, now),
            )
            .await
            .unwrap_or_else(|_| {
                Err(ApplicationError::Transport(format!(
                    "fetch timed out after {:?}",
                    self.config.fetch_timeout
                )))
            });

            match result {
                Err(error) if error.is_retryable() && attempt < self.config.retry_attempts => {
                    attempt += 1;
                    warn!(region = %region.code, attempt, error = %error, "Retrying fetch");
                    sleep(self.config.retry_delay).await;
                },
                other => return other,
            }
        }
    }

    async fn persist(
        &self,
        collection: &RegionCollection,
    ) -> Result<CommitOutcome, ApplicationError> {
        // a timed-out commit drops its transaction, which rolls it back
        timeout(
            self.config.persist_timeout,
            self.snapshots
                .commit(&collection.snapshot, &collection.history),
        )
        .await
        .unwrap_or_else(|_| {
            Err(ApplicationError::Persistence(format!(
                "commit timed out after {:?}",
                self.config.persist_timeout
            )))
        })
    }
}
