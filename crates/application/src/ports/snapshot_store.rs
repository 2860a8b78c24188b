//! Snapshot and history storage port

use async_trait::async_trait;
use domain::{HistoricalRecord, RegionId, WeatherSnapshot};
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Result of one atomic commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    /// History rows newly written
    pub history_inserted: u64,
    /// History rows dropped because (region, forecast_time) already existed
    pub history_ignored: u64,
}

/// Port for snapshot/history persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Upsert the region's snapshot and insert-or-ignore every history row
    /// in a single transaction. Nothing is written if any statement fails.
    ///
    /// An existing snapshot keeps its `created_at`.
    async fn commit(
        &self,
        snapshot: &WeatherSnapshot,
        history: &[HistoricalRecord],
    ) -> Result<CommitOutcome, ApplicationError>;

    async fn get_snapshot(
        &self,
        region_id: RegionId,
    ) -> Result<Option<WeatherSnapshot>, ApplicationError>;

    /// Most recent history rows first
    async fn recent_history(
        &self,
        region_id: RegionId,
        limit: u32,
    ) -> Result<Vec<HistoricalRecord>, ApplicationError>;

    async fn count_history(&self, region_id: RegionId) -> Result<u64, ApplicationError>;
}
