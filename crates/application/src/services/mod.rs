//! Application services - Use case implementations

mod batch_runner;
mod snapshot_aggregator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use batch_runner::{BatchConfig, BatchRunner, BatchSummary, RegionFailure};
pub use snapshot_aggregator::{
    AggregatorConfig, RegionCollection, SnapshotAggregator, build_aggregate, build_records,
};
