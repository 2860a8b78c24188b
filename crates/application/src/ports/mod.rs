//! Ports - Interfaces for external dependencies
//!
//! Adapters in the infrastructure layer implement these traits.

mod batch_reporter;
mod forecast_port;
mod region_store;
mod snapshot_store;

pub use batch_reporter::{BatchReporter, NullBatchReporter};
pub use forecast_port::{ForecastPayload, ForecastPort, ForecastRequest};
pub use region_store::RegionStore;
pub use snapshot_store::{CommitOutcome, SnapshotStore};

#[cfg(test)]
pub use batch_reporter::MockBatchReporter;
#[cfg(test)]
pub use forecast_port::MockForecastPort;
#[cfg(test)]
pub use region_store::MockRegionStore;
#[cfg(test)]
pub use snapshot_store::MockSnapshotStore;
