//! Persistence module
//!
//! SQLite-backed storage for regions, latest snapshots and hourly history.

pub mod async_connection;
pub mod error;
pub mod region_store;
pub mod snapshot_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use region_store::SqliteRegionStore;
pub use snapshot_store::SqliteSnapshotStore;
