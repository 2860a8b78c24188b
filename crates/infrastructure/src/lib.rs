//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports: the Open-Meteo forecast adapter, the
//! SQLite region and snapshot stores and the tracing run reporter. Also
//! hosts configuration loading, logging setup and the cron scheduler.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, BatchAppConfig, DatabaseConfig, TelemetryAppConfig, WeatherAppConfig,
};
pub use persistence::{
    AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError, SqliteRegionStore,
    SqliteSnapshotStore,
};
pub use scheduled_tasks::{WEATHER_REFRESH_TASK, create_weather_refresh_task};
pub use scheduler::{SchedulerConfig, SchedulerError, TaskScheduler, TaskStats};
pub use telemetry::{TelemetryError, init_telemetry};
