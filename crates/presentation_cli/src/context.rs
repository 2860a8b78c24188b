//! Wiring of stores, adapter and services from the loaded configuration

use std::sync::Arc;

use anyhow::Context as _;
use application::{BatchRunner, RegionStore, SnapshotAggregator, SnapshotStore};
use infrastructure::{
    AppConfig, AsyncDatabase, AsyncDatabaseConfig, SqliteRegionStore, SqliteSnapshotStore,
    WeatherAdapter,
};
use tracing::debug;

/// Everything a command needs, built once per invocation
#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub database: AsyncDatabase,
    pub regions: Arc<SqliteRegionStore>,
    pub snapshots: Arc<SqliteSnapshotStore>,
    pub aggregator: SnapshotAggregator,
}

impl AppContext {
    /// Open the database (migrating it when configured to) and build the
    /// forecast adapter.
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let db_config = AsyncDatabaseConfig::from(&config.database);
        let database = AsyncDatabase::new(&db_config)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.path))?;

        if config.database.run_migrations {
            database.migrate().await.context("Failed to apply migrations")?;
        }

        let adapter = WeatherAdapter::with_config(config.weather.client_config())
            .context("Failed to build the weather client")?;
        let aggregator =
            SnapshotAggregator::new(Arc::new(adapter), config.weather.aggregator_config());

        debug!(database = %config.database.path, "Application context ready");

        Ok(Self {
            regions: Arc::new(SqliteRegionStore::new(database.pool().clone())),
            snapshots: Arc::new(SqliteSnapshotStore::new(database.pool().clone())),
            config,
            database,
            aggregator,
        })
    }

    #[must_use]
    pub fn runner(&self) -> BatchRunner {
        let regions: Arc<dyn RegionStore> = self.regions.clone();
        let snapshots: Arc<dyn SnapshotStore> = self.snapshots.clone();
        BatchRunner::new(
            regions,
            snapshots,
            self.aggregator.clone(),
            self.config.batch.runner_config(),
        )
    }
}

#[cfg(test)]
mod tests {
    use application::NullBatchReporter;
    use chrono::Utc;
    use domain::RegionDraft;
    use infrastructure::DatabaseConfig;

    use super::*;

    fn memory_config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                path: ":memory:".to_string(),
                max_connections: 1,
                run_migrations: true,
            },
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn connect_migrates_when_enabled() {
        let ctx = AppContext::connect(memory_config()).await.unwrap();
        assert!(ctx.regions.list_regions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn runner_skips_regions_without_coordinates() {
        let ctx = AppContext::connect(memory_config()).await.unwrap();
        ctx.regions
            .upsert_region(&RegionDraft {
                code: "island".to_string(),
                name: "Unmapped island".to_string(),
                level: None,
                latitude: None,
                longitude: None,
            })
            .await
            .unwrap();

        let summary = ctx.runner().run(Utc::now(), &NullBatchReporter).await.unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.exit_code(), 0);
    }
}
