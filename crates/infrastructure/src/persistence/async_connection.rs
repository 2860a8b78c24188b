//! Async database connection using sqlx
//!
//! Every store shares this pool. Schema changes live as SQL files in the
//! workspace `migrations/` directory and are embedded with `migrate!()`.

use std::{path::Path, str::FromStr};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;

/// Error type for async database operations
#[derive(Debug, thiserror::Error)]
pub enum AsyncDatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Configuration for async database connection
#[derive(Debug, Clone)]
pub struct AsyncDatabaseConfig {
    /// Database URL (e.g., "sqlite:regioncast.db" or "sqlite::memory:")
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep open
    pub min_connections: u32,
    /// Enable WAL mode for file databases
    pub wal_mode: bool,
    pub foreign_keys: bool,
}

impl Default for AsyncDatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:regioncast.db".to_string(),
            max_connections: 5,
            min_connections: 1,
            wal_mode: true,
            foreign_keys: true,
        }
    }
}

impl AsyncDatabaseConfig {
    /// In-memory database for tests.
    ///
    /// Each connection of an in-memory pool would see its own empty
    /// database, so the pool is pinned to one connection.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            wal_mode: false,
            foreign_keys: true,
        }
    }

    /// File-based database configuration
    #[must_use]
    pub fn file(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().display().to_string();
        Self {
            url: format!("sqlite:{path_str}"),
            ..Default::default()
        }
    }
}

impl From<&DatabaseConfig> for AsyncDatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        if config.path == ":memory:" {
            return Self::in_memory();
        }
        Self {
            max_connections: config.max_connections,
            ..Self::file(&config.path)
        }
    }
}

/// Async database connection pool
#[derive(Debug, Clone)]
pub struct AsyncDatabase {
    pool: SqlitePool,
}

impl AsyncDatabase {
    /// Create a new async database connection pool
    #[instrument(skip_all, fields(url = %config.url))]
    pub async fn new(config: &AsyncDatabaseConfig) -> Result<Self, AsyncDatabaseError> {
        if config.max_connections == 0 {
            return Err(AsyncDatabaseError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(config.foreign_keys);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .connect_with(options)
            .await?;

        let file_backed = !config.url.contains(":memory:");

        if config.wal_mode && file_backed {
            sqlx::query("PRAGMA journal_mode=WAL")
                .execute(&pool)
                .await?;
            debug!("WAL mode enabled");
        }

        // Concurrent region commits wait on each other instead of failing
        sqlx::query("PRAGMA busy_timeout=5000")
            .execute(&pool)
            .await?;

        if config.wal_mode && file_backed {
            sqlx::query("PRAGMA synchronous=NORMAL")
                .execute(&pool)
                .await?;
        }

        info!(
            max_connections = config.max_connections,
            "Async database pool created"
        );

        Ok(Self { pool })
    }

    /// Create an in-memory database for testing
    pub async fn in_memory() -> Result<Self, AsyncDatabaseError> {
        Self::new(&AsyncDatabaseConfig::in_memory()).await
    }

    /// Get the underlying pool for raw queries
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply pending migrations from the workspace `migrations/` directory
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<(), AsyncDatabaseError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_in_memory_database() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        let _ = db.pool();
    }

    #[tokio::test]
    async fn all_migration_tables_created() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let tables = ["regions", "region_weather_snapshots", "weather_forecast_hourly"];

        for table in &tables {
            let result: (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=$1",
            )
            .bind(table)
            .fetch_one(db.pool())
            .await
            .unwrap();
            assert_eq!(result.0, 1, "Table {table} should exist after migrations");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn wal_mode_for_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("wal.db");

        let db = AsyncDatabase::new(&AsyncDatabaseConfig::file(&db_path))
            .await
            .unwrap();
        db.migrate().await.unwrap();

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(result.0.to_lowercase(), "wal");

        db.close().await;
    }

    #[tokio::test]
    async fn zero_connections_rejected() {
        let config = AsyncDatabaseConfig {
            max_connections: 0,
            ..AsyncDatabaseConfig::in_memory()
        };
        let err = AsyncDatabase::new(&config).await.unwrap_err();
        assert!(matches!(err, AsyncDatabaseError::Config(_)));
    }

    #[test]
    fn memory_path_maps_to_in_memory_config() {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            ..DatabaseConfig::default()
        };
        let async_config = AsyncDatabaseConfig::from(&config);
        assert_eq!(async_config.url, "sqlite::memory:");
        assert_eq!(async_config.max_connections, 1);
    }

    #[test]
    fn file_path_keeps_pool_size() {
        let config = DatabaseConfig {
            path: "data/weather.db".to_string(),
            max_connections: 8,
            ..DatabaseConfig::default()
        };
        let async_config = AsyncDatabaseConfig::from(&config);
        assert_eq!(async_config.url, "sqlite:data/weather.db");
        assert_eq!(async_config.max_connections, 8);
        assert!(async_config.wal_mode);
    }
}
