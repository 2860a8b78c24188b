//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite database settings
//! - `weather`: Open-Meteo client and request settings
//! - `batch`: concurrency, timeouts, retries and the refresh schedule
//! - `telemetry`: log filter and format

mod batch;
mod database;
mod telemetry;
mod weather;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use batch::BatchAppConfig;
pub use database::DatabaseConfig;
pub use telemetry::TelemetryAppConfig;
pub use weather::WeatherAppConfig;

/// Environment variable prefix, e.g. `REGIONCAST__BATCH__CONCURRENCY=8`
pub const ENV_PREFIX: &str = "REGIONCAST";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub weather: WeatherAppConfig,

    #[serde(default)]
    pub batch: BatchAppConfig,

    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and the environment.
    ///
    /// Without `path`, a `config.toml` (or any format the `config` crate
    /// recognises) in the working directory is used if present. An explicit
    /// `path` must exist. Environment variables override both.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder().add_source(file).add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(database = %config.database.path, "Configuration loaded");
        Ok(config)
    }

    /// Reject settings that would only fail later at runtime
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.weather.base_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "weather.base_url must not be empty".to_string(),
            ));
        }
        if !(1..=16).contains(&self.weather.forecast_days) {
            return Err(config::ConfigError::Message(format!(
                "weather.forecast_days must be within 1..=16, got {}",
                self.weather.forecast_days
            )));
        }
        if self.weather.past_days > 92 {
            return Err(config::ConfigError::Message(format!(
                "weather.past_days must be at most 92, got {}",
                self.weather.past_days
            )));
        }
        if self.batch.concurrency == 0 {
            return Err(config::ConfigError::Message(
                "batch.concurrency must be at least 1".to_string(),
            ));
        }
        self.batch
            .schedule
            .parse::<cron::Schedule>()
            .map_err(|e| {
                config::ConfigError::Message(format!(
                    "batch.schedule '{}' is not a valid cron expression: {e}",
                    self.batch.schedule
                ))
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use domain::{PrecipitationUnit, WindSpeedUnit};

    use super::*;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.path, "regioncast.db");
        assert_eq!(config.weather.timeout_secs, 15);
        assert_eq!(config.weather.timezone, "auto");
        assert_eq!(config.weather.wind_speed_unit, WindSpeedUnit::Ms);
        assert_eq!(config.weather.precipitation_unit, PrecipitationUnit::Mm);
        assert_eq!(config.batch.concurrency, 4);
        assert_eq!(config.batch.retry_attempts, 0);
        assert_eq!(config.telemetry.log_filter, "info");
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let file = write_toml(
            r#"
            [database]
            path = ":memory:"

            [weather]
            past_days = 3
            wind_speed_unit = "kmh"

            [batch]
            concurrency = 8
            "#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.database.path, ":memory:");
        assert!(config.database.run_migrations);
        assert_eq!(config.weather.past_days, 3);
        assert_eq!(config.weather.forecast_days, 7);
        assert_eq!(config.weather.wind_speed_unit, WindSpeedUnit::Kmh);
        assert_eq!(config.batch.concurrency, 8);
        assert_eq!(config.batch.fetch_timeout_secs, 20);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_forecast_days_rejected() {
        let file = write_toml("[weather]\nforecast_days = 30\n");
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("forecast_days"));
    }

    #[test]
    fn invalid_cron_rejected() {
        let mut config = AppConfig::default();
        config.batch.schedule = "every hour".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_concurrency_rejected() {
        let mut config = AppConfig::default();
        config.batch.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn sections_convert_to_service_configs() {
        let mut config = AppConfig::default();
        config.batch.retry_delay_ms = 250;
        config.weather.precipitation_unit = PrecipitationUnit::Inch;

        let runner = config.batch.runner_config();
        assert_eq!(runner.retry_delay, std::time::Duration::from_millis(250));
        assert_eq!(runner.fetch_timeout, std::time::Duration::from_secs(20));

        let aggregator = config.weather.aggregator_config();
        assert_eq!(aggregator.precipitation_unit, PrecipitationUnit::Inch);
        assert_eq!(aggregator.past_days, 7);

        let client = config.weather.client_config();
        assert_eq!(client.base_url, "https://api.open-meteo.com/v1");
    }
}
