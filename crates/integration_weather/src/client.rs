//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo forecast API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::ApiResponse;
use crate::query::ForecastQuery;

/// Tag recorded as the `source` of every snapshot built from this client
pub const SOURCE_TAG: &str = "open-meteo";

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// No response within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            Self::ParseError(e.to_string())
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 15)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    15
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Weather client trait for fetching forecast payloads
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch the series described by `query` for one location
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        query: &ForecastQuery,
    ) -> Result<ApiResponse, WeatherError>;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self, query), fields(lat = %latitude, lon = %longitude))]
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        query: &ForecastQuery,
    ) -> Result<ApiResponse, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let url = self.forecast_url();
        let params = query.to_pairs(latitude, longitude);
        debug!(url = %url, params = params.len(), "Fetching forecast");

        let response = self.client.get(&url).query(&params).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| WeatherError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = WeatherConfig::default();
        assert_eq!(config.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_validate_coordinates_valid() {
        assert!(OpenMeteoClient::validate_coordinates(0.0, 0.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(90.0, 180.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(-90.0, -180.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(10.0, 106.0).is_ok());
    }

    #[test]
    fn test_validate_coordinates_invalid() {
        assert!(OpenMeteoClient::validate_coordinates(91.0, 0.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(-91.0, 0.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(0.0, 181.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_forecast_url_trims_trailing_slash() {
        let client = OpenMeteoClient::new(WeatherConfig {
            base_url: "http://localhost:9999/v1/".to_string(),
            timeout_secs: 1,
        })
        .expect("client creation should succeed");
        assert_eq!(client.forecast_url(), "http://localhost:9999/v1/forecast");
    }

    #[test]
    fn test_weather_error_display() {
        let err = WeatherError::InvalidCoordinates;
        assert!(err.to_string().contains("latitude"));
        assert!(err.to_string().contains("longitude"));

        let err = WeatherError::RateLimitExceeded;
        assert!(err.to_string().contains("Rate limit"));

        let err = WeatherError::Timeout("15s".to_string());
        assert_eq!(err.to_string(), "Request timed out: 15s");
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: WeatherConfig = serde_json::from_str("{}").expect("should deserialize");
        assert_eq!(config.timeout_secs, 15);
    }
}
