//! Forecast provider configuration.

use application::services::AggregatorConfig;
use domain::{PrecipitationUnit, WindSpeedUnit};
use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};

/// Open-Meteo client and request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// Open-Meteo API base URL
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,

    /// IANA timezone sent to the provider, or `auto`
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Days of history to request (0-92)
    #[serde(default = "default_past_days")]
    pub past_days: u8,

    /// Days of forecast to request, today included (1-16)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    #[serde(default)]
    pub wind_speed_unit: WindSpeedUnit,

    #[serde(default)]
    pub precipitation_unit: PrecipitationUnit,
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_weather_timeout() -> u64 {
    15
}

fn default_timezone() -> String {
    "auto".to_string()
}

const fn default_past_days() -> u8 {
    7
}

const fn default_forecast_days() -> u8 {
    7
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_secs: default_weather_timeout(),
            timezone: default_timezone(),
            past_days: default_past_days(),
            forecast_days: default_forecast_days(),
            wind_speed_unit: WindSpeedUnit::default(),
            precipitation_unit: PrecipitationUnit::default(),
        }
    }
}

impl WeatherAppConfig {
    /// HTTP client settings
    #[must_use]
    pub fn client_config(&self) -> WeatherConfig {
        WeatherConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// What every region's forecast request asks for
    #[must_use]
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            past_days: self.past_days,
            forecast_days: self.forecast_days,
            timezone: self.timezone.clone(),
            wind_speed_unit: self.wind_speed_unit,
            precipitation_unit: self.precipitation_unit,
        }
    }
}
