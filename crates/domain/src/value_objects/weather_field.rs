//! Forecast fields tracked per region

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field sampled on the hourly grid (and optionally reported as "current")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherField {
    /// Air temperature at 2 m, °C
    Temperature,
    /// Relative humidity at 2 m, %
    RelativeHumidity,
    /// Surface pressure, hPa
    SurfacePressure,
    /// Wind speed at 10 m, in the requested wind speed unit
    WindSpeed,
    /// Wind direction at 10 m, degrees
    WindDirection,
    /// Total cloud cover, %
    CloudCover,
    /// Precipitation amount, in the requested precipitation unit
    Precipitation,
    /// Precipitation probability, %
    PrecipitationProbability,
}

impl WeatherField {
    pub const ALL: [Self; 8] = [
        Self::Temperature,
        Self::RelativeHumidity,
        Self::SurfacePressure,
        Self::WindSpeed,
        Self::WindDirection,
        Self::CloudCover,
        Self::Precipitation,
        Self::PrecipitationProbability,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::RelativeHumidity => "relative_humidity",
            Self::SurfacePressure => "surface_pressure",
            Self::WindSpeed => "wind_speed",
            Self::WindDirection => "wind_direction",
            Self::CloudCover => "cloud_cover",
            Self::Precipitation => "precipitation",
            Self::PrecipitationProbability => "precipitation_probability",
        }
    }
}

impl fmt::Display for WeatherField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field sampled on the daily grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyField {
    TemperatureMax,
    TemperatureMin,
    PrecipitationSum,
    PrecipitationProbabilityMax,
}

impl DailyField {
    pub const ALL: [Self; 4] = [
        Self::TemperatureMax,
        Self::TemperatureMin,
        Self::PrecipitationSum,
        Self::PrecipitationProbabilityMax,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TemperatureMax => "temperature_max",
            Self::TemperatureMin => "temperature_min",
            Self::PrecipitationSum => "precipitation_sum",
            Self::PrecipitationProbabilityMax => "precipitation_probability_max",
        }
    }
}

impl fmt::Display for DailyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
