//! Persisted snapshot and history rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::series::HourlySeries;
use crate::value_objects::{PrecipitationUnit, RegionId, WeatherField, WindSpeedUnit};

/// Unit-normalised values of one hourly sample (m/s, mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservationValues {
    pub temperature_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub cloud_cover_percent: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

impl ObservationValues {
    /// Read row `index` of an hourly series, converting wind speed and
    /// precipitation from the payload units.
    #[must_use]
    pub fn from_hourly(
        series: &HourlySeries,
        index: usize,
        wind_unit: WindSpeedUnit,
        precipitation_unit: PrecipitationUnit,
    ) -> Self {
        let at = |field| series.value_at(field, index);
        Self {
            temperature_c: at(WeatherField::Temperature),
            humidity_percent: at(WeatherField::RelativeHumidity),
            pressure_hpa: at(WeatherField::SurfacePressure),
            wind_speed_ms: at(WeatherField::WindSpeed).map(|v| wind_unit.to_ms(v)),
            wind_direction_deg: at(WeatherField::WindDirection),
            cloud_cover_percent: at(WeatherField::CloudCover),
            precipitation_mm: at(WeatherField::Precipitation).map(|v| precipitation_unit.to_mm(v)),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.temperature_c.is_none()
            && self.humidity_percent.is_none()
            && self.pressure_hpa.is_none()
            && self.wind_speed_ms.is_none()
            && self.wind_direction_deg.is_none()
            && self.cloud_cover_percent.is_none()
            && self.precipitation_mm.is_none()
    }
}

/// Latest known reading for a region; one per region, overwritten on every
/// successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub region_id: RegionId,
    /// Hourly sample the values were taken from
    pub snapshot_time: DateTime<Utc>,
    pub values: ObservationValues,
    /// Provider tag, e.g. `open-meteo`
    pub source: String,
    /// First time the row was written; kept across overwrites
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One hourly sample, recorded at most once per (region, forecast_time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub region_id: RegionId,
    pub forecast_time: DateTime<Utc>,
    pub values: ObservationValues,
    pub created_at: DateTime<Utc>,
}
