//! Forecast response schema
//!
//! Every block and every column is optional. Entries are decoded leniently:
//! a `null` or non-numeric value becomes a missing entry and a non-string
//! time becomes a missing timestamp, keeping the axis aligned. A column that
//! is not an array at all is treated as absent. Nothing here interprets
//! timestamps, that happens once the payload reaches the domain model.

use domain::{DailyField, WeatherField};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn lenient_scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(Value::as_f64))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_column<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Column, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(items.iter().map(Value::as_f64).collect()),
        _ => None,
    })
}

fn lenient_times<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Option<String>>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Top-level forecast response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Offset of the local times in `current`, `hourly` and `daily`
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub current: Option<CurrentBlock>,
    pub hourly: Option<HourlyBlock>,
    pub hourly_units: Option<HourlyUnits>,
    pub daily: Option<DailyBlock>,
}

/// `current` block: one scalar per requested variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentBlock {
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub temperature_2m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub relative_humidity_2m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub surface_pressure: Option<f64>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub wind_speed_10m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub wind_direction_10m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub cloud_cover: Option<f64>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub precipitation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub precipitation_probability: Option<f64>,
}

impl CurrentBlock {
    #[must_use]
    pub const fn value(&self, field: WeatherField) -> Option<f64> {
        match field {
            WeatherField::Temperature => self.temperature_2m,
            WeatherField::RelativeHumidity => self.relative_humidity_2m,
            WeatherField::SurfacePressure => self.surface_pressure,
            WeatherField::WindSpeed => self.wind_speed_10m,
            WeatherField::WindDirection => self.wind_direction_10m,
            WeatherField::CloudCover => self.cloud_cover,
            WeatherField::Precipitation => self.precipitation,
            WeatherField::PrecipitationProbability => self.precipitation_probability,
        }
    }
}

type Column = Option<Vec<Option<f64>>>;

/// `hourly` block: a time axis plus parallel columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyBlock {
    #[serde(default, deserialize_with = "lenient_times")]
    pub time: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient_column")]
    pub temperature_2m: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub relative_humidity_2m: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub surface_pressure: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub wind_speed_10m: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub wind_direction_10m: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub cloud_cover: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub precipitation: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub precipitation_probability: Column,
}

impl HourlyBlock {
    #[must_use]
    pub fn column(&self, field: WeatherField) -> Option<&[Option<f64>]> {
        let column = match field {
            WeatherField::Temperature => &self.temperature_2m,
            WeatherField::RelativeHumidity => &self.relative_humidity_2m,
            WeatherField::SurfacePressure => &self.surface_pressure,
            WeatherField::WindSpeed => &self.wind_speed_10m,
            WeatherField::WindDirection => &self.wind_direction_10m,
            WeatherField::CloudCover => &self.cloud_cover,
            WeatherField::Precipitation => &self.precipitation,
            WeatherField::PrecipitationProbability => &self.precipitation_probability,
        };
        column.as_deref()
    }
}

/// Units the provider actually used for the hourly block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyUnits {
    pub wind_speed_10m: Option<String>,
    pub precipitation: Option<String>,
}

/// `daily` block: a date axis plus parallel columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyBlock {
    #[serde(default, deserialize_with = "lenient_times")]
    pub time: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient_column")]
    pub temperature_2m_max: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub temperature_2m_min: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub precipitation_sum: Column,
    #[serde(default, deserialize_with = "lenient_column")]
    pub precipitation_probability_max: Column,
}

impl DailyBlock {
    #[must_use]
    pub fn column(&self, field: DailyField) -> Option<&[Option<f64>]> {
        let column = match field {
            DailyField::TemperatureMax => &self.temperature_2m_max,
            DailyField::TemperatureMin => &self.temperature_2m_min,
            DailyField::PrecipitationSum => &self.precipitation_sum,
            DailyField::PrecipitationProbabilityMax => &self.precipitation_probability_max,
        };
        column.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sparse_payload() {
        let json = r#"{
            "utc_offset_seconds": 25200,
            "timezone": "Asia/Bangkok",
            "hourly": {
                "time": ["2024-05-01T00:00", "2024-05-01T01:00"],
                "temperature_2m": [27.1, null],
                "wind_direction_10m": [350, 10]
            }
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.utc_offset_seconds, 25_200);
        assert!(response.current.is_none());
        assert!(response.daily.is_none());

        let hourly = response.hourly.unwrap();
        assert_eq!(hourly.time.len(), 2);
        assert_eq!(
            hourly.column(WeatherField::Temperature),
            Some(&[Some(27.1), None][..])
        );
        assert_eq!(
            hourly.column(WeatherField::WindDirection),
            Some(&[Some(350.0), Some(10.0)][..])
        );
        assert!(hourly.column(WeatherField::CloudCover).is_none());
    }

    #[test]
    fn bad_entries_degrade_to_missing() {
        let json = r#"{
            "current": {"time": "2024-05-01T12:00", "temperature_2m": "hot", "cloud_cover": 40},
            "hourly": {
                "time": ["2024-05-01T00:00", null, 7],
                "temperature_2m": [27.1, "n/a", null],
                "cloud_cover": "unavailable",
                "wind_speed_10m": [1, 2, 3]
            }
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();

        let current = response.current.unwrap();
        assert_eq!(current.value(WeatherField::Temperature), None);
        assert_eq!(current.value(WeatherField::CloudCover), Some(40.0));

        let hourly = response.hourly.unwrap();
        assert_eq!(
            hourly.time,
            vec![Some("2024-05-01T00:00".to_string()), None, None]
        );
        assert_eq!(
            hourly.column(WeatherField::Temperature),
            Some(&[Some(27.1), None, None][..])
        );
        assert!(hourly.column(WeatherField::CloudCover).is_none());
        assert_eq!(
            hourly.column(WeatherField::WindSpeed),
            Some(&[Some(1.0), Some(2.0), Some(3.0)][..])
        );
    }

    #[test]
    fn missing_offset_defaults_to_utc() {
        let response: ApiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.utc_offset_seconds, 0);
    }

    #[test]
    fn current_block_lookup() {
        let block = CurrentBlock {
            time: Some("2024-05-01T12:00".to_string()),
            relative_humidity_2m: Some(80.0),
            ..Default::default()
        };
        assert_eq!(block.value(WeatherField::RelativeHumidity), Some(80.0));
        assert_eq!(block.value(WeatherField::Temperature), None);
    }

    #[test]
    fn daily_block_lookup() {
        let json = r#"{"time": ["2024-05-01"], "precipitation_sum": [1.5]}"#;
        let block: DailyBlock = serde_json::from_str(json).unwrap();
        assert_eq!(
            block.column(DailyField::PrecipitationSum),
            Some(&[Some(1.5)][..])
        );
        assert!(block.column(DailyField::TemperatureMax).is_none());
    }
}
