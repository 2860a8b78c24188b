//! Request parameters for the forecast endpoint

use domain::{DailyField, PrecipitationUnit, WeatherField, WindSpeedUnit};

const MAX_FORECAST_DAYS: u8 = 16;
const MAX_PAST_DAYS: u8 = 92;

/// Open-Meteo variable name of an hourly/current field
#[must_use]
pub const fn hourly_variable(field: WeatherField) -> &'static str {
    match field {
        WeatherField::Temperature => "temperature_2m",
        WeatherField::RelativeHumidity => "relative_humidity_2m",
        WeatherField::SurfacePressure => "surface_pressure",
        WeatherField::WindSpeed => "wind_speed_10m",
        WeatherField::WindDirection => "wind_direction_10m",
        WeatherField::CloudCover => "cloud_cover",
        WeatherField::Precipitation => "precipitation",
        WeatherField::PrecipitationProbability => "precipitation_probability",
    }
}

/// Open-Meteo variable name of a daily field
#[must_use]
pub const fn daily_variable(field: DailyField) -> &'static str {
    match field {
        DailyField::TemperatureMax => "temperature_2m_max",
        DailyField::TemperatureMin => "temperature_2m_min",
        DailyField::PrecipitationSum => "precipitation_sum",
        DailyField::PrecipitationProbabilityMax => "precipitation_probability_max",
    }
}

/// Which series to request and in which units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub current: Vec<WeatherField>,
    pub hourly: Vec<WeatherField>,
    pub daily: Vec<DailyField>,
    /// Days of history before today (0-92)
    pub past_days: Option<u8>,
    /// Days of forecast including today (1-16)
    pub forecast_days: Option<u8>,
    /// IANA zone or `auto` (resolve from coordinates)
    pub timezone: String,
    pub wind_speed_unit: Option<WindSpeedUnit>,
    pub precipitation_unit: Option<PrecipitationUnit>,
}

impl Default for ForecastQuery {
    fn default() -> Self {
        Self {
            current: Vec::new(),
            hourly: Vec::new(),
            daily: Vec::new(),
            past_days: None,
            forecast_days: None,
            timezone: "auto".to_string(),
            wind_speed_unit: None,
            precipitation_unit: None,
        }
    }
}

impl ForecastQuery {
    /// Query-string pairs for the given coordinates.
    ///
    /// Empty field lists and unset options are omitted.
    #[must_use]
    pub fn to_pairs(&self, latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
        ];

        let timezone = if self.timezone.trim().is_empty() {
            "auto"
        } else {
            self.timezone.trim()
        };
        pairs.push(("timezone", timezone.to_string()));

        if !self.current.is_empty() {
            pairs.push(("current", join(self.current.iter().map(|f| hourly_variable(*f)))));
        }
        if !self.hourly.is_empty() {
            pairs.push(("hourly", join(self.hourly.iter().map(|f| hourly_variable(*f)))));
        }
        if !self.daily.is_empty() {
            pairs.push(("daily", join(self.daily.iter().map(|f| daily_variable(*f)))));
        }
        if let Some(days) = self.past_days {
            pairs.push(("past_days", days.min(MAX_PAST_DAYS).to_string()));
        }
        if let Some(days) = self.forecast_days {
            pairs.push((
                "forecast_days",
                days.clamp(1, MAX_FORECAST_DAYS).to_string(),
            ));
        }
        if let Some(unit) = self.wind_speed_unit {
            pairs.push(("windspeed_unit", unit.as_str().to_string()));
        }
        if let Some(unit) = self.precipitation_unit {
            pairs.push(("precipitation_unit", unit.as_str().to_string()));
        }
        pairs
    }
}

fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn minimal_query_has_coordinates_and_timezone() {
        let pairs = ForecastQuery::default().to_pairs(10.0, 106.0);
        assert_eq!(value(&pairs, "latitude"), Some("10"));
        assert_eq!(value(&pairs, "longitude"), Some("106"));
        assert_eq!(value(&pairs, "timezone"), Some("auto"));
        assert!(value(&pairs, "hourly").is_none());
        assert!(value(&pairs, "past_days").is_none());
    }

    #[test]
    fn field_lists_are_comma_joined() {
        let query = ForecastQuery {
            hourly: vec![WeatherField::Temperature, WeatherField::WindDirection],
            daily: vec![DailyField::TemperatureMax, DailyField::TemperatureMin],
            ..Default::default()
        };
        let pairs = query.to_pairs(1.0, 2.0);
        assert_eq!(
            value(&pairs, "hourly"),
            Some("temperature_2m,wind_direction_10m")
        );
        assert_eq!(
            value(&pairs, "daily"),
            Some("temperature_2m_max,temperature_2m_min")
        );
    }

    #[test]
    fn days_are_clamped() {
        let query = ForecastQuery {
            past_days: Some(200),
            forecast_days: Some(0),
            ..Default::default()
        };
        let pairs = query.to_pairs(0.0, 0.0);
        assert_eq!(value(&pairs, "past_days"), Some("92"));
        assert_eq!(value(&pairs, "forecast_days"), Some("1"));

        let query = ForecastQuery {
            forecast_days: Some(30),
            ..Default::default()
        };
        assert_eq!(value(&query.to_pairs(0.0, 0.0), "forecast_days"), Some("16"));
    }

    #[test]
    fn unit_overrides() {
        let query = ForecastQuery {
            wind_speed_unit: Some(WindSpeedUnit::Ms),
            precipitation_unit: Some(PrecipitationUnit::Inch),
            timezone: "Asia/Bangkok".to_string(),
            ..Default::default()
        };
        let pairs = query.to_pairs(0.0, 0.0);
        assert_eq!(value(&pairs, "windspeed_unit"), Some("ms"));
        assert_eq!(value(&pairs, "precipitation_unit"), Some("inch"));
        assert_eq!(value(&pairs, "timezone"), Some("Asia/Bangkok"));
    }

    #[test]
    fn every_field_has_a_distinct_variable() {
        let mut names: Vec<_> = WeatherField::ALL.iter().map(|f| hourly_variable(*f)).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), WeatherField::ALL.len());
    }
}
