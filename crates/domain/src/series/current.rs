//! Current-condition readings with fallback provenance

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::aligner::align_latest;
use super::grid::{CurrentConditions, HourlySeries};
use super::sample_time::SampleTime;
use crate::value_objects::WeatherField;

/// Where a reading's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOrigin {
    /// The provider's own "current" block
    Provider,
    /// Latest hourly sample at or before the reference instant
    Hourly,
    /// Every hourly sample was after the reference; last one used
    HourlyFutureFallback,
    /// No value could be derived
    Unavailable,
}

/// Best-available "now" value for one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentReading {
    pub field: WeatherField,
    pub value: Option<f64>,
    pub sourced_at: Option<SampleTime>,
    pub origin: ReadingOrigin,
}

impl CurrentReading {
    #[must_use]
    pub const fn unavailable(field: WeatherField) -> Self {
        Self {
            field,
            value: None,
            sourced_at: None,
            origin: ReadingOrigin::Unavailable,
        }
    }

    /// Provider value first, hourly alignment second.
    #[must_use]
    pub fn resolve(
        field: WeatherField,
        current: Option<&CurrentConditions>,
        hourly: Option<&HourlySeries>,
        reference: DateTime<Utc>,
    ) -> Self {
        let provided = current.and_then(|c| c.get(field).map(|v| (v, c.time().cloned())));
        match provided {
            Some((value, sourced_at)) => Self {
                field,
                value: Some(value),
                sourced_at,
                origin: ReadingOrigin::Provider,
            },
            None => Self::from_hourly(field, hourly, reference),
        }
    }

    /// Hourly alignment only
    #[must_use]
    pub fn from_hourly(
        field: WeatherField,
        hourly: Option<&HourlySeries>,
        reference: DateTime<Utc>,
    ) -> Self {
        let sample = hourly.and_then(|series| {
            series
                .column(field)
                .and_then(|values| align_latest(series.time(), values, reference))
        });
        match sample {
            Some(sample) => Self {
                field,
                value: Some(sample.value),
                sourced_at: Some(sample.time),
                origin: if sample.is_fallback {
                    ReadingOrigin::HourlyFutureFallback
                } else {
                    ReadingOrigin::Hourly
                },
            },
            None => Self::unavailable(field),
        }
    }

    /// Apply a unit conversion to the value
    #[must_use]
    pub fn map_value(mut self, convert: impl FnOnce(f64) -> f64) -> Self {
        self.value = self.value.map(convert);
        self
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.value.is_some()
    }

    /// Local calendar date of the source timestamp
    #[must_use]
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.sourced_at.as_ref().and_then(SampleTime::local_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn ict() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    fn now() -> DateTime<Utc> {
        // 2024-05-01 12:00 local
        Utc.with_ymd_and_hms(2024, 5, 1, 5, 0, 0).unwrap()
    }

    fn hourly() -> HourlySeries {
        let time = ["2024-05-01T10:00", "2024-05-01T11:00", "2024-05-01T13:00"]
            .iter()
            .map(|t| SampleTime::parse(*t, ict()))
            .collect();
        HourlySeries::new(time)
            .with_column(WeatherField::Temperature, vec![Some(29.0), Some(30.0), Some(32.0)])
            .with_column(WeatherField::CloudCover, vec![Some(10.0), None, Some(90.0)])
    }

    #[test]
    fn provider_value_wins() {
        let current = CurrentConditions::new(Some(SampleTime::parse("2024-05-01T12:00", ict())))
            .with_value(WeatherField::Temperature, 31.5);
        let reading =
            CurrentReading::resolve(WeatherField::Temperature, Some(&current), Some(&hourly()), now());
        assert_eq!(reading.value, Some(31.5));
        assert_eq!(reading.origin, ReadingOrigin::Provider);
        assert_eq!(reading.sourced_at.unwrap().raw(), "2024-05-01T12:00");
    }

    #[test]
    fn falls_back_to_hourly() {
        let current = CurrentConditions::new(None);
        let reading =
            CurrentReading::resolve(WeatherField::Temperature, Some(&current), Some(&hourly()), now());
        assert_eq!(reading.value, Some(30.0));
        assert_eq!(reading.origin, ReadingOrigin::Hourly);
        assert_eq!(reading.local_date(), NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn null_at_aligned_hour_is_unavailable() {
        let reading = CurrentReading::resolve(WeatherField::CloudCover, None, Some(&hourly()), now());
        assert_eq!(reading, CurrentReading::unavailable(WeatherField::CloudCover));
    }

    #[test]
    fn future_only_series_is_flagged() {
        let early = Utc.with_ymd_and_hms(2024, 4, 30, 0, 0, 0).unwrap();
        let reading = CurrentReading::from_hourly(WeatherField::Temperature, Some(&hourly()), early);
        assert_eq!(reading.value, Some(32.0));
        assert_eq!(reading.origin, ReadingOrigin::HourlyFutureFallback);
    }

    #[test]
    fn missing_everything_is_unavailable() {
        let reading = CurrentReading::resolve(WeatherField::WindSpeed, None, None, now());
        assert!(!reading.is_available());
        assert_eq!(reading.origin, ReadingOrigin::Unavailable);
    }

    #[test]
    fn map_value_converts() {
        let reading = CurrentReading::from_hourly(WeatherField::Temperature, Some(&hourly()), now())
            .map_value(|v| v * 2.0);
        assert_eq!(reading.value, Some(60.0));
        assert!(
            CurrentReading::unavailable(WeatherField::Temperature)
                .map_value(|v| v * 2.0)
                .value
                .is_none()
        );
    }

    #[test]
    fn serializes_origin_snake_case() {
        let reading = CurrentReading::from_hourly(WeatherField::Temperature, Some(&hourly()), now());
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["origin"], "hourly");
        assert_eq!(json["field"], "temperature");
        assert_eq!(json["sourced_at"], "2024-05-01T11:00");
    }
}
