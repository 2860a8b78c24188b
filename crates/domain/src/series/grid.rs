//! Typed hourly/daily grids decoded from a provider payload

use std::collections::BTreeMap;

use super::sample_time::{DayStamp, SampleTime};
use crate::value_objects::{DailyField, WeatherField};

/// Hourly series: one `time` axis plus one value column per field.
///
/// Columns are expected to match the time axis in length, but a shorter or
/// longer column is kept as-is; readers treat an out-of-range index as a
/// missing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    time: Vec<SampleTime>,
    columns: BTreeMap<WeatherField, Vec<Option<f64>>>,
}

impl HourlySeries {
    #[must_use]
    pub fn new(time: Vec<SampleTime>) -> Self {
        Self {
            time,
            columns: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_column(mut self, field: WeatherField, values: Vec<Option<f64>>) -> Self {
        self.insert(field, values);
        self
    }

    pub fn insert(&mut self, field: WeatherField, values: Vec<Option<f64>>) {
        self.columns.insert(field, values);
    }

    #[must_use]
    pub fn time(&self) -> &[SampleTime] {
        &self.time
    }

    #[must_use]
    pub fn column(&self, field: WeatherField) -> Option<&[Option<f64>]> {
        self.columns.get(&field).map(Vec::as_slice)
    }

    /// Value of `field` at `index`, `None` when absent or null
    #[must_use]
    pub fn value_at(&self, field: WeatherField, index: usize) -> Option<f64> {
        self.column(field)
            .and_then(|c| c.get(index).copied())
            .flatten()
    }

    /// Whether the column exists and has exactly one entry per timestamp
    #[must_use]
    pub fn is_aligned(&self, field: WeatherField) -> bool {
        self.column(field).is_some_and(|c| c.len() == self.time.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Daily series with its own date axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    time: Vec<DayStamp>,
    columns: BTreeMap<DailyField, Vec<Option<f64>>>,
}

impl DailySeries {
    #[must_use]
    pub fn new(time: Vec<DayStamp>) -> Self {
        Self {
            time,
            columns: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_column(mut self, field: DailyField, values: Vec<Option<f64>>) -> Self {
        self.insert(field, values);
        self
    }

    pub fn insert(&mut self, field: DailyField, values: Vec<Option<f64>>) {
        self.columns.insert(field, values);
    }

    #[must_use]
    pub fn time(&self) -> &[DayStamp] {
        &self.time
    }

    #[must_use]
    pub fn column(&self, field: DailyField) -> Option<&[Option<f64>]> {
        self.columns.get(&field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn value_at(&self, field: DailyField, index: usize) -> Option<f64> {
        self.column(field)
            .and_then(|c| c.get(index).copied())
            .flatten()
    }

    #[must_use]
    pub fn is_aligned(&self, field: DailyField) -> bool {
        self.column(field).is_some_and(|c| c.len() == self.time.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Provider-reported "current" block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentConditions {
    time: Option<SampleTime>,
    values: BTreeMap<WeatherField, f64>,
}

impl CurrentConditions {
    #[must_use]
    pub fn new(time: Option<SampleTime>) -> Self {
        Self {
            time,
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, field: WeatherField, value: f64) -> Self {
        self.values.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: WeatherField, value: f64) {
        self.values.insert(field, value);
    }

    #[must_use]
    pub const fn time(&self) -> Option<&SampleTime> {
        self.time.as_ref()
    }

    #[must_use]
    pub fn get(&self, field: WeatherField) -> Option<f64> {
        self.values.get(&field).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn times(raw: &[&str]) -> Vec<SampleTime> {
        let utc = FixedOffset::east_opt(0).unwrap();
        raw.iter().map(|r| SampleTime::parse(*r, utc)).collect()
    }

    #[test]
    fn value_at_handles_short_and_null_columns() {
        let series = HourlySeries::new(times(&["2024-05-01T00:00", "2024-05-01T01:00"]))
            .with_column(WeatherField::Temperature, vec![Some(20.0)])
            .with_column(WeatherField::CloudCover, vec![None, Some(40.0)]);

        assert_eq!(series.value_at(WeatherField::Temperature, 0), Some(20.0));
        assert_eq!(series.value_at(WeatherField::Temperature, 1), None);
        assert_eq!(series.value_at(WeatherField::CloudCover, 0), None);
        assert_eq!(series.value_at(WeatherField::WindSpeed, 0), None);
        assert!(!series.is_aligned(WeatherField::Temperature));
        assert!(series.is_aligned(WeatherField::CloudCover));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn daily_columns() {
        let series = DailySeries::new(vec![DayStamp::parse("2024-05-01")])
            .with_column(DailyField::TemperatureMax, vec![Some(31.0)]);
        assert_eq!(series.value_at(DailyField::TemperatureMax, 0), Some(31.0));
        assert!(series.column(DailyField::TemperatureMin).is_none());
        assert!(!series.is_empty());
    }

    #[test]
    fn current_conditions_lookup() {
        let current = CurrentConditions::new(None).with_value(WeatherField::Temperature, 18.5);
        assert_eq!(current.get(WeatherField::Temperature), Some(18.5));
        assert_eq!(current.get(WeatherField::CloudCover), None);
        assert!(current.time().is_none());
    }
}
