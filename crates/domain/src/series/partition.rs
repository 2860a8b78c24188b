//! Past/future windows over a daily series

use chrono::NaiveDate;
use serde::Serialize;

/// Maximum points kept on each side of the reference date
pub const DAILY_WINDOW: usize = 7;

/// A dated daily value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint<T> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub value: T,
}

/// Daily temperature extremes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TemperatureRange {
    pub max_c: Option<f64>,
    pub min_c: Option<f64>,
}

/// Daily precipitation outlook
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PrecipitationDay {
    pub sum_mm: Option<f64>,
    pub probability_max: Option<f64>,
}

/// Result of [`partition_daily`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyWindows<T> {
    /// Last [`DAILY_WINDOW`] points strictly before the reference date
    pub past: Vec<DailyPoint<T>>,
    /// First [`DAILY_WINDOW`] points on or after the reference date
    pub future: Vec<DailyPoint<T>>,
}

impl<T> Default for DailyWindows<T> {
    fn default() -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
        }
    }
}

/// Split dated points around `reference`.
///
/// Points without a date are dropped. Input order is preserved; nothing is
/// padded when a side has fewer than [`DAILY_WINDOW`] points.
pub fn partition_daily<T, I>(points: I, reference: NaiveDate) -> DailyWindows<T>
where
    I: IntoIterator<Item = (Option<NaiveDate>, T)>,
{
    let mut windows = DailyWindows::default();
    for (date, value) in points {
        let Some(date) = date else { continue };
        let point = DailyPoint { date, value };
        if date < reference {
            windows.past.push(point);
        } else if windows.future.len() < DAILY_WINDOW {
            windows.future.push(point);
        }
    }
    let excess = windows.past.len().saturating_sub(DAILY_WINDOW);
    windows.past.drain(..excess);
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap() + Duration::days(offset)
    }

    #[test]
    fn twenty_one_days_split_seven_and_seven() {
        let points = (-10..=10).map(|o| (Some(day(o)), o));
        let windows = partition_daily(points, day(0));

        assert_eq!(windows.past.len(), 7);
        assert_eq!(windows.past.first().unwrap().date, day(-7));
        assert_eq!(windows.past.last().unwrap().date, day(-1));

        assert_eq!(windows.future.len(), 7);
        assert_eq!(windows.future.first().unwrap().date, day(0));
        assert_eq!(windows.future.last().unwrap().date, day(6));
    }

    #[test]
    fn short_sides_are_not_padded() {
        let points = (-2..=1).map(|o| (Some(day(o)), ()));
        let windows = partition_daily(points, day(0));
        assert_eq!(windows.past.len(), 2);
        assert_eq!(windows.future.len(), 2);
    }

    #[test]
    fn undated_points_are_skipped() {
        let points = vec![(Some(day(-1)), 1), (None, 2), (Some(day(0)), 3)];
        let windows = partition_daily(points, day(0));
        assert_eq!(windows.past.len(), 1);
        assert_eq!(windows.future.len(), 1);
        assert_eq!(windows.future[0].value, 3);
    }

    #[test]
    fn reference_date_is_future() {
        let windows = partition_daily(vec![(Some(day(0)), ())], day(0));
        assert!(windows.past.is_empty());
        assert_eq!(windows.future.len(), 1);
    }

    #[test]
    fn point_flattens_value_fields() {
        let point = DailyPoint {
            date: day(0),
            value: TemperatureRange {
                max_c: Some(31.0),
                min_c: None,
            },
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["date"], "2024-05-15");
        assert_eq!(json["max_c"], 31.0);
        assert!(json["min_c"].is_null());
    }
}
