//! Shared payload builders for service tests

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use domain::{
    CurrentConditions, DailyField, DailySeries, DayStamp, HourlySeries, PrecipitationUnit,
    Region, RegionId, SampleTime, WeatherField, WindSpeedUnit,
};

use crate::ports::ForecastPayload;

pub fn ict() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

/// 2024-05-01 12:00 at +07:00
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 5, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

pub fn region(id: i64, code: &str) -> Region {
    Region::new(RegionId::new(id), code, format!("Region {code}")).with_coordinates(10.0, 106.0)
}

/// Local hours 00:00..23:00 of 2024-05-01; index 12 is "now"
pub fn hourly() -> HourlySeries {
    let time = (0..24)
        .map(|h| SampleTime::parse(format!("2024-05-01T{h:02}:00"), ict()))
        .collect();
    let idx = |f: fn(f64) -> f64| (0..24).map(|h| Some(f(f64::from(h)))).collect::<Vec<_>>();
    HourlySeries::new(time)
        .with_column(WeatherField::Temperature, idx(|h| 25.0 + h / 2.0))
        .with_column(WeatherField::RelativeHumidity, idx(|h| 60.0 + h))
        .with_column(WeatherField::SurfacePressure, idx(|_| 1008.0))
        .with_column(WeatherField::WindSpeed, idx(|h| h / 10.0))
        .with_column(WeatherField::WindDirection, idx(|_| 90.0))
        .with_column(WeatherField::CloudCover, idx(|h| h * 4.0))
        .with_column(WeatherField::Precipitation, idx(|_| 0.2))
        .with_column(WeatherField::PrecipitationProbability, idx(|h| h))
}

/// 2024-04-24 ..= 2024-05-08 (7 past, today, 7 future)
pub fn daily() -> DailySeries {
    let dates: Vec<_> = (-7..=7).map(|o| today() + Duration::days(o)).collect();
    let time = dates.iter().copied().map(DayStamp::from_date).collect();
    let n = dates.len();
    DailySeries::new(time)
        .with_column(DailyField::TemperatureMax, vec![Some(34.0); n])
        .with_column(DailyField::TemperatureMin, vec![Some(25.0); n])
        .with_column(DailyField::PrecipitationSum, vec![Some(1.5); n])
        .with_column(DailyField::PrecipitationProbabilityMax, vec![Some(40.0); n])
}

pub fn payload() -> ForecastPayload {
    ForecastPayload {
        source: "test-provider".to_string(),
        timezone: Some("Asia/Bangkok".to_string()),
        utc_offset: ict(),
        current: Some(
            CurrentConditions::new(Some(SampleTime::parse("2024-05-01T12:00", ict())))
                .with_value(WeatherField::Temperature, 33.0)
                .with_value(WeatherField::Precipitation, 0.0),
        ),
        hourly: Some(hourly()),
        daily: Some(daily()),
        wind_speed_unit: WindSpeedUnit::Ms,
        precipitation_unit: PrecipitationUnit::Mm,
    }
}
