//! Forecast provider port
//!
//! Defines the interface for fetching raw forecast series for one location.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use domain::{
    CurrentConditions, DailyField, DailySeries, GeoLocation, HourlySeries, PrecipitationUnit,
    WeatherField, WindSpeedUnit,
};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// What to ask the provider for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    /// Fields wanted in the provider's "current" block
    pub current: Vec<WeatherField>,
    pub hourly: Vec<WeatherField>,
    pub daily: Vec<DailyField>,
    /// Days of history before today
    pub past_days: u8,
    /// Days of forecast including today
    pub forecast_days: u8,
    /// IANA zone name or `auto`
    pub timezone: String,
    pub wind_speed_unit: WindSpeedUnit,
    pub precipitation_unit: PrecipitationUnit,
}

/// Decoded provider response.
///
/// Every timestamp inside has already been parsed against `utc_offset`.
/// `hourly`/`daily` are `None` when the provider omitted the whole block.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPayload {
    /// Provider tag recorded on snapshots
    pub source: String,
    /// Resolved timezone name, if reported
    pub timezone: Option<String>,
    /// Offset of the payload's local times
    pub utc_offset: FixedOffset,
    pub current: Option<CurrentConditions>,
    pub hourly: Option<HourlySeries>,
    pub daily: Option<DailySeries>,
    /// Unit of wind speed values in `current`/`hourly`
    pub wind_speed_unit: WindSpeedUnit,
    /// Unit of precipitation values in `current`/`hourly`/`daily`
    pub precipitation_unit: PrecipitationUnit,
}

impl ForecastPayload {
    /// Calendar date of `now` in the payload's local offset
    #[must_use]
    pub fn local_today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset).date_naive()
    }
}

/// Port for forecast provider operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Fetch and decode one forecast payload.
    ///
    /// Network failures, timeouts and non-success statuses are
    /// `ApplicationError::Transport`; an undecodable body is
    /// `ApplicationError::MalformedPayload`.
    async fn fetch(
        &self,
        location: &GeoLocation,
        request: &ForecastRequest,
    ) -> Result<ForecastPayload, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn _assert_object_safe(_: &dyn ForecastPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ForecastPort>();
    }

    #[test]
    fn local_today_uses_payload_offset() {
        let payload = ForecastPayload {
            source: "test".to_string(),
            timezone: None,
            utc_offset: FixedOffset::east_opt(7 * 3600).unwrap(),
            current: None,
            hourly: None,
            daily: None,
            wind_speed_unit: WindSpeedUnit::Ms,
            precipitation_unit: PrecipitationUnit::Mm,
        };
        // 20:00 UTC is already the next day at +07:00
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        assert_eq!(payload.local_today(now), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    }
}
