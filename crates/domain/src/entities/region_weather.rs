//! Per-region weather aggregate
//!
//! The single outward-facing view built from one provider fetch. Both the
//! on-demand lookup and the batch path produce this same shape.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::region::RegionSummary;
use crate::series::{CurrentReading, DailyPoint, PrecipitationDay, TemperatureRange, WindRose};
use crate::value_objects::GeoLocation;

/// Period covered by the wind rose, in hours
pub const WIND_ROSE_PERIOD_HOURS: usize = crate::series::ROSE_WINDOW;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureView {
    pub current: CurrentReading,
    pub daily_past_7: Vec<DailyPoint<TemperatureRange>>,
    pub daily_future_7: Vec<DailyPoint<TemperatureRange>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationView {
    /// Amount in mm
    pub amount: CurrentReading,
    /// Probability in %
    pub probability: CurrentReading,
    pub daily: Vec<DailyPoint<PrecipitationDay>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindView {
    pub speed_kmh: CurrentReading,
    pub direction_deg: CurrentReading,
    pub rose_period_hours: usize,
    pub rose: WindRose,
}

/// Everything known about one region's weather at a reference instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionWeather {
    pub region: RegionSummary,
    pub coord: GeoLocation,
    /// Provider-resolved timezone name, e.g. `Asia/Bangkok`
    pub timezone: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub temperature: TemperatureView,
    pub precipitation: PrecipitationView,
    pub wind: WindView,
    pub humidity: CurrentReading,
    pub cloud_cover: CurrentReading,
    pub pressure: CurrentReading,
}
