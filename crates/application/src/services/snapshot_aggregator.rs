//! Per-region aggregation
//!
//! Turns one provider payload into the outward-facing [`RegionWeather`]
//! aggregate and, for the batch path, into the snapshot and history rows
//! that get persisted.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{
    CurrentReading, DailyField, DailySeries, GeoLocation, HistoricalRecord, HourlySeries,
    ObservationValues, PrecipitationDay, PrecipitationUnit, PrecipitationView, Region,
    RegionId, RegionWeather, TemperatureRange, TemperatureView, WIND_ROSE_PERIOD_HOURS,
    WeatherField, WeatherSnapshot, WindRose, WindSpeedUnit, WindView, locate, partition_daily,
    trailing_window,
};
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{ForecastPayload, ForecastPort, ForecastRequest},
};

/// Fields requested in the `current` block. Wind is read from the hourly
/// series only, so the rose and the speed share one sample.
const CURRENT_FIELDS: [WeatherField; 6] = [
    WeatherField::Temperature,
    WeatherField::RelativeHumidity,
    WeatherField::SurfacePressure,
    WeatherField::CloudCover,
    WeatherField::Precipitation,
    WeatherField::PrecipitationProbability,
];

/// Configuration for the aggregator's provider request
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Days of daily/hourly history to request (default: 7)
    pub past_days: u8,
    /// Days of forecast to request, today included (default: 7)
    pub forecast_days: u8,
    /// Timezone sent to the provider (default: `auto`)
    pub timezone: String,
    /// Wind speed unit to request (default: m/s)
    pub wind_speed_unit: WindSpeedUnit,
    /// Precipitation unit to request (default: mm)
    pub precipitation_unit: PrecipitationUnit,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            past_days: 7,
            forecast_days: 7,
            timezone: "auto".to_string(),
            wind_speed_unit: WindSpeedUnit::Ms,
            precipitation_unit: PrecipitationUnit::Mm,
        }
    }
}

/// Everything the batch path derives from one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCollection {
    pub aggregate: RegionWeather,
    pub snapshot: WeatherSnapshot,
    pub history: Vec<HistoricalRecord>,
}

/// Fetches and reconciles forecast data for one region at a time
#[derive(Clone)]
pub struct SnapshotAggregator {
    forecast: Arc<dyn ForecastPort>,
    config: AggregatorConfig,
}

impl fmt::Debug for SnapshotAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotAggregator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SnapshotAggregator {
    #[must_use]
    pub fn new(forecast: Arc<dyn ForecastPort>, config: AggregatorConfig) -> Self {
        Self { forecast, config }
    }

    /// The single request covering every domain of the aggregate
    #[must_use]
    pub fn request(&self) -> ForecastRequest {
        ForecastRequest {
            current: CURRENT_FIELDS.to_vec(),
            hourly: WeatherField::ALL.to_vec(),
            daily: DailyField::ALL.to_vec(),
            past_days: self.config.past_days,
            forecast_days: self.config.forecast_days,
            timezone: self.config.timezone.clone(),
            wind_speed_unit: self.config.wind_speed_unit,
            precipitation_unit: self.config.precipitation_unit,
        }
    }

    /// Build the aggregate for one region
    #[instrument(skip(self, region), fields(region = %region.code))]
    pub async fn aggregate_region(
        &self,
        region: &Region,
        now: DateTime<Utc>,
    ) -> Result<RegionWeather, ApplicationError> {
        let (location, payload) = self.fetch(region).await?;
        build_aggregate(region, location, &payload, now)
    }

    /// Build the aggregate plus the snapshot/history rows for one region
    #[instrument(skip(self, region), fields(region = %region.code))]
    pub async fn collect_region(
        &self,
        region: &Region,
        now: DateTime<Utc>,
    ) -> Result<RegionCollection, ApplicationError> {
        let (location, payload) = self.fetch(region).await?;
        let aggregate = build_aggregate(region, location, &payload, now)?;
        let (snapshot, history) = build_records(region.id, &payload, now)?;
        debug!(history = history.len(), snapshot_time = %snapshot.snapshot_time, "Collected region");
        Ok(RegionCollection {
            aggregate,
            snapshot,
            history,
        })
    }

    async fn fetch(
        &self,
        region: &Region,
    ) -> Result<(GeoLocation, ForecastPayload), ApplicationError> {
        let location = region
            .location()?
            .ok_or_else(|| ApplicationError::MissingCoordinates {
                code: region.code.clone(),
            })?;
        let payload = self.forecast.fetch(&location, &self.request()).await?;
        Ok((location, payload))
    }
}

fn require_hourly(payload: &ForecastPayload) -> Result<&HourlySeries, ApplicationError> {
    payload
        .hourly
        .as_ref()
        .ok_or_else(|| ApplicationError::MalformedPayload("hourly block missing".to_string()))
}

fn require_daily(payload: &ForecastPayload) -> Result<&DailySeries, ApplicationError> {
    payload
        .daily
        .as_ref()
        .ok_or_else(|| ApplicationError::MalformedPayload("daily block missing".to_string()))
}

/// Reconcile a payload against `now` into the region aggregate.
///
/// Fails only when the hourly or daily block is missing entirely; a missing
/// or misaligned column degrades its own reading to unavailable.
pub fn build_aggregate(
    region: &Region,
    location: GeoLocation,
    payload: &ForecastPayload,
    now: DateTime<Utc>,
) -> Result<RegionWeather, ApplicationError> {
    let hourly = require_hourly(payload)?;
    let daily = require_daily(payload)?;
    let current = payload.current.as_ref();
    let resolve = |field| CurrentReading::resolve(field, current, Some(hourly), now);

    let temperature = temperature_view(resolve(WeatherField::Temperature), daily, payload, now);

    let precipitation_unit = payload.precipitation_unit;
    let precipitation = PrecipitationView {
        amount: resolve(WeatherField::Precipitation).map_value(|v| precipitation_unit.to_mm(v)),
        probability: resolve(WeatherField::PrecipitationProbability),
        daily: precipitation_outlook(daily, payload, now),
    };

    let wind = wind_view(hourly, payload.wind_speed_unit, now);
    debug!(
        region = %region.code,
        temperature_available = temperature.current.is_available(),
        rose_samples = wind.rose.total(),
        "Aggregate built"
    );

    Ok(RegionWeather {
        region: region.summary(),
        coord: location,
        timezone: payload.timezone.clone(),
        generated_at: now,
        temperature,
        precipitation,
        wind,
        humidity: resolve(WeatherField::RelativeHumidity),
        cloud_cover: resolve(WeatherField::CloudCover),
        pressure: resolve(WeatherField::SurfacePressure),
    })
}

fn temperature_view(
    current: CurrentReading,
    daily: &DailySeries,
    payload: &ForecastPayload,
    now: DateTime<Utc>,
) -> TemperatureView {
    let reference = current
        .local_date()
        .unwrap_or_else(|| payload.local_today(now));

    let windows = if daily.is_aligned(DailyField::TemperatureMax)
        && daily.is_aligned(DailyField::TemperatureMin)
    {
        let points = daily.time().iter().enumerate().map(|(i, day)| {
            let range = TemperatureRange {
                max_c: daily.value_at(DailyField::TemperatureMax, i),
                min_c: daily.value_at(DailyField::TemperatureMin, i),
            };
            (day.date(), range)
        });
        partition_daily(points, reference)
    } else {
        debug!("Daily temperature columns missing or misaligned");
        domain::DailyWindows::default()
    };

    TemperatureView {
        current,
        daily_past_7: windows.past,
        daily_future_7: windows.future,
    }
}

fn precipitation_outlook(
    daily: &DailySeries,
    payload: &ForecastPayload,
    now: DateTime<Utc>,
) -> Vec<domain::DailyPoint<PrecipitationDay>> {
    if daily.column(DailyField::PrecipitationSum).is_none()
        && daily.column(DailyField::PrecipitationProbabilityMax).is_none()
    {
        return Vec::new();
    }
    let unit = payload.precipitation_unit;
    let points = daily.time().iter().enumerate().map(|(i, day)| {
        let outlook = PrecipitationDay {
            sum_mm: daily
                .value_at(DailyField::PrecipitationSum, i)
                .map(|v| unit.to_mm(v)),
            probability_max: daily.value_at(DailyField::PrecipitationProbabilityMax, i),
        };
        (day.date(), outlook)
    });
    // the forward window of a past/future split is exactly "today onward, at most 7"
    partition_daily(points, payload.local_today(now)).future
}

fn wind_view(hourly: &HourlySeries, unit: WindSpeedUnit, now: DateTime<Utc>) -> WindView {
    let speed_kmh = CurrentReading::from_hourly(WeatherField::WindSpeed, Some(hourly), now)
        .map_value(|v| unit.to_kmh(v));
    let direction_deg = CurrentReading::from_hourly(WeatherField::WindDirection, Some(hourly), now);

    let rose = match (
        locate(hourly.time(), now),
        hourly.column(WeatherField::WindDirection),
    ) {
        (Some(alignment), Some(directions)) => {
            WindRose::from_samples(trailing_window(directions, alignment.index))
        },
        _ => WindRose::empty(),
    };

    WindView {
        speed_kmh,
        direction_deg,
        rose_period_hours: WIND_ROSE_PERIOD_HOURS,
        rose,
    }
}

/// Snapshot and history rows for one payload.
///
/// The snapshot is taken from the latest hourly sample at or before `now`
/// (last sample if all are later). History holds one row per parsed hourly
/// timestamp; unparsed timestamps are dropped.
pub fn build_records(
    region_id: RegionId,
    payload: &ForecastPayload,
    now: DateTime<Utc>,
) -> Result<(WeatherSnapshot, Vec<HistoricalRecord>), ApplicationError> {
    let hourly = require_hourly(payload)?;
    let alignment = locate(hourly.time(), now)
        .ok_or_else(|| ApplicationError::MalformedPayload("hourly time axis is empty".to_string()))?;
    let snapshot_time = hourly.time()[alignment.index].utc().ok_or_else(|| {
        ApplicationError::MalformedPayload("no parseable hourly timestamp".to_string())
    })?;

    let values_at = |index| {
        ObservationValues::from_hourly(
            hourly,
            index,
            payload.wind_speed_unit,
            payload.precipitation_unit,
        )
    };

    let snapshot = WeatherSnapshot {
        region_id,
        snapshot_time,
        values: values_at(alignment.index),
        source: payload.source.clone(),
        created_at: now,
        updated_at: now,
    };

    if snapshot.values.is_empty() {
        warn!(%region_id, %snapshot_time, "Snapshot hour carries no values");
    }

    let history: Vec<_> = hourly
        .time()
        .iter()
        .enumerate()
        .filter_map(|(index, time)| {
            time.utc().map(|forecast_time| HistoricalRecord {
                region_id,
                forecast_time,
                values: values_at(index),
                created_at: now,
            })
        })
        .collect();

    let dropped = hourly.len() - history.len();
    if dropped > 0 {
        debug!(%region_id, dropped, "Skipped unparseable hourly timestamps");
    }

    Ok((snapshot, history))
}
