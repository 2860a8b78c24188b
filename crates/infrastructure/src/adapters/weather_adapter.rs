//! Weather adapter - Implements ForecastPort using integration_weather
//!
//! Translates the port's request into an Open-Meteo query and the decoded
//! response into domain series. Local timestamps are resolved in the
//! payload's IANA zone when it is known, so each hour carries the offset in
//! force at that hour; otherwise the payload-wide UTC offset is attached.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{ForecastPayload, ForecastPort, ForecastRequest},
};
use async_trait::async_trait;
use chrono::FixedOffset;
use chrono_tz::Tz;
use domain::{
    CurrentConditions, DailyField, DailySeries, DayStamp, GeoLocation, HourlySeries,
    PrecipitationUnit, SampleTime, WeatherField, WindSpeedUnit,
};
use integration_weather::{
    ApiResponse, CurrentBlock, DailyBlock, ForecastQuery, HourlyBlock, HourlyUnits,
    OpenMeteoClient, SOURCE_TAG, WeatherClient, WeatherConfig, WeatherError,
};
use tracing::{debug, instrument, warn};

/// Zone the provider's local timestamps are expressed in
#[derive(Debug, Clone, Copy)]
enum LocalZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Named zone from the payload, falling back to its fixed offset
    fn resolve(timezone: Option<&str>, offset: FixedOffset) -> Self {
        match timezone.map(str::parse::<Tz>) {
            Some(Ok(tz)) => Self::Named(tz),
            Some(Err(e)) => {
                warn!(error = %e, "Unknown payload timezone, using fixed UTC offset");
                Self::Fixed(offset)
            },
            None => Self::Fixed(offset),
        }
    }

    fn parse(self, raw: &str) -> SampleTime {
        match self {
            Self::Named(tz) => SampleTime::parse_in(raw, &tz),
            Self::Fixed(offset) => SampleTime::parse(raw, offset),
        }
    }
}

/// Adapter for the Open-Meteo forecast API
pub struct WeatherAdapter {
    client: Arc<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter").finish_non_exhaustive()
    }
}

impl WeatherAdapter {
    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client = OpenMeteoClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Wrap an existing client
    #[must_use]
    pub fn with_client(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ParseError(e) => ApplicationError::MalformedPayload(e),
            WeatherError::InvalidCoordinates => {
                ApplicationError::Configuration(WeatherError::InvalidCoordinates.to_string())
            },
            other => ApplicationError::Transport(other.to_string()),
        }
    }

    fn to_query(request: &ForecastRequest) -> ForecastQuery {
        ForecastQuery {
            current: request.current.clone(),
            hourly: request.hourly.clone(),
            daily: request.daily.clone(),
            past_days: Some(request.past_days),
            forecast_days: Some(request.forecast_days),
            timezone: request.timezone.clone(),
            wind_speed_unit: Some(request.wind_speed_unit),
            precipitation_unit: Some(request.precipitation_unit),
        }
    }

    /// Convert a decoded response into the port's payload
    fn to_payload(
        response: ApiResponse,
        request: &ForecastRequest,
    ) -> Result<ForecastPayload, ApplicationError> {
        let offset = FixedOffset::east_opt(response.utc_offset_seconds).ok_or_else(|| {
            ApplicationError::MalformedPayload(format!(
                "utc_offset_seconds out of range: {}",
                response.utc_offset_seconds
            ))
        })?;

        let zone = LocalZone::resolve(response.timezone.as_deref(), offset);
        let (wind_speed_unit, precipitation_unit) =
            Self::resolve_units(response.hourly_units.as_ref(), request);

        Ok(ForecastPayload {
            source: SOURCE_TAG.to_string(),
            timezone: response.timezone,
            utc_offset: offset,
            current: response.current.map(|c| Self::to_current(c, zone)),
            hourly: response.hourly.map(|h| Self::to_hourly(h, zone)),
            daily: response.daily.map(Self::to_daily),
            wind_speed_unit,
            precipitation_unit,
        })
    }

    /// Units reported by the provider win over the requested ones
    fn resolve_units(
        units: Option<&HourlyUnits>,
        request: &ForecastRequest,
    ) -> (WindSpeedUnit, PrecipitationUnit) {
        let wind = units
            .and_then(|u| u.wind_speed_10m.as_deref())
            .and_then(|label| {
                label
                    .parse::<WindSpeedUnit>()
                    .inspect_err(|e| warn!(label, error = %e, "Unrecognised wind speed unit"))
                    .ok()
            })
            .unwrap_or(request.wind_speed_unit);

        let precipitation = units
            .and_then(|u| u.precipitation.as_deref())
            .and_then(|label| {
                label
                    .parse::<PrecipitationUnit>()
                    .inspect_err(|e| warn!(label, error = %e, "Unrecognised precipitation unit"))
                    .ok()
            })
            .unwrap_or(request.precipitation_unit);

        (wind, precipitation)
    }

    fn to_current(block: CurrentBlock, zone: LocalZone) -> CurrentConditions {
        let time = block.time.as_deref().map(|t| zone.parse(t));
        let mut current = CurrentConditions::new(time);
        for field in WeatherField::ALL {
            if let Some(value) = block.value(field) {
                current.insert(field, value);
            }
        }
        current
    }

    fn to_hourly(block: HourlyBlock, zone: LocalZone) -> HourlySeries {
        let mut series = HourlySeries::new(
            block
                .time
                .iter()
                .map(|t| zone.parse(t.as_deref().unwrap_or_default()))
                .collect(),
        );
        for field in WeatherField::ALL {
            if let Some(column) = block.column(field) {
                series.insert(field, column.to_vec());
            }
        }
        series
    }

    fn to_daily(block: DailyBlock) -> DailySeries {
        let mut series = DailySeries::new(
            block
                .time
                .iter()
                .map(|t| DayStamp::parse(t.as_deref().unwrap_or_default()))
                .collect(),
        );
        for field in DailyField::ALL {
            if let Some(column) = block.column(field) {
                series.insert(field, column.to_vec());
            }
        }
        series
    }
}

#[async_trait]
impl ForecastPort for WeatherAdapter {
    #[instrument(skip(self, request), fields(location = %location))]
    async fn fetch(
        &self,
        location: &GeoLocation,
        request: &ForecastRequest,
    ) -> Result<ForecastPayload, ApplicationError> {
        let query = Self::to_query(request);
        let response = self
            .client
            .fetch_forecast(location.latitude(), location.longitude(), &query)
            .await
            .map_err(Self::map_error)?;

        let payload = Self::to_payload(response, request)?;
        debug!(
            hourly = payload.hourly.as_ref().map_or(0, HourlySeries::len),
            daily = payload.daily.as_ref().map_or(0, DailySeries::len),
            timezone = payload.timezone.as_deref().unwrap_or("-"),
            "Forecast decoded"
        );
        Ok(payload)
    }
}
