//! Open-Meteo weather integration
//!
//! Client for the Open-Meteo forecast API (<https://open-meteo.com>).
//! Fetches current, hourly and daily series for a coordinate pair in one
//! request and decodes them into an explicit, nullable schema. No API key
//! is required.

pub mod client;
mod models;
mod query;

pub use client::{OpenMeteoClient, SOURCE_TAG, WeatherClient, WeatherConfig, WeatherError};
pub use models::{ApiResponse, CurrentBlock, DailyBlock, HourlyBlock, HourlyUnits};
pub use query::{ForecastQuery, daily_variable, hourly_variable};
