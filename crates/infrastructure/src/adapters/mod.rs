//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod tracing_reporter;
mod weather_adapter;

pub use tracing_reporter::TracingBatchReporter;
pub use weather_adapter::WeatherAdapter;
