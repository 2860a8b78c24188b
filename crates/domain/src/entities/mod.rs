//! Domain entities - Objects with identity and lifecycle

mod observation;
mod region;
mod region_weather;

pub use observation::{HistoricalRecord, ObservationValues, WeatherSnapshot};
pub use region::{Region, RegionDraft, RegionSummary};
pub use region_weather::{
    PrecipitationView, RegionWeather, TemperatureView, WIND_ROSE_PERIOD_HOURS, WindView,
};
