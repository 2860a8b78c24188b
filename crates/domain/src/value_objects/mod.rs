//! Value Objects - Immutable, identity-less domain primitives

mod compass;
mod geo_location;
mod region_id;
mod units;
mod weather_field;

pub use compass::CompassSector;
pub use geo_location::GeoLocation;
pub use region_id::RegionId;
pub use units::{PrecipitationUnit, WindSpeedUnit};
pub use weather_field::{DailyField, WeatherField};
