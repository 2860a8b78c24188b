//! Domain layer for regioncast
//!
//! Contains the region and forecast-series model, the pure reconciliation
//! algorithms (alignment, wind rose, daily windows) and domain errors.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod series;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use series::*;
pub use value_objects::*;
