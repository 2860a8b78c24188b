//! Application layer - Use cases and orchestration
//!
//! Defines the ports the engine needs (forecast provider, stores, run
//! reporter) and the services that drive them: per-region aggregation and
//! the multi-region batch run.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
