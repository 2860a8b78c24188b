//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Region cannot be aggregated because it has no coordinates
    #[error("Region {code} has no coordinates")]
    MissingCoordinates { code: String },

    /// Provider unreachable, timed out or answered with a non-success status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered but a required block is absent or unusable
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Store write or read failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Short machine-readable name of the variant
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::MissingCoordinates { .. } => "missing_coordinates",
            Self::Transport(_) => "transport",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::Persistence(_) => "persistence",
            Self::NotFound(_) => "not_found",
            Self::Configuration(_) => "configuration",
            Self::Internal(_) => "internal",
        }
    }
}
