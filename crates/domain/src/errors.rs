//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Date/time parsing error
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    /// Unit name not recognised
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_creates_correct_error() {
        let err = DomainError::not_found("Region", "HN");
        match err {
            DomainError::NotFound { entity_type, id } => {
                assert_eq!(entity_type, "Region");
                assert_eq!(id, "HN");
            },
            _ => unreachable!("Expected NotFound error"),
        }
    }

    #[test]
    fn not_found_error_message_is_correct() {
        let err = DomainError::not_found("Region", "HN");
        assert_eq!(err.to_string(), "Region not found: HN");
    }

    #[test]
    fn invalid_coordinates_message_names_both_axes() {
        let err = DomainError::InvalidCoordinates {
            latitude: 91.0,
            longitude: 10.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid coordinates: latitude 91, longitude 10"
        );
    }

    #[test]
    fn unknown_unit_message() {
        let err = DomainError::UnknownUnit("furlong".to_string());
        assert_eq!(err.to_string(), "Unknown unit: furlong");
    }
}
