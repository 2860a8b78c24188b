//! Shared error mapping for sqlx persistence layer

use application::error::ApplicationError;
use chrono::{DateTime, Utc};

/// Map a sqlx error to an application-layer error
pub fn map_sqlx_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::RowNotFound => {
            ApplicationError::NotFound("Database record not found".to_string())
        },
        sqlx::Error::Database(db_err) => {
            ApplicationError::Persistence(format!("Database error: {db_err}"))
        },
        other => ApplicationError::Persistence(format!("Database error: {other}")),
    }
}

/// Parse a stored RFC 3339 timestamp
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, ApplicationError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApplicationError::Persistence(format!("Invalid stored timestamp '{s}': {e}")))
}

/// Canonical storage form of an instant: UTC, second precision, `Z` suffix
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            ApplicationError::NotFound(_)
        ));
    }

    #[test]
    fn other_errors_map_to_persistence() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), "persistence");
    }

    #[test]
    fn datetime_round_trips_through_storage_form() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 5, 0, 0).unwrap();
        let stored = format_datetime(&dt);
        assert_eq!(stored, "2024-05-01T05:00:00Z");
        assert_eq!(parse_datetime(&stored).unwrap(), dt);
    }

    #[test]
    fn offset_timestamps_normalise_to_utc() {
        let parsed = parse_datetime("2024-05-01T12:00:00+07:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 5, 0, 0).unwrap());
    }

    #[test]
    fn garbage_timestamp_is_persistence_error() {
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(ApplicationError::Persistence(_))
        ));
    }
}
