//! Tracked regions

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{GeoLocation, RegionId};

/// A tracked geographic region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    /// Stable external code, unique across regions
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Region {
    pub fn new(id: RegionId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            level: None,
            latitude: None,
            longitude: None,
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Validated coordinates.
    ///
    /// `Ok(None)` when either coordinate is absent, which disables
    /// aggregation for the region. Present but out-of-range coordinates are
    /// an error.
    pub fn location(&self) -> Result<Option<GeoLocation>, DomainError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoLocation::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }

    #[must_use]
    pub fn summary(&self) -> RegionSummary {
        RegionSummary {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            level: self.level.clone(),
        }
    }
}

/// Identity part of a region, as exposed in aggregates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub id: RegionId,
    pub code: String,
    pub name: String,
    pub level: Option<String>,
}

/// A region before the store has assigned it an id (import input)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDraft {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl RegionDraft {
    /// Reject blank codes/names and out-of-range coordinates
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.code.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "region code must not be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::ValidationError(format!(
                "region {} has an empty name",
                self.code
            )));
        }
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            GeoLocation::new(lat, lon)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn into_region(self, id: RegionId) -> Region {
        Region {
            id,
            code: self.code,
            name: self.name,
            level: self.level,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
