//! Unit systems accepted from the forecast provider

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

const KMH_PER_MS: f64 = 3.6;
const MS_PER_MPH: f64 = 0.447_04;
const MS_PER_KNOT: f64 = 1852.0 / 3600.0;
const MM_PER_INCH: f64 = 25.4;

/// Wind speed unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    Kmh,
    #[default]
    Ms,
    Mph,
    Kn,
}

impl WindSpeedUnit {
    /// Query-parameter spelling (`kmh`, `ms`, `mph`, `kn`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kmh => "kmh",
            Self::Ms => "ms",
            Self::Mph => "mph",
            Self::Kn => "kn",
        }
    }

    /// Convert a value in this unit to metres per second
    #[must_use]
    pub fn to_ms(self, value: f64) -> f64 {
        match self {
            Self::Kmh => value / KMH_PER_MS,
            Self::Ms => value,
            Self::Mph => value * MS_PER_MPH,
            Self::Kn => value * MS_PER_KNOT,
        }
    }

    /// Convert a value in this unit to kilometres per hour
    #[must_use]
    pub fn to_kmh(self, value: f64) -> f64 {
        match self {
            Self::Kmh => value,
            other => other.to_ms(value) * KMH_PER_MS,
        }
    }
}

impl FromStr for WindSpeedUnit {
    type Err = DomainError;

    /// Accepts both the query spelling and the provider's display label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kmh" | "km/h" => Ok(Self::Kmh),
            "ms" | "m/s" => Ok(Self::Ms),
            "mph" | "mp/h" => Ok(Self::Mph),
            "kn" | "kt" | "knots" => Ok(Self::Kn),
            other => Err(DomainError::UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for WindSpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precipitation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    Inch,
}

impl PrecipitationUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Inch => "inch",
        }
    }

    /// Convert a value in this unit to millimetres
    #[must_use]
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Mm => value,
            Self::Inch => value * MM_PER_INCH,
        }
    }
}

impl FromStr for PrecipitationUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(Self::Mm),
            "inch" | "in" => Ok(Self::Inch),
            other => Err(DomainError::UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for PrecipitationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
