//! 16-point compass sectors
//!
//! Sector `i` is centred on `i * 22.5°` and spans half a sector width on
//! either side, so sector 0 (N) covers 348.75° up to 11.25°.

use serde::{Serialize, Serializer};
use std::fmt;

/// One of the 16 compass sectors, in clockwise order starting at north
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompassSector(u8);

impl CompassSector {
    /// Number of sectors in the rose
    pub const COUNT: usize = 16;

    /// Angular width of one sector in degrees
    pub const WIDTH_DEG: f64 = 22.5;

    const LABELS: [&'static str; Self::COUNT] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];

    /// Sector for a direction in degrees.
    ///
    /// The angle is normalised into [0, 360) first, then divided by the sector
    /// width and rounded half-up, so 11.25° lands in sector 1 (NNE). Returns
    /// `None` for NaN or infinite input.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() {
            return None;
        }
        let normalized = degrees.rem_euclid(360.0);
        // normalized / WIDTH is in [0, 16], so the cast cannot truncate
        let index = (normalized / Self::WIDTH_DEG).round() as usize % Self::COUNT;
        Some(Self(index as u8))
    }

    /// Sector by index; indices wrap modulo 16
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_index(index: usize) -> Self {
        Self((index % Self::COUNT) as u8)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Compass abbreviation, e.g. `"NNE"`
    #[must_use]
    pub const fn label(self) -> &'static str {
        Self::LABELS[self.0 as usize]
    }

    /// Centre angle of the sector in degrees
    #[must_use]
    pub fn center_deg(self) -> f64 {
        f64::from(self.0) * Self::WIDTH_DEG
    }

    /// All sectors in compass order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::from_index)
    }
}

impl fmt::Display for CompassSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CompassSector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(deg: f64) -> usize {
        CompassSector::from_degrees(deg).unwrap().index()
    }

    #[test]
    fn cardinal_points() {
        assert_eq!(sector(0.0), 0);
        assert_eq!(sector(90.0), 4);
        assert_eq!(sector(180.0), 8);
        assert_eq!(sector(270.0), 12);
    }

    #[test]
    fn full_turn_wraps_to_north() {
        assert_eq!(sector(360.0), 0);
        assert_eq!(sector(720.0), 0);
        assert_eq!(sector(350.0), 0);
        assert_eq!(sector(348.75), 0);
    }

    #[test]
    fn tie_rounds_half_up() {
        assert_eq!(sector(11.25), 1);
        assert_eq!(sector(11.249), 0);
        assert_eq!(sector(33.75), 2);
    }

    #[test]
    fn negative_degrees_normalised() {
        assert_eq!(sector(-10.0), 0);
        assert_eq!(sector(-90.0), 12);
    }

    #[test]
    fn non_finite_has_no_sector() {
        assert!(CompassSector::from_degrees(f64::NAN).is_none());
        assert!(CompassSector::from_degrees(f64::INFINITY).is_none());
    }

    #[test]
    fn labels_and_centres() {
        let labels: Vec<_> = CompassSector::all().map(CompassSector::label).collect();
        assert_eq!(labels.len(), 16);
        assert_eq!(labels[0], "N");
        assert_eq!(labels[1], "NNE");
        assert_eq!(labels[15], "NNW");
        assert!((CompassSector::from_index(3).center_deg() - 67.5).abs() < f64::EPSILON);
        assert_eq!(CompassSector::from_index(17).index(), 1);
    }
}
