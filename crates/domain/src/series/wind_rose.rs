//! 16-sector wind direction histogram

use serde::{Serialize, ser::SerializeStruct};

use crate::value_objects::CompassSector;

/// Number of trailing hourly samples a rose covers
pub const ROSE_WINDOW: usize = 24;

/// One sector of a [`WindRose`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindRoseBucket {
    pub sector: CompassSector,
    pub count: u32,
}

impl Serialize for WindRoseBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WindRoseBucket", 3)?;
        state.serialize_field("dir_label", self.sector.label())?;
        state.serialize_field("angle_deg", &self.sector.center_deg())?;
        state.serialize_field("count", &self.count)?;
        state.end()
    }
}

/// Histogram of wind directions over a trailing window.
///
/// Always holds all 16 sectors in compass order, empty sectors included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WindRose {
    buckets: Vec<WindRoseBucket>,
}

impl WindRose {
    /// A rose with every sector at zero
    #[must_use]
    pub fn empty() -> Self {
        Self {
            buckets: CompassSector::all()
                .map(|sector| WindRoseBucket { sector, count: 0 })
                .collect(),
        }
    }

    /// Bucket the last [`ROSE_WINDOW`] samples; nulls and non-finite values
    /// are skipped.
    #[must_use]
    pub fn from_samples(samples: &[Option<f64>]) -> Self {
        let start = samples.len().saturating_sub(ROSE_WINDOW);
        let mut rose = Self::empty();
        for degrees in samples[start..].iter().flatten() {
            if let Some(sector) = CompassSector::from_degrees(*degrees) {
                rose.buckets[sector.index()].count += 1;
            }
        }
        rose
    }

    #[must_use]
    pub fn buckets(&self) -> &[WindRoseBucket] {
        &self.buckets
    }

    #[must_use]
    pub fn count(&self, sector: CompassSector) -> u32 {
        self.buckets[sector.index()].count
    }

    /// Number of samples that landed in a sector
    #[must_use]
    pub fn total(&self) -> u32 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

impl Default for WindRose {
    fn default() -> Self {
        Self::empty()
    }
}

/// The up-to-[`ROSE_WINDOW`] samples ending at `end` (inclusive).
///
/// `end` past the slice is clamped to the last element.
#[must_use]
pub fn trailing_window(values: &[Option<f64>], end: usize) -> &[Option<f64>] {
    let stop = end.saturating_add(1).min(values.len());
    let start = stop.saturating_sub(ROSE_WINDOW);
    &values[start..stop]
}
