//! Forecast series and the algorithms that reconcile them against "now"

mod aligner;
mod current;
mod grid;
mod partition;
mod sample_time;
mod wind_rose;

pub use aligner::{AlignedSample, Alignment, align_latest, locate};
pub use current::{CurrentReading, ReadingOrigin};
pub use grid::{CurrentConditions, DailySeries, HourlySeries};
pub use partition::{
    DAILY_WINDOW, DailyPoint, DailyWindows, PrecipitationDay, TemperatureRange, partition_daily,
};
pub use sample_time::{DayStamp, SampleTime};
pub use wind_rose::{ROSE_WINDOW, WindRose, WindRoseBucket, trailing_window};
