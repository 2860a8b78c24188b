//! Provider timestamps with an explicit offset
//!
//! The provider reports hourly times as offset-less local wall-clock strings
//! plus the zone they are local to. Every timestamp is resolved to an
//! explicit offset before it is compared to anything. A string that
//! does not parse is kept with its raw text so the series stays index-aligned.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One entry of an hourly `time` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleTime {
    raw: String,
    instant: Option<DateTime<FixedOffset>>,
}

impl SampleTime {
    /// Parse a provider timestamp.
    ///
    /// Strings carrying their own RFC 3339 offset keep it; local strings get
    /// `offset` attached. Anything else yields an unparsed entry.
    pub fn parse(raw: impl Into<String>, offset: FixedOffset) -> Self {
        Self::parse_in(raw, &offset)
    }

    /// Parse a provider timestamp, resolving local strings in `zone`.
    ///
    /// Each local time gets the offset `zone` has at that instant, so hours on
    /// both sides of a DST change map to their true UTC instant. A repeated
    /// wall-clock hour resolves to its earlier instant; a skipped one stays
    /// unparsed.
    pub fn parse_in<Z: TimeZone>(raw: impl Into<String>, zone: &Z) -> Self {
        let raw = raw.into();
        let instant = parse_instant(&raw, zone);
        Self { raw, instant }
    }

    /// Wrap an already-known instant
    #[must_use]
    pub fn from_instant(instant: DateTime<FixedOffset>) -> Self {
        Self {
            raw: instant.format("%Y-%m-%dT%H:%M").to_string(),
            instant: Some(instant),
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn instant(&self) -> Option<DateTime<FixedOffset>> {
        self.instant
    }

    /// The instant in UTC, if the timestamp parsed
    #[must_use]
    pub fn utc(&self) -> Option<DateTime<Utc>> {
        self.instant.map(|i| i.with_timezone(&Utc))
    }

    /// Calendar date in the timestamp's own offset
    #[must_use]
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.instant.map(|i| i.date_naive())
    }

    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        self.instant.is_some()
    }
}

fn parse_instant<Z: TimeZone>(raw: &str, zone: &Z) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt);
    }
    LOCAL_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(trimmed, fmt)
            .ok()
            .and_then(|naive| zone.from_local_datetime(&naive).earliest())
            .map(|dt| dt.fixed_offset())
    })
}

impl fmt::Display for SampleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for SampleTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// One entry of a daily `time` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStamp {
    raw: String,
    date: Option<NaiveDate>,
}

impl DayStamp {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok();
        Self { raw, date }
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            raw: date.format(DATE_FORMAT).to_string(),
            date: Some(date),
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl fmt::Display for DayStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
