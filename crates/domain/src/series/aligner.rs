//! Latest-sample-at-or-before-reference lookup over a time axis

use chrono::{DateTime, Utc};

use super::sample_time::SampleTime;

/// Index chosen by [`locate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub index: usize,
    /// No parsed timestamp was at or before the reference; `index` is the
    /// last element and may be future-dated.
    pub is_fallback: bool,
}

/// Value picked by [`align_latest`]
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSample {
    pub index: usize,
    pub time: SampleTime,
    pub value: f64,
    pub is_fallback: bool,
}

/// Find the greatest timestamp that is not after `reference`.
///
/// The axis is scanned from the end; unparsed timestamps are skipped. When
/// nothing qualifies the last index is returned flagged as a fallback.
/// Returns `None` only for an empty axis.
#[must_use]
pub fn locate(times: &[SampleTime], reference: DateTime<Utc>) -> Option<Alignment> {
    let last = times.len().checked_sub(1)?;
    let found = times
        .iter()
        .enumerate()
        .rev()
        .find(|(_, t)| t.utc().is_some_and(|instant| instant <= reference))
        .map(|(index, _)| index);

    Some(found.map_or(
        Alignment {
            index: last,
            is_fallback: true,
        },
        |index| Alignment {
            index,
            is_fallback: false,
        },
    ))
}

/// Pick the current value of a parallel `(times, values)` pair.
///
/// Unavailable (`None`) when the axis is empty or when `values` has no
/// non-null entry at the chosen index.
#[must_use]
pub fn align_latest(
    times: &[SampleTime],
    values: &[Option<f64>],
    reference: DateTime<Utc>,
) -> Option<AlignedSample> {
    let alignment = locate(times, reference)?;
    let value = values.get(alignment.index).copied().flatten()?;
    Some(AlignedSample {
        index: alignment.index,
        time: times[alignment.index].clone(),
        value,
        is_fallback: alignment.is_fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn at(offset_hours: i64) -> SampleTime {
        let utc = FixedOffset::east_opt(0).unwrap();
        SampleTime::from_instant((reference() + Duration::hours(offset_hours)).with_timezone(&utc))
    }

    #[test]
    fn picks_latest_not_after_reference() {
        let times = vec![at(-2), at(-1), at(1)];
        let values = vec![Some(1.0), Some(2.0), Some(3.0)];
        let sample = align_latest(&times, &values, reference()).unwrap();
        assert_eq!(sample.index, 1);
        assert_eq!(sample.time, at(-1));
        assert!((sample.value - 2.0).abs() < f64::EPSILON);
        assert!(!sample.is_fallback);
    }

    #[test]
    fn exact_match_counts_as_not_after() {
        let times = vec![at(-1), at(0), at(1)];
        let alignment = locate(&times, reference()).unwrap();
        assert_eq!(alignment.index, 1);
        assert!(!alignment.is_fallback);
    }

    #[test]
    fn all_future_falls_back_to_last() {
        let times = vec![at(1), at(2)];
        let values = vec![Some(5.0), Some(6.0)];
        let sample = align_latest(&times, &values, reference()).unwrap();
        assert_eq!(sample.index, 1);
        assert_eq!(sample.time, at(2));
        assert!(sample.is_fallback);
    }

    #[test]
    fn unparsed_timestamps_are_skipped() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let times = vec![at(-3), SampleTime::parse("garbage", utc), at(2)];
        let alignment = locate(&times, reference()).unwrap();
        assert_eq!(alignment.index, 0);
    }

    #[test]
    fn all_unparsed_falls_back_to_last() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let times = vec![SampleTime::parse("a", utc), SampleTime::parse("b", utc)];
        let alignment = locate(&times, reference()).unwrap();
        assert_eq!(alignment.index, 1);
        assert!(alignment.is_fallback);
    }

    #[test]
    fn empty_axis_is_unavailable() {
        assert!(locate(&[], reference()).is_none());
        assert!(align_latest(&[], &[], reference()).is_none());
    }

    #[test]
    fn short_value_column_is_unavailable() {
        let times = vec![at(-2), at(-1)];
        let values = vec![Some(1.0)];
        assert!(align_latest(&times, &values, reference()).is_none());
    }

    #[test]
    fn null_value_at_index_is_unavailable() {
        let times = vec![at(-2), at(-1)];
        let values = vec![Some(1.0), None];
        assert!(align_latest(&times, &values, reference()).is_none());
    }

    #[test]
    fn comparison_respects_offsets() {
        // 18:30 at +07:00 is 11:30 UTC, before the 12:00 UTC reference
        let ict = FixedOffset::east_opt(7 * 3600).unwrap();
        let times = vec![
            SampleTime::parse("2024-05-01T18:30", ict),
            SampleTime::parse("2024-05-01T19:30", ict),
        ];
        let alignment = locate(&times, reference()).unwrap();
        assert_eq!(alignment.index, 0);
        assert!(!alignment.is_fallback);
    }
}
