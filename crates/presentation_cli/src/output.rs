//! Human-readable rendering of command results

use std::fmt::Write as _;

use application::BatchSummary;
use domain::{HistoricalRecord, WeatherSnapshot};

fn value(v: Option<f64>, unit: &str) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}{unit}"))
}

/// Multi-line summary of a batch run
#[must_use]
pub fn render_summary(summary: &BatchSummary) -> String {
    let elapsed = (summary.finished_at - summary.started_at).num_milliseconds();
    let mut out = format!(
        "Regions: {} total, {} saved, {} skipped, {} failed ({elapsed} ms)\n\
         History rows: {} inserted, {} already stored\n",
        summary.total,
        summary.processed,
        summary.skipped,
        summary.failed,
        summary.history_inserted,
        summary.history_ignored,
    );

    if !summary.skipped_codes.is_empty() {
        let _ = writeln!(out, "Skipped (no coordinates): {}", summary.skipped_codes.join(", "));
    }
    for failure in &summary.failures {
        let _ = writeln!(out, "  ✗ {} [{}] {}", failure.code, failure.kind, failure.message);
    }
    out
}

/// One-line view of a stored snapshot
#[must_use]
pub fn render_snapshot(code: &str, snapshot: &WeatherSnapshot) -> String {
    let v = &snapshot.values;
    format!(
        "{code} @ {} ({}): {} {} {} wind {} from {} cloud {} precip {}",
        snapshot.snapshot_time.to_rfc3339(),
        snapshot.source,
        value(v.temperature_c, "°C"),
        value(v.humidity_percent, "%"),
        value(v.pressure_hpa, " hPa"),
        value(v.wind_speed_ms, " m/s"),
        value(v.wind_direction_deg, "°"),
        value(v.cloud_cover_percent, "%"),
        value(v.precipitation_mm, " mm"),
    )
}

/// History rows, one per line
#[must_use]
pub fn render_history(records: &[HistoricalRecord]) -> String {
    records.iter().fold(String::new(), |mut out, record| {
        let v = &record.values;
        let _ = writeln!(
            out,
            "{}  {:>8} {:>6} {:>10}",
            record.forecast_time.to_rfc3339(),
            value(v.temperature_c, "°C"),
            value(v.humidity_percent, "%"),
            value(v.wind_speed_ms, " m/s"),
        );
        out
    })
}

#[cfg(test)]
mod tests {
    use application::RegionFailure;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn summary() -> BatchSummary {
        let started_at = Utc.with_ymd_and_hms(2024, 5, 1, 5, 0, 0).unwrap();
        BatchSummary {
            started_at,
            finished_at: started_at + chrono::Duration::milliseconds(1500),
            total: 3,
            processed: 1,
            skipped: 1,
            failed: 1,
            history_inserted: 24,
            history_ignored: 0,
            failures: vec![RegionFailure {
                code: "79".to_string(),
                kind: "transport".to_string(),
                message: "HTTP 500".to_string(),
            }],
            skipped_codes: vec!["island".to_string()],
        }
    }

    #[test]
    fn summary_lists_counts_skips_and_failures() {
        let text = render_summary(&summary());

        assert!(text.contains("3 total, 1 saved, 1 skipped, 1 failed (1500 ms)"));
        assert!(text.contains("24 inserted"));
        assert!(text.contains("Skipped (no coordinates): island"));
        assert!(text.contains("79 [transport] HTTP 500"));
    }

    #[test]
    fn clean_summary_has_no_failure_lines() {
        let mut clean = summary();
        clean.failed = 0;
        clean.failures.clear();
        clean.skipped_codes.clear();

        let text = render_summary(&clean);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(value(None, "°C"), "-");
        assert_eq!(value(Some(31.04), "°C"), "31.0°C");
    }
}
