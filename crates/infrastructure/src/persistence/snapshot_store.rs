//! Snapshot and hourly history store using sqlx
//!
//! `commit` is the only write path: the region's snapshot upsert and all of
//! its history inserts share one transaction, so a failed run leaves the
//! previous state untouched.

use application::{
    error::ApplicationError,
    ports::{CommitOutcome, SnapshotStore},
};
use async_trait::async_trait;
use domain::{HistoricalRecord, ObservationValues, RegionId, WeatherSnapshot};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::{format_datetime, map_sqlx_error, parse_datetime};

/// SQLite implementation of `SnapshotStore`
#[derive(Debug, Clone)]
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

impl SqliteSnapshotStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SnapshotRow {
    region_id: i64,
    temp_c: Option<f64>,
    humidity_percent: Option<f64>,
    pressure_hpa: Option<f64>,
    wind_speed_ms: Option<f64>,
    wind_dir_deg: Option<f64>,
    cloud_cover_percent: Option<f64>,
    precip_mm: Option<f64>,
    snapshot_time: String,
    source: String,
    created_at: String,
    updated_at: String,
}

impl SnapshotRow {
    fn into_snapshot(self) -> Result<WeatherSnapshot, ApplicationError> {
        Ok(WeatherSnapshot {
            region_id: RegionId::new(self.region_id),
            snapshot_time: parse_datetime(&self.snapshot_time)?,
            values: ObservationValues {
                temperature_c: self.temp_c,
                humidity_percent: self.humidity_percent,
                pressure_hpa: self.pressure_hpa,
                wind_speed_ms: self.wind_speed_ms,
                wind_direction_deg: self.wind_dir_deg,
                cloud_cover_percent: self.cloud_cover_percent,
                precipitation_mm: self.precip_mm,
            },
            source: self.source,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    region_id: i64,
    forecast_time: String,
    temp_c: Option<f64>,
    humidity_percent: Option<f64>,
    pressure_hpa: Option<f64>,
    wind_speed_ms: Option<f64>,
    wind_dir_deg: Option<f64>,
    cloud_cover_percent: Option<f64>,
    precip_mm: Option<f64>,
    created_at: String,
}

impl HistoryRow {
    fn into_record(self) -> Result<HistoricalRecord, ApplicationError> {
        Ok(HistoricalRecord {
            region_id: RegionId::new(self.region_id),
            forecast_time: parse_datetime(&self.forecast_time)?,
            values: ObservationValues {
                temperature_c: self.temp_c,
                humidity_percent: self.humidity_percent,
                pressure_hpa: self.pressure_hpa,
                wind_speed_ms: self.wind_speed_ms,
                wind_direction_deg: self.wind_dir_deg,
                cloud_cover_percent: self.cloud_cover_percent,
                precipitation_mm: self.precip_mm,
            },
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    #[instrument(
        skip(self, snapshot, history),
        fields(region_id = %snapshot.region_id, rows = history.len())
    )]
    async fn commit(
        &self,
        snapshot: &WeatherSnapshot,
        history: &[HistoricalRecord],
    ) -> Result<CommitOutcome, ApplicationError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let values = &snapshot.values;

        sqlx::query(
            r"
            INSERT INTO region_weather_snapshots (
                region_id, temp_c, humidity_percent, pressure_hpa, wind_speed_ms,
                wind_dir_deg, cloud_cover_percent, precip_mm, snapshot_time, source,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT(region_id) DO UPDATE SET
                temp_c = excluded.temp_c,
                humidity_percent = excluded.humidity_percent,
                pressure_hpa = excluded.pressure_hpa,
                wind_speed_ms = excluded.wind_speed_ms,
                wind_dir_deg = excluded.wind_dir_deg,
                cloud_cover_percent = excluded.cloud_cover_percent,
                precip_mm = excluded.precip_mm,
                snapshot_time = excluded.snapshot_time,
                source = excluded.source,
                updated_at = excluded.updated_at
            ",
        )
        .bind(snapshot.region_id.as_i64())
        .bind(values.temperature_c)
        .bind(values.humidity_percent)
        .bind(values.pressure_hpa)
        .bind(values.wind_speed_ms)
        .bind(values.wind_direction_deg)
        .bind(values.cloud_cover_percent)
        .bind(values.precipitation_mm)
        .bind(format_datetime(&snapshot.snapshot_time))
        .bind(&snapshot.source)
        .bind(format_datetime(&snapshot.created_at))
        .bind(format_datetime(&snapshot.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let mut outcome = CommitOutcome::default();
        for record in history {
            let values = &record.values;
            let result = sqlx::query(
                r"
                INSERT INTO weather_forecast_hourly (
                    region_id, forecast_time, temp_c, humidity_percent, pressure_hpa,
                    wind_speed_ms, wind_dir_deg, cloud_cover_percent, precip_mm, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT(region_id, forecast_time) DO NOTHING
                ",
            )
            .bind(record.region_id.as_i64())
            .bind(format_datetime(&record.forecast_time))
            .bind(values.temperature_c)
            .bind(values.humidity_percent)
            .bind(values.pressure_hpa)
            .bind(values.wind_speed_ms)
            .bind(values.wind_direction_deg)
            .bind(values.cloud_cover_percent)
            .bind(values.precipitation_mm)
            .bind(format_datetime(&record.created_at))
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

            if result.rows_affected() == 0 {
                outcome.history_ignored += 1;
            } else {
                outcome.history_inserted += 1;
            }
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(
            inserted = outcome.history_inserted,
            ignored = outcome.history_ignored,
            "Snapshot committed"
        );
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn get_snapshot(
        &self,
        region_id: RegionId,
    ) -> Result<Option<WeatherSnapshot>, ApplicationError> {
        let row: Option<SnapshotRow> = sqlx::query_as(
            r"
            SELECT region_id, temp_c, humidity_percent, pressure_hpa, wind_speed_ms,
                   wind_dir_deg, cloud_cover_percent, precip_mm, snapshot_time, source,
                   created_at, updated_at
            FROM region_weather_snapshots
            WHERE region_id = $1
            ",
        )
        .bind(region_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(SnapshotRow::into_snapshot).transpose()
    }

    #[instrument(skip(self))]
    async fn recent_history(
        &self,
        region_id: RegionId,
        limit: u32,
    ) -> Result<Vec<HistoricalRecord>, ApplicationError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r"
            SELECT region_id, forecast_time, temp_c, humidity_percent, pressure_hpa,
                   wind_speed_ms, wind_dir_deg, cloud_cover_percent, precip_mm, created_at
            FROM weather_forecast_hourly
            WHERE region_id = $1
            ORDER BY forecast_time DESC
            LIMIT $2
            ",
        )
        .bind(region_id.as_i64())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(HistoryRow::into_record).collect()
    }

    #[instrument(skip(self))]
    async fn count_history(&self, region_id: RegionId) -> Result<u64, ApplicationError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM weather_forecast_hourly WHERE region_id = $1")
                .bind(region_id.as_i64())
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        u64::try_from(count)
            .map_err(|e| ApplicationError::Persistence(format!("Invalid history count: {e}")))
    }
}
