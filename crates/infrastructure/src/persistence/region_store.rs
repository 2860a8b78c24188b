//! Region store using sqlx

use application::{error::ApplicationError, ports::RegionStore};
use async_trait::async_trait;
use chrono::Utc;
use domain::{Region, RegionDraft, RegionId};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::{format_datetime, map_sqlx_error};

/// SQLite implementation of `RegionStore`
#[derive(Debug, Clone)]
pub struct SqliteRegionStore {
    pool: SqlitePool,
}

impl SqliteRegionStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RegionRow {
    id: i64,
    code: String,
    name: String,
    level: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<RegionRow> for Region {
    fn from(row: RegionRow) -> Self {
        Self {
            id: RegionId::new(row.id),
            code: row.code,
            name: row.name,
            level: row.level,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[async_trait]
impl RegionStore for SqliteRegionStore {
    #[instrument(skip(self))]
    async fn list_regions(&self) -> Result<Vec<Region>, ApplicationError> {
        let rows: Vec<RegionRow> = sqlx::query_as(
            r"
            SELECT id, code, name, level, latitude, longitude
            FROM regions
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(count = rows.len(), "Listed regions");
        Ok(rows.into_iter().map(Region::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &str) -> Result<Option<Region>, ApplicationError> {
        let row: Option<RegionRow> = sqlx::query_as(
            r"
            SELECT id, code, name, level, latitude, longitude
            FROM regions
            WHERE code = $1
            ",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Region::from))
    }

    #[instrument(skip(self, draft), fields(code = %draft.code))]
    async fn upsert_region(&self, draft: &RegionDraft) -> Result<Region, ApplicationError> {
        draft.validate()?;
        let now = format_datetime(&Utc::now());

        let row: RegionRow = sqlx::query_as(
            r"
            INSERT INTO regions (code, name, level, latitude, longitude, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT(code) DO UPDATE SET
                name = excluded.name,
                level = excluded.level,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                updated_at = excluded.updated_at
            RETURNING id, code, name, level, latitude, longitude
            ",
        )
        .bind(&draft.code)
        .bind(&draft.name)
        .bind(&draft.level)
        .bind(draft.latitude)
        .bind(draft.longitude)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(region_id = row.id, "Region upserted");
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::AsyncDatabase;

    async fn store() -> SqliteRegionStore {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        SqliteRegionStore::new(db.pool().clone())
    }

    fn draft(code: &str, coords: Option<(f64, f64)>) -> RegionDraft {
        RegionDraft {
            code: code.to_string(),
            name: format!("Region {code}"),
            level: Some("province".to_string()),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
        }
    }

    #[tokio::test]
    async fn upsert_then_find() {
        let store = store().await;
        let saved = store
            .upsert_region(&draft("79", Some((10.8, 106.6))))
            .await
            .unwrap();

        let found = store.find_by_code("79").await.unwrap().unwrap();
        assert_eq!(found, saved);
        assert_eq!(found.latitude, Some(10.8));
        assert_eq!(found.level.as_deref(), Some("province"));
    }

    #[tokio::test]
    async fn upsert_updates_in_place() {
        let store = store().await;
        let first = store.upsert_region(&draft("01", None)).await.unwrap();

        let mut changed = draft("01", Some((21.0, 105.8)));
        changed.name = "Ha Noi".to_string();
        let second = store.upsert_region(&changed).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Ha Noi");
        assert_eq!(second.longitude, Some(105.8));
        assert_eq!(store.list_regions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = store().await;
        for code in ["b", "a", "c"] {
            store.upsert_region(&draft(code, None)).await.unwrap();
        }

        let codes: Vec<String> = store
            .list_regions()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.code)
            .collect();
        assert_eq!(codes, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn unknown_code_is_none() {
        let store = store().await;
        assert!(store.find_by_code("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_write() {
        let store = store().await;
        let err = store
            .upsert_region(&draft("x", Some((95.0, 0.0))))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Domain(_)));
        assert!(store.list_regions().await.unwrap().is_empty());
    }
}
