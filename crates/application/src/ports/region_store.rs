//! Region storage port

use async_trait::async_trait;
use domain::{Region, RegionDraft};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for region persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegionStore: Send + Sync {
    /// All tracked regions, ordered by id
    async fn list_regions(&self) -> Result<Vec<Region>, ApplicationError>;

    /// Region by its stable code
    async fn find_by_code(&self, code: &str) -> Result<Option<Region>, ApplicationError>;

    /// Insert or update a region keyed by code, returning the stored row
    async fn upsert_region(&self, draft: &RegionDraft) -> Result<Region, ApplicationError>;
}
