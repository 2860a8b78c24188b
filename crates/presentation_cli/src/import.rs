//! Region import from a JSON file

use std::path::Path;

use anyhow::{Context as _, bail};
use application::RegionStore;
use domain::{Region, RegionDraft};
use tracing::{debug, info};

/// Read a JSON array of regions and validate every entry.
///
/// The whole file is rejected on the first invalid entry so an import never
/// half-applies a broken file.
pub fn read_drafts(path: &Path) -> anyhow::Result<Vec<RegionDraft>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let drafts: Vec<RegionDraft> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of regions", path.display()))?;

    for (index, draft) in drafts.iter().enumerate() {
        draft
            .validate()
            .with_context(|| format!("Entry {index} ({}) is invalid", draft.code))?;
    }

    let mut codes: Vec<&str> = drafts.iter().map(|d| d.code.as_str()).collect();
    codes.sort_unstable();
    if let Some(pair) = codes.windows(2).find(|pair| pair[0] == pair[1]) {
        bail!("Region code {} appears more than once", pair[0]);
    }

    debug!(count = drafts.len(), path = %path.display(), "Parsed region file");
    Ok(drafts)
}

/// Upsert every draft, returning the stored regions in file order
pub async fn import_regions(
    store: &dyn RegionStore,
    drafts: &[RegionDraft],
) -> anyhow::Result<Vec<Region>> {
    let mut stored = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let region = store
            .upsert_region(draft)
            .await
            .with_context(|| format!("Failed to store region {}", draft.code))?;
        stored.push(region);
    }
    info!(count = stored.len(), "Regions imported");
    Ok(stored)
}
