use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use crate::config::{DRAW_CACHE_VERSION, SOCRATA};
use crate::data::draws::CreateDrawData;
use crate::data::draws::api_version::API_SIGNATURE;
use crate::data::draws::cache_file::CacheFile;
use crate::models::DrawHistory;
use crate::utils::time_utils::how_many_seconds_ago;

pub const CACHE_SIGNATURE: &str = "Local Cache";

pub fn check_local_data_validity(
    recency_required_secs: i64,
    version_required: f64,
    dataset_id: &str,
) -> Result<()> {
    let full_path = CacheFile::default_cache_path(dataset_id);
    let cache = CacheFile::load_from_path(&full_path)?;

    // Check version
    if cache.version != version_required {
        bail!(
            "Cache version mismatch: file v{} vs required v{}",
            cache.version,
            version_required
        );
    }

    // Check it is the same dataset
    if cache.dataset_id != dataset_id {
        bail!(
            "Cache dataset mismatch: file has {}, expected {}",
            cache.dataset_id,
            dataset_id
        );
    }

    // Check recency
    let seconds_ago = how_many_seconds_ago(cache.timestamp_ms);
    if seconds_ago > recency_required_secs {
        bail!(
            "Cache too old: created {} seconds ago (limit: {} seconds)",
            seconds_ago,
            recency_required_secs
        );
    }

    Ok(())
}

/// Write the draw table to the binary cache file. Only API-sourced data is
/// written back; re-saving a cache read would only refresh its timestamp
/// and mask staleness.
pub fn write_draw_data_locally(
    signature: &'static str,
    history: &DrawHistory,
    dataset_id: &str,
) -> Result<()> {
    if signature != API_SIGNATURE {
        log::info!("Skipping cache write (data not freshly fetched)");
        return Ok(());
    }

    let full_path = CacheFile::default_cache_path(dataset_id);
    let cache = CacheFile::new(dataset_id, history.clone(), DRAW_CACHE_VERSION);
    cache.save_to_path(&full_path)?;
    log::info!("Cache written: {:?} ({} draws)", full_path, history.len());
    Ok(())
}

/// Async wrapper for write_draw_data_locally
pub async fn write_draw_data_async(
    signature: &'static str,
    history: DrawHistory,
    dataset_id: String,
) -> Result<()> {
    tokio::task::spawn_blocking(move || write_draw_data_locally(signature, &history, &dataset_id))
        .await
        .context("Cache write task panicked")?
}

pub struct CacheVersion;

#[async_trait]
impl CreateDrawData for CacheVersion {
    fn signature(&self) -> &'static str {
        CACHE_SIGNATURE
    }

    async fn create_draw_data(&self) -> Result<DrawHistory> {
        let full_path = CacheFile::default_cache_path(SOCRATA.dataset.dataset_id);

        let cache = tokio::task::spawn_blocking(move || CacheFile::load_from_path(&full_path))
            .await
            .context("Cache read task panicked")?
            .context("Failed to load cache file")?;

        log::info!("Cache loaded: {} draws", cache.data.len());
        Ok(cache.data)
    }
}
