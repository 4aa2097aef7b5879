use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{DRAW_CACHE_DIR, draw_cache_filename};
use crate::models::DrawHistory;

/// Serialized cache wrapper for fetched draw data.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheFile {
    pub version: f64,
    pub timestamp_ms: i64,
    pub dataset_id: String,
    pub data: DrawHistory,
}

impl CacheFile {
    pub fn new(dataset_id: &str, data: DrawHistory, version: f64) -> Self {
        Self {
            version,
            timestamp_ms: Utc::now().timestamp_millis(),
            dataset_id: dataset_id.to_string(),
            data,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open cache file: {:?}", path))?;
        let mut reader = BufReader::new(file);
        let cache = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize cache: {:?}", path))?;
        Ok(cache)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .context(format!("Failed to serialize cache to: {}", path.display()))
    }

    pub fn default_cache_path(dataset_id: &str) -> PathBuf {
        PathBuf::from(DRAW_CACHE_DIR).join(draw_cache_filename(dataset_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DRAW_CACHE_VERSION;
    use crate::domain::{Combo, DrawRow, Session};
    use chrono::NaiveDate;

    #[test]
    fn test_cache_file_round_trip() {
        let rows = vec![DrawRow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Session::Evening,
            Combo::parse("0042").unwrap(),
        )];
        let cache = CacheFile::new(
            "test-id",
            DrawHistory::new("test", DRAW_CACHE_VERSION, rows),
            DRAW_CACHE_VERSION,
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draws.bin");
        cache.save_to_path(&path).unwrap();

        let loaded = CacheFile::load_from_path(&path).unwrap();
        assert_eq!(loaded.version, DRAW_CACHE_VERSION);
        assert_eq!(loaded.dataset_id, "test-id");
        assert_eq!(loaded.data.len(), 1);
        assert_eq!(loaded.data.rows[0].combo.to_string(), "0042");
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CacheFile::load_from_path(&dir.path().join("absent.bin")).is_err());
    }
}
