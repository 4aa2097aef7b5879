use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::matching::{MatchReport, check_combo};
use crate::config::WATCHLIST_PATH;
use crate::domain::{Combo, DrawRow};

/// One persisted watchlist record. Only the combo and when it was added are
/// stored; hit statistics are recomputed against the current draw table so
/// they can never go stale relative to refreshed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub combo: Combo,
    pub added_at: DateTime<Utc>,
}

impl WatchlistEntry {
    pub fn new(combo: Combo) -> Self {
        WatchlistEntry {
            combo,
            added_at: Utc::now(),
        }
    }
}

/// One display row: the persisted entry plus freshly derived statistics.
#[derive(Debug, Clone)]
pub struct WatchlistRow {
    pub entry: WatchlistEntry,
    pub report: MatchReport,
}

/// Derive per-combo statistics for every entry against the given draws.
pub fn watchlist_stats(entries: &[WatchlistEntry], rows: &[DrawRow]) -> Vec<WatchlistRow> {
    entries
        .iter()
        .map(|entry| WatchlistRow {
            entry: entry.clone(),
            report: check_combo(entry.combo, rows),
        })
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

/// Watchlist persistence over a flat human-readable JSON file.
/// Entries are keyed by combo; adding a duplicate is a no-op, not an error.
pub struct WatchlistStore {
    path: PathBuf,
}

impl WatchlistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        WatchlistStore { path: path.into() }
    }

    pub fn at_default_path() -> Self {
        Self::new(WATCHLIST_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty watchlist, not an error.
    pub fn load(&self) -> Result<Vec<WatchlistEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .context(format!("Failed to read watchlist: {}", self.path.display()))?;
        serde_json::from_str(&text)
            .context(format!("Failed to parse watchlist: {}", self.path.display()))
    }

    pub fn save(&self, entries: &[WatchlistEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, text)
            .context(format!("Failed to write watchlist: {}", self.path.display()))
    }

    /// Returns whether the combo was newly added.
    pub fn add(&self, combo: Combo) -> Result<bool> {
        let mut entries = self.load()?;
        if entries.iter().any(|e| e.combo == combo) {
            return Ok(false);
        }
        entries.push(WatchlistEntry::new(combo));
        self.save(&entries)?;
        Ok(true)
    }

    /// Returns whether the combo was present.
    pub fn remove(&self, combo: Combo) -> Result<bool> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.combo != combo);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    /// Merge combos from CSV text into the stored watchlist. Malformed rows
    /// are skipped and counted; valid rows still land (partial success).
    pub fn import_csv(&self, text: &str) -> Result<ImportReport> {
        let (combos, invalid) = parse_watchlist_csv(text)?;
        let mut entries = self.load()?;
        let mut report = ImportReport {
            invalid,
            ..ImportReport::default()
        };

        for combo in combos {
            if entries.iter().any(|e| e.combo == combo) {
                report.duplicates += 1;
            } else {
                entries.push(WatchlistEntry::new(combo));
                report.added += 1;
            }
        }

        self.save(&entries)?;
        Ok(report)
    }
}

/// Parse watchlist CSV text. The header must contain a column literally
/// named `win4`; values of 1-4 digits are zero-padded like raw API values.
/// Returns the parsed combos in file order plus the count of skipped rows.
pub fn parse_watchlist_csv(text: &str) -> Result<(Vec<Combo>, usize)> {
    let mut lines = text.lines();
    let Some(header) = lines.next() else {
        bail!("CSV input is empty");
    };
    let Some(win4_index) = header.split(',').map(str::trim).position(|c| c == "win4") else {
        bail!("CSV is missing a win4 column");
    };

    let mut combos = Vec::new();
    let mut invalid = 0usize;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match line.split(',').nth(win4_index).map(str::trim) {
            Some(value) if !value.is_empty() => match Combo::from_raw(value) {
                Ok(combo) => combos.push(combo),
                Err(e) => {
                    log::warn!("Skipping watchlist row {:?}: {:#}", line, e);
                    invalid += 1;
                }
            },
            _ => invalid += 1,
        }
    }
    Ok((combos, invalid))
}

/// CSV export with derived statistics, columns
/// `win4,straight_hits,box_hits,last_seen`.
pub fn export_csv(rows: &[WatchlistRow]) -> String {
    let mut out = String::from("win4,straight_hits,box_hits,last_seen\n");
    for row in rows {
        let last_seen = row
            .report
            .last_seen_straight
            .map(|d| d.to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{}\n",
            row.entry.combo, row.report.straight_hits, row.report.box_hits, last_seen
        ));
    }
    out
}
