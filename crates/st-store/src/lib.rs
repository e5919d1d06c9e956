//! Storage layer for daily activity totals.
//!
//! The per-day mapping is persisted as a single JSON document
//! (`{"YYYY-MM-DD": seconds}`), loaded wholesale at startup and rewritten
//! wholesale after each mutation batch. There is no incremental update
//! protocol; last writer wins. A missing file is the expected first-run
//! state, not an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use st_core::DayTotals;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("stats store I/O error: {0}")]
    Io(#[from] io::Error),
    /// The stored document is not a valid day-totals mapping.
    #[error("stats store content is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed stats store.
#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    /// Binds a store to its file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the whole mapping. A missing or empty file yields an empty
    /// mapping; malformed content is an error so the caller can decide to
    /// start fresh while keeping the broken file on disk for diagnosis.
    pub fn load(&self) -> Result<DayTotals, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(DayTotals::new());
            }
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(DayTotals::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Re-serializes and writes the entire mapping.
    ///
    /// Writes to a sibling temp file first and renames into place so a
    /// crash mid-write cannot truncate the previous document.
    pub fn save(&self, totals: &DayTotals) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string(totals)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = ?self.path, days = totals.len(), "persisted daily totals");
        Ok(())
    }
}
