//! Durable chapter record persistence.
//!
//! The record is a small JSON file:
//! `{ "start_time": "YYYY-MM-DD HH:MM:SS" | null,
//!    "chapters": [["YYYY-MM-DD HH:MM:SS", "label"], ...] }`
//! with all timestamps in UTC at seconds precision.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{time, ChapterEntry};

/// Errors from durable record operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the record file failed.
    #[error("Failed to access chapter record: {0}")]
    Io(#[from] io::Error),

    /// The record file is not valid JSON of the expected shape.
    #[error("Malformed chapter record: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The record decoded but carries an unparseable timestamp.
    #[error("Malformed timestamp in chapter record: {0:?}")]
    BadTimestamp(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// On-disk shape of the chapter record.
#[derive(Debug, Serialize, Deserialize)]
struct LogRecord {
    /// Start time in stored form, if set.
    start_time: Option<String>,
    /// (timestamp, label) pairs in insertion order.
    chapters: Vec<(String, String)>,
}

/// State restored from a durable record.
#[derive(Debug, Default)]
pub struct RestoredLog {
    /// Restored start time.
    pub start_time: Option<DateTime<Utc>>,
    /// Restored entries, in insertion order.
    pub entries: Vec<ChapterEntry>,
}

/// File-backed store for the chapter record.
///
/// An empty path makes the store in-memory only: `save`, `load`, and
/// `delete` become no-ops (used by tests and hosts without persistence).
#[derive(Debug, Clone)]
pub struct LogStore {
    /// Path to the record file; empty for in-memory stores.
    record_file: PathBuf,
}

impl LogStore {
    /// Create a store backed by the given record file.
    pub fn new(record_file: impl Into<PathBuf>) -> Self {
        Self {
            record_file: record_file.into(),
        }
    }

    /// Create a store without persistence.
    pub fn in_memory() -> Self {
        Self {
            record_file: PathBuf::new(),
        }
    }

    /// Path to the record file (empty for in-memory stores).
    pub fn path(&self) -> &Path {
        &self.record_file
    }

    /// Whether this store persists anything.
    pub fn is_persistent(&self) -> bool {
        !self.record_file.as_os_str().is_empty()
    }

    /// Persist the log state, overwriting any prior record.
    ///
    /// Writes to a temp sibling first, then renames, so readers never
    /// observe a partial record.
    pub fn save(
        &self,
        start_time: Option<DateTime<Utc>>,
        entries: &[ChapterEntry],
    ) -> StoreResult<()> {
        if !self.is_persistent() {
            return Ok(());
        }

        let record = LogRecord {
            start_time: start_time.map(time::format_stored),
            chapters: entries
                .iter()
                .map(|e| (time::format_stored(e.timestamp), e.label.clone()))
                .collect(),
        };
        let json = serde_json::to_string(&record)?;

        if let Some(parent) = self.record_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_file = self.record_file.with_extension("json.tmp");
        fs::write(&temp_file, &json)?;
        fs::rename(&temp_file, &self.record_file)?;

        tracing::debug!("Saved {} chapters to {:?}", record.chapters.len(), self.record_file);
        Ok(())
    }

    /// Load the record, if one exists.
    ///
    /// Returns `Ok(None)` when there is nothing to load (in-memory store
    /// or no record file) — the normal cold-start case.
    pub fn load(&self) -> StoreResult<Option<RestoredLog>> {
        if !self.is_persistent() || !self.record_file.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.record_file)?;
        let record: LogRecord = serde_json::from_str(&content)?;

        let start_time = match record.start_time {
            Some(raw) => Some(parse_record_timestamp(&raw)?),
            None => None,
        };
        let entries = record
            .chapters
            .into_iter()
            .map(|(raw, label)| {
                Ok(ChapterEntry::new(parse_record_timestamp(&raw)?, label))
            })
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Some(RestoredLog {
            start_time,
            entries,
        }))
    }

    /// Delete the record file. Missing file is not an error.
    pub fn delete(&self) -> StoreResult<()> {
        if self.is_persistent() && self.record_file.exists() {
            fs::remove_file(&self.record_file)?;
            tracing::info!("Removed chapter record {:?}", self.record_file);
        }
        Ok(())
    }
}

/// Parse a stored-form timestamp, mapping failure to `BadTimestamp`.
fn parse_record_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    time::parse_stored(raw).ok_or_else(|| StoreError::BadTimestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn sample_entries() -> Vec<ChapterEntry> {
        vec![
            ChapterEntry::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 30).unwrap(),
                "Heat 1 (Round 1)",
            ),
            ChapterEntry::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 10, 2, 5).unwrap(),
                "Heat 2 (Round 1)",
            ),
        ]
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("chapterslog.json"));
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let entries = sample_entries();

        store.save(Some(start), &entries).unwrap();
        let restored = store.load().unwrap().unwrap();

        assert_eq!(restored.start_time, Some(start));
        assert_eq!(restored.entries, entries);
    }

    #[test]
    fn roundtrip_is_lossy_below_one_second() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("chapterslog.json"));
        let precise = Utc.timestamp_opt(1_704_103_230, 750_000_000).unwrap();
        let truncated = Utc.timestamp_opt(1_704_103_230, 0).unwrap();

        store
            .save(Some(precise), &[ChapterEntry::new(precise, "Heat 1")])
            .unwrap();
        let restored = store.load().unwrap().unwrap();

        assert_eq!(restored.start_time, Some(truncated));
        assert_eq!(restored.entries[0].timestamp, truncated);
    }

    #[test]
    fn record_uses_documented_wire_shape() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("chapterslog.json"));
        let entries = sample_entries();

        store.save(None, &entries).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();

        assert!(content.contains("\"start_time\":null"));
        assert!(content.contains("[\"2024-01-01 10:00:30\",\"Heat 1 (Round 1)\"]"));
    }

    #[test]
    fn load_missing_record_is_none() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("chapterslog.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chapterslog.json");
        fs::write(&path, "{ not json").unwrap();

        let store = LogStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn load_rejects_bad_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chapterslog.json");
        fs::write(
            &path,
            r#"{"start_time":"yesterday","chapters":[]}"#,
        )
        .unwrap();

        let store = LogStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::BadTimestamp(_))));
    }

    #[test]
    fn delete_removes_record_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("chapterslog.json"));
        store.save(None, &[]).unwrap();
        assert!(store.path().exists());

        store.delete().unwrap();
        assert!(!store.path().exists());
        store.delete().unwrap();
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chapterslog.json");
        let store = LogStore::new(&path);
        store.save(None, &sample_entries()).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn in_memory_store_skips_io() {
        let store = LogStore::in_memory();
        store.save(None, &sample_entries()).unwrap();
        assert!(store.load().unwrap().is_none());
        store.delete().unwrap();
    }
}
