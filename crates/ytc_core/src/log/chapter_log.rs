//! Chapter log state machine.
//!
//! Owns the (start_time, entries) pair and keeps it consistent with the
//! durable record: every successful mutation persists before returning.
//! The log itself never touches export artifacts; that half of a reset
//! belongs to the plugin layer, which knows the export directory.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::store::{LogStore, StoreError, StoreResult};
use crate::models::{time, ChapterEntry};

/// Errors from chapter log operations.
#[derive(Error, Debug)]
pub enum ChapterLogError {
    /// User-supplied start time is not in the expected form.
    #[error("Invalid date/time format: {0:?}")]
    InvalidTimeFormat(String),

    /// Persisting the log failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for chapter log operations.
pub type ChapterLogResult<T> = Result<T, ChapterLogError>;

/// Ordered, append-only log of race-start chapters plus the stream
/// start time exports are computed against.
///
/// Explicitly constructed and owned by its caller; the host hands it
/// events, it never reaches back into the host.
#[derive(Debug)]
pub struct ChapterLog {
    /// Reference point for relative-time exports.
    start_time: Option<DateTime<Utc>>,
    /// Logged chapters in insertion (= chronological) order.
    entries: Vec<ChapterEntry>,
    /// Backing durable record.
    store: LogStore,
}

impl ChapterLog {
    /// Create an empty log backed by the given store.
    pub fn new(store: LogStore) -> Self {
        Self {
            start_time: None,
            entries: Vec::new(),
            store,
        }
    }

    /// Create an empty log without persistence (for testing).
    pub fn in_memory() -> Self {
        Self::new(LogStore::in_memory())
    }

    /// The stream start time, if set.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Logged chapters in insertion order.
    pub fn entries(&self) -> &[ChapterEntry] {
        &self.entries
    }

    /// Whether the log holds no chapters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restore state from the durable record.
    ///
    /// A missing record is the normal cold start. A malformed record is
    /// logged and otherwise ignored — corrupt low-stakes data must not
    /// take the host down.
    pub fn load(&mut self) {
        match self.store.load() {
            Ok(Some(restored)) => {
                if let Some(start) = restored.start_time {
                    tracing::info!("Loaded start time {} UTC", time::format_stored(start));
                }
                if !restored.entries.is_empty() {
                    tracing::info!(
                        "Loaded {} saved chapters from previous session",
                        restored.entries.len()
                    );
                }
                self.start_time = restored.start_time;
                self.entries = restored.entries;
            }
            Ok(None) => {
                tracing::info!("No chapter record found");
            }
            Err(e) => {
                tracing::warn!("Failed to load chapter record: {}", e);
            }
        }
    }

    /// Set the start time from a user-typed string
    /// (`YYYY-MM-DDTHH:MM:SS`, local wall clock).
    ///
    /// On success stores the UTC instant and persists. On parse failure
    /// returns `InvalidTimeFormat` and leaves all state untouched.
    pub fn set_start_from_input(&mut self, raw: &str) -> ChapterLogResult<DateTime<Utc>> {
        let at = time::parse_user_input(raw)
            .ok_or_else(|| ChapterLogError::InvalidTimeFormat(raw.to_string()))?;
        self.set_start(at)?;
        Ok(at)
    }

    /// Set the start time from an already-resolved instant and persist.
    pub fn set_start(&mut self, at: DateTime<Utc>) -> StoreResult<()> {
        self.start_time = Some(at);
        self.persist()
    }

    /// Append a chapter and persist.
    ///
    /// The append itself cannot fail; a persistence error leaves the
    /// entry in memory and is reported to the caller.
    pub fn log_chapter(&mut self, at: DateTime<Utc>, label: impl Into<String>) -> StoreResult<()> {
        let entry = ChapterEntry::new(at, label);
        tracing::info!(
            "Logged '{}' at {} UTC",
            entry.label,
            entry.timestamp.format("%H:%M:%S")
        );
        self.entries.push(entry);
        self.persist()
    }

    /// Clear the start time and all entries, and delete the durable
    /// record. Idempotent.
    pub fn reset(&mut self) -> StoreResult<()> {
        self.start_time = None;
        self.entries.clear();
        self.store.delete()
    }

    fn persist(&self) -> StoreResult<()> {
        self.store.save(self.start_time, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    #[test]
    fn appends_preserve_insertion_order() {
        let mut log = ChapterLog::in_memory();
        log.log_chapter(ts(10, 0, 30), "Heat 1 (Round 1)").unwrap();
        log.log_chapter(ts(10, 2, 5), "Heat 2 (Round 1)").unwrap();
        log.log_chapter(ts(10, 5, 0), "Practice").unwrap();

        let labels: Vec<_> = log.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Heat 1 (Round 1)", "Heat 2 (Round 1)", "Practice"]);
        assert_eq!(log.entries()[0].timestamp, ts(10, 0, 30));
        assert_eq!(log.entries()[2].timestamp, ts(10, 5, 0));
    }

    #[test]
    fn invalid_start_input_leaves_state_untouched() {
        let mut log = ChapterLog::in_memory();
        log.set_start(ts(9, 0, 0)).unwrap();
        log.log_chapter(ts(10, 0, 0), "Heat 1 (Round 1)").unwrap();

        let err = log.set_start_from_input("not-a-date").unwrap_err();
        assert!(matches!(err, ChapterLogError::InvalidTimeFormat(_)));
        assert_eq!(log.start_time(), Some(ts(9, 0, 0)));
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn valid_start_input_is_stored() {
        let mut log = ChapterLog::in_memory();
        let at = log.set_start_from_input("2024-01-15T12:00:00").unwrap();
        assert_eq!(log.start_time(), Some(at));
    }

    #[test]
    fn state_survives_restart() {
        let dir = tempdir().unwrap();
        let record = dir.path().join("chapterslog.json");

        let mut log = ChapterLog::new(LogStore::new(&record));
        log.set_start(ts(9, 0, 0)).unwrap();
        log.log_chapter(ts(10, 0, 30), "Heat 1 (Round 1)").unwrap();

        let mut reloaded = ChapterLog::new(LogStore::new(&record));
        reloaded.load();
        assert_eq!(reloaded.start_time(), Some(ts(9, 0, 0)));
        assert_eq!(reloaded.entries(), log.entries());
    }

    #[test]
    fn reset_deletes_record_not_just_memory() {
        let dir = tempdir().unwrap();
        let record = dir.path().join("chapterslog.json");

        let mut log = ChapterLog::new(LogStore::new(&record));
        log.set_start(ts(9, 0, 0)).unwrap();
        log.log_chapter(ts(10, 0, 30), "Heat 1 (Round 1)").unwrap();
        assert!(record.exists());

        log.reset().unwrap();
        assert!(log.is_empty());
        assert!(log.start_time().is_none());
        assert!(!record.exists());

        // A fresh process sees nothing to load
        let mut reloaded = ChapterLog::new(LogStore::new(&record));
        reloaded.load();
        assert!(reloaded.is_empty());
        assert!(reloaded.start_time().is_none());

        // Second reset observes the same end state
        log.reset().unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn malformed_record_loads_as_empty() {
        let dir = tempdir().unwrap();
        let record = dir.path().join("chapterslog.json");
        fs::write(&record, "{ not json").unwrap();

        let mut log = ChapterLog::new(LogStore::new(&record));
        log.load();
        assert!(log.is_empty());
        assert!(log.start_time().is_none());
    }

    #[test]
    fn every_mutation_persists() {
        let dir = tempdir().unwrap();
        let record = dir.path().join("chapterslog.json");
        let mut log = ChapterLog::new(LogStore::new(&record));

        log.log_chapter(ts(10, 0, 30), "Heat 1 (Round 1)").unwrap();
        assert!(record.exists());

        fs::remove_file(&record).unwrap();
        log.set_start(ts(9, 0, 0)).unwrap();
        assert!(record.exists());
    }
}
