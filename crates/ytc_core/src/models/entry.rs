//! Chapter entry type.

use chrono::{DateTime, Duration, Utc};

/// A single logged chapter: when a race started and what to call it.
///
/// Immutable once appended to the log. Entries are appended in arrival
/// order, which is also chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterEntry {
    /// Wall-clock time of the race start (UTC).
    pub timestamp: DateTime<Utc>,
    /// Display label, e.g. "A Main (Round 2)" or "Practice".
    pub label: String,
}

impl ChapterEntry {
    /// Create a new chapter entry.
    pub fn new(timestamp: DateTime<Utc>, label: impl Into<String>) -> Self {
        Self {
            timestamp,
            label: label.into(),
        }
    }

    /// Elapsed time from the given reference point to this entry.
    pub fn elapsed_since(&self, start: DateTime<Utc>) -> Duration {
        self.timestamp - start
    }
}
