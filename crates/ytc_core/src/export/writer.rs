//! Chapter document rendering and artifact writing.
//!
//! The exported document is the relative-time chapter list video sites
//! accept in a stream description: a short header, then one
//! `MM:SS - label` (or `HH:MM:SS - label`) line per chapter, offsets
//! measured from the stream start time.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::listing::{ExportArtifact, EXPORT_SUFFIX};
use crate::log::ChapterLog;
use crate::models::{time, ChapterEntry};

/// Width of the `=` separator line under the header.
const SEPARATOR_WIDTH: usize = 40;

/// Errors from chapter export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The log holds no chapters at all.
    #[error("No chapters to export")]
    NoChapters,

    /// No start time has been set to compute offsets against.
    #[error("No start time set")]
    NoStartTime,

    /// Chapters exist, but all predate the start time.
    #[error("No chapters to export after {start}")]
    NoChaptersAfterStart {
        /// The start time every chapter predates.
        start: DateTime<Utc>,
    },

    /// Writing the artifact failed.
    #[error("Failed to write export: {0}")]
    Io(#[from] io::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Export the log as a new artifact file in `export_dir`.
///
/// Chapters that predate the start time are silently skipped; the export
/// fails only if nothing at all qualifies. The artifact name embeds
/// `now` as a local timestamp at seconds precision, so names are unique
/// at up to one export per second.
pub fn export_chapters(
    log: &ChapterLog,
    export_dir: &Path,
    now: DateTime<Utc>,
) -> ExportResult<ExportArtifact> {
    if log.is_empty() {
        return Err(ExportError::NoChapters);
    }
    let start = log.start_time().ok_or(ExportError::NoStartTime)?;

    let qualifying: Vec<&ChapterEntry> = log
        .entries()
        .iter()
        .filter(|e| e.timestamp >= start)
        .collect();
    if qualifying.is_empty() {
        return Err(ExportError::NoChaptersAfterStart { start });
    }

    let document = render_document(start, &qualifying, now);

    fs::create_dir_all(export_dir)?;
    let file_name = format!("{}{}", time::format_file_stamp(now), EXPORT_SUFFIX);
    let path = export_dir.join(&file_name);
    fs::write(&path, document)?;

    tracing::info!("Exported {} chapters to {:?}", qualifying.len(), path);
    Ok(ExportArtifact { file_name, path })
}

/// Render the export document for the given start time and chapters.
///
/// `entries` must already be filtered to chapters at or after `start`
/// and in chronological order.
pub fn render_document(
    start: DateTime<Utc>,
    entries: &[&ChapterEntry],
    now: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Export: {}\n", time::format_display_local(now)));
    output.push_str(&format!("Start: {}\n", time::format_display_local(start)));
    output.push_str(&"=".repeat(SEPARATOR_WIDTH));
    output.push('\n');

    // The stream itself is the first chapter
    output.push_str("00:00 - Start of Livestream\n");

    for entry in entries {
        let offset = time::format_elapsed(entry.elapsed_since(start));
        output.push_str(&format!("{} - {}\n", offset, entry.label));
    }

    output
}
