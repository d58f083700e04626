//! Plugin wiring: maps host events and UI actions to log operations.
//!
//! `ChapterPlugin` owns the chapter log behind a single mutex and holds
//! the directory layout plus the host's notification channel. It is the
//! only component that talks to the host; the log, store, and export
//! modules below it know nothing about events or notifications.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};

use crate::config::Settings;
use crate::export::{self, ExportArtifact, ExportError};
use crate::host::{EventSource, HostEvent, Notifier, UiAction};
use crate::log::{ChapterLog, ChapterLogError, LogStore};
use crate::models::{time, RaceStart};

/// File name of the durable chapter record inside the data directory.
pub const RECORD_FILE_NAME: &str = "chapterslog.json";

/// The embedded chapter plugin.
///
/// All four mutators (set start time, log chapter, reset, export) go
/// through one mutex around the log, so hosts may deliver events from
/// any thread.
pub struct ChapterPlugin {
    /// The chapter log; the mutex serializes all mutators.
    log: Mutex<ChapterLog>,
    /// Directory holding both the record file and export artifacts.
    data_dir: PathBuf,
    /// Host notification channel.
    notifier: Box<dyn Notifier>,
}

impl ChapterPlugin {
    /// Create a plugin storing its record and exports under `data_dir`.
    ///
    /// The directory is created lazily on first write.
    pub fn new(data_dir: impl Into<PathBuf>, notifier: Box<dyn Notifier>) -> Self {
        let data_dir = data_dir.into();
        let store = LogStore::new(data_dir.join(RECORD_FILE_NAME));
        Self {
            log: Mutex::new(ChapterLog::new(store)),
            data_dir,
            notifier,
        }
    }

    /// Create a plugin from loaded settings.
    pub fn from_settings(settings: &Settings, notifier: Box<dyn Notifier>) -> Self {
        Self::new(settings.data_dir(), notifier)
    }

    /// Directory holding the record file and export artifacts.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Lock and access the chapter log directly.
    pub fn log(&self) -> MutexGuard<'_, ChapterLog> {
        self.log.lock()
    }

    /// Subscribe a shared plugin to a host event source.
    pub fn attach(self: Arc<Self>, events: &mut dyn EventSource) {
        events.subscribe(Box::new(move |event| self.handle_event(&event)));
    }

    /// Handle one host event.
    pub fn handle_event(&self, event: &HostEvent) {
        match event {
            HostEvent::Startup => self.log.lock().load(),
            HostEvent::RaceStaged(race) => self.log_race_start(race),
        }
    }

    /// Handle one UI action.
    pub fn handle_action(&self, action: UiAction) {
        match action {
            UiAction::SetStartTime(raw) => self.set_start_time(&raw),
            UiAction::ResetLog => self.reset(),
            UiAction::ExportChapters => self.export(),
        }
    }

    /// Log a chapter for a staged race at the current time.
    fn log_race_start(&self, race: &RaceStart) {
        let label = race.label();
        if let Err(e) = self.log.lock().log_chapter(Utc::now(), label) {
            tracing::error!("Failed to persist chapter: {}", e);
        }
    }

    /// Set the stream start time from the raw UI field contents.
    pub fn set_start_time(&self, raw: &str) {
        let raw = raw.trim();
        if raw.is_empty() {
            self.notifier.notify("No start time set.");
            return;
        }

        match self.log.lock().set_start_from_input(raw) {
            Ok(at) => self.notifier.notify(&format!(
                "Start time set to {} UTC",
                time::format_stored(at)
            )),
            Err(ChapterLogError::InvalidTimeFormat(_)) => {
                self.notifier.notify("Invalid date/time format.");
            }
            Err(ChapterLogError::Store(e)) => {
                tracing::error!("Failed to persist start time: {}", e);
                self.notifier.notify("Failed to save the chapter log.");
            }
        }
    }

    /// Clear the log, the durable record, and all export artifacts.
    pub fn reset(&self) {
        let record = self.log.lock().reset();
        let exports = export::remove_all(&self.data_dir);

        match (record, exports) {
            (Ok(()), Ok(())) => self.notifier.notify(
                "All chapters, export files, and the chapter log have been cleared.",
            ),
            (record, exports) => {
                if let Err(e) = record {
                    tracing::error!("Failed to delete chapter record: {}", e);
                }
                if let Err(e) = exports {
                    tracing::error!("Failed to delete exports: {}", e);
                }
                self.notifier.notify("Failed to clear some chapter data.");
            }
        }
    }

    /// Export the current log as a new artifact.
    pub fn export(&self) {
        let result = {
            let log = self.log.lock();
            export::export_chapters(&log, &self.data_dir, Utc::now())
        };

        match result {
            Ok(artifact) => self.notifier.notify(&format!(
                "YouTube chapters exported to data/{}",
                artifact.file_name
            )),
            Err(ExportError::NoChapters) => {
                self.notifier.notify("No chapters to export.");
            }
            Err(ExportError::NoStartTime) => {
                self.notifier
                    .notify("No start time set. Please set a start time before exporting.");
            }
            Err(ExportError::NoChaptersAfterStart { start }) => {
                self.notifier.notify(&format!(
                    "No chapters to export after {}",
                    time::format_display_local(start)
                ));
            }
            Err(ExportError::Io(e)) => {
                tracing::error!("Failed to write export: {}", e);
                self.notifier.notify("Failed to write the chapter export.");
            }
        }
    }

    /// Current export artifacts, newest first.
    ///
    /// Recomputed from the filesystem on every call; a listing failure
    /// reads as no exports.
    pub fn exports(&self) -> Vec<ExportArtifact> {
        match export::list_exports(&self.data_dir) {
            Ok(artifacts) => artifacts,
            Err(e) => {
                tracing::warn!("Failed to list exports: {}", e);
                Vec::new()
            }
        }
    }

    /// The export listing rendered for the host's display panel.
    pub fn exports_markdown(&self) -> String {
        export::render_exports_markdown(&self.exports())
    }
}
