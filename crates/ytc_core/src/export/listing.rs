//! Export artifact listing and removal.
//!
//! The set of existing artifacts is never cached: every listing is
//! recomputed from the export directory, so it cannot go stale.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name suffix shared by every export artifact.
pub const EXPORT_SUFFIX: &str = "-youtube_chapters.txt";

/// One completed export on disk.
///
/// Identified by its file name, which embeds the local export timestamp
/// (`YYYYMMDD_HHMMSS`), so lexicographic name order is creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Bare file name, e.g. `20240101_120000-youtube_chapters.txt`.
    pub file_name: String,
    /// Full path to the artifact.
    pub path: PathBuf,
}

/// List all artifacts in `export_dir`, newest first.
///
/// A missing directory lists as empty (nothing has been exported yet).
pub fn list_exports(export_dir: &Path) -> io::Result<Vec<ExportArtifact>> {
    if !export_dir.exists() {
        return Ok(Vec::new());
    }

    let mut artifacts = Vec::new();
    for dir_entry in fs::read_dir(export_dir)? {
        let dir_entry = dir_entry?;
        let file_name = dir_entry.file_name().to_string_lossy().into_owned();
        if file_name.ends_with(EXPORT_SUFFIX) {
            artifacts.push(ExportArtifact {
                file_name,
                path: dir_entry.path(),
            });
        }
    }

    // Names embed timestamps, so descending name order is newest-first
    artifacts.sort_by(|a, b| b.file_name.cmp(&a.file_name));
    Ok(artifacts)
}

/// Delete every artifact in `export_dir`. Non-artifact files are left
/// alone.
pub fn remove_all(export_dir: &Path) -> io::Result<()> {
    for artifact in list_exports(export_dir)? {
        fs::remove_file(&artifact.path)?;
        tracing::info!("Deleted export {}", artifact.file_name);
    }
    Ok(())
}

/// Render the artifact listing as Markdown for the host's display panel.
pub fn render_exports_markdown(artifacts: &[ExportArtifact]) -> String {
    if artifacts.is_empty() {
        return "### No Exports Available\n\n".to_string();
    }

    let mut output = String::from("### Available Exports\n\n");
    for artifact in artifacts {
        output.push_str(&format!(
            "- [{name}](/data/{name})\n",
            name = artifact.file_name
        ));
    }
    output
}
