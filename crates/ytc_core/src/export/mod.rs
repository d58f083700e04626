//! Chapter export: document rendering, artifact files, and listing.
//!
//! This module provides:
//! - `export_chapters`: precondition checks + document rendering + write
//! - `list_exports` / `remove_all`: derived view of artifacts on disk
//! - `render_exports_markdown`: listing rendered for the host panel

mod listing;
mod writer;

pub use listing::{
    list_exports, remove_all, render_exports_markdown, ExportArtifact, EXPORT_SUFFIX,
};
pub use writer::{export_chapters, render_document, ExportError, ExportResult};
