//! Chapter log state and persistence.
//!
//! This module provides:
//! - `ChapterLog`: the ordered, append-only chapter log with its start time
//! - `LogStore`: the JSON durable record backing it (atomic writes,
//!   tolerant loads, `in_memory()` for tests)

mod chapter_log;
mod store;

pub use chapter_log::{ChapterLog, ChapterLogError, ChapterLogResult};
pub use store::{LogStore, RestoredLog, StoreError, StoreResult};
