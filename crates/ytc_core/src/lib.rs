//! YTC Core - chapter logging and export for race livestreams
//!
//! This crate records the wall-clock time of each race start inside a
//! host race-timing application and exports the log as a relative-time
//! chapter list (the format video sites use to mark timestamps in a
//! livestream recording). It contains all logic with zero host
//! dependencies: the host supplies events and a notification channel,
//! nothing more.

pub mod config;
pub mod export;
pub mod host;
pub mod log;
pub mod logging;
pub mod models;
pub mod plugin;

pub use plugin::ChapterPlugin;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
