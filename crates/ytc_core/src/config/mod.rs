//! Configuration for the chapter plugin.
//!
//! TOML settings with logical sections, defaults for missing fields,
//! `load_or_create` semantics, and atomic writes. Hosts that manage
//! their own paths can skip this and construct `ChapterPlugin` directly.
//!
//! # Example
//!
//! ```no_run
//! use ytc_core::config::Settings;
//!
//! let settings = Settings::load_or_create("settings.toml").unwrap();
//! println!("Data directory: {}", settings.paths.data_dir);
//! ```

mod settings;

pub use settings::{ConfigError, ConfigResult, LoggingSettings, PathSettings, Settings};
