//! Settings sections and file handling.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogLevel;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the settings file failed.
    #[error("Failed to read settings file: {0}")]
    Read(#[from] io::Error),

    /// The settings file is not valid TOML.
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serializing defaults failed.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application settings, one TOML table per section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory layout.
    pub paths: PathSettings,
    /// Diagnostic logging.
    pub logging: LoggingSettings,
}

/// Directory layout section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Directory holding the chapter record and export artifacts.
    pub data_dir: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

/// Diagnostic logging section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    pub level: LogLevel,
}

impl Settings {
    /// Load settings from `path`, creating the file with defaults if it
    /// does not exist.
    ///
    /// Missing fields in an existing file fall back to their defaults.
    pub fn load_or_create(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let settings = Self::default();
            settings.write_to(path)?;
            Ok(settings)
        }
    }

    /// Write these settings to `path` atomically (temp file, then rename).
    pub fn write_to(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// The data directory as a path.
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_or_create_creates_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".config").join("settings.toml");

        let settings = Settings::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(settings.paths.data_dir, "data");
        assert_eq!(settings.logging.level, LogLevel::Info);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[paths]"));
        assert!(content.contains("[logging]"));
    }

    #[test]
    fn load_or_create_preserves_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[paths]\ndata_dir = \"my_data\"\n").unwrap();

        let settings = Settings::load_or_create(&path).unwrap();
        assert_eq!(settings.paths.data_dir, "my_data");
        // Missing section falls back to defaults
        assert_eq!(settings.logging.level, LogLevel::Info);
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "not [valid toml").unwrap();

        assert!(matches!(
            Settings::load_or_create(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        Settings::default().write_to(&path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
    }
}
