//! Typed settings with explicit load/save against a TOML file
//!
//! Settings live in the XDG config directory (`~/.config/fancount/config.toml`
//! on Linux). A missing file loads as defaults; the tool is considered
//! configured once a profile identifier has been set.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::interval::parse_interval;

/// Errors that can occur when loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not determine the config directory
    #[error("could not determine the config directory")]
    NoConfigDir,

    /// Reading or writing the settings file failed
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be serialized
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// User-facing configuration for the tracked profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Handle of the tracked account; empty until setup has run
    pub profile: String,
    /// Minimum time between fetch attempts, as a duration string
    pub every: String,
    /// Substitute display value used when no valid count is available;
    /// empty means "keep the last known value"
    pub fallback_text: String,
    /// Optional duration over which daily samples are requested and
    /// averaged; empty disables averaging
    pub average_window: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: String::new(),
            every: "3 hours".to_string(),
            fallback_text: String::new(),
            average_window: String::new(),
        }
    }
}

impl Settings {
    /// Path of the settings file, if a config directory can be determined.
    pub fn config_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "fancount")?;
        Some(project_dirs.config_dir().join("config.toml"))
    }

    /// Loads settings from the default location, falling back to defaults
    /// when the file does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Loads settings from an explicit path (used by tests).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(?path, "settings file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves settings to the default location, creating the directory if
    /// needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Saves settings to an explicit path (used by tests).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Whether a profile has been configured. Until then the display
    /// accessor returns a placeholder and no fetch occurs.
    pub fn is_configured(&self) -> bool {
        !self.profile.is_empty()
    }

    /// The refresh interval in seconds, if the configured string parses.
    pub fn every_secs(&self) -> Option<i64> {
        parse_interval(&self.every)
    }

    /// The averaging window in seconds, if configured and parseable.
    pub fn average_window_secs(&self) -> Option<i64> {
        if self.average_window.is_empty() {
            return None;
        }
        parse_interval(&self.average_window)
    }
}
