//! On-disk tracker state
//!
//! Persists the last resolved count and the timestamp of the last refresh
//! attempt as a JSON file in an XDG-compliant data directory. A missing or
//! unreadable file loads as the default empty state, supporting graceful
//! degradation instead of failing the whole tool.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Mutable state owned by the refresh orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerState {
    /// The last resolved displayable value: a count rendered as a string,
    /// or the configured fallback text
    pub count: Option<String>,
    /// Unix timestamp of the last refresh attempt, successful or not
    pub last_checked: Option<i64>,
}

/// Reads and writes [`TrackerState`] to disk.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Creates a store at the XDG data path (`~/.local/share/fancount/state.json`
    /// on Linux). Returns `None` if the data directory cannot be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "fancount")?;
        Some(Self {
            path: project_dirs.data_dir().join("state.json"),
        })
    }

    /// Creates a store backed by an explicit file path.
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the state, returning the default empty state when the file is
    /// missing or cannot be parsed.
    pub fn load(&self) -> TrackerState {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Writes the state, creating the parent directory if needed.
    pub fn save(&self, state: &TrackerState) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }

    /// Deletes the state file if it exists.
    pub fn delete(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
