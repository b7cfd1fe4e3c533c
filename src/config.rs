//! Application configuration.

use crate::consts::cli_consts::refresh;
use crate::fleet::ViewMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_DIR: &str = ".posture-watch";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read or write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Could not determine the home directory")]
    NoHome,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the compliance API.
    pub api_url: Option<String>,
    pub refresh_interval_secs: u64,
    pub default_view: ViewMode,
    /// Where downloaded exports are written. Defaults to the working directory.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: None,
            refresh_interval_secs: refresh::DEFAULT_INTERVAL_SECS,
            default_view: ViewMode::default(),
            export_dir: None,
        }
    }
}

impl Config {
    /// `~/.posture-watch/config.json`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = home::home_dir().ok_or(ConfigError::NoHome)?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns a `ConfigError` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let buf = fs::read(path)?;
        Ok(serde_json::from_slice(&buf)?)
    }

    /// Like [`Config::load_from_file`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the configuration file if present.
    pub fn clear(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Refresh interval, never shorter than the supported minimum.
    pub fn refresh_interval(&self) -> Duration {
        refresh::clamp_interval(self.refresh_interval_secs)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
