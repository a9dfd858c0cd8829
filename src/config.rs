//! User settings for gbckp.
//!
//! Settings live in an optional TOML file under the platform configuration directory.
//! The file is only ever read; when it is absent the defaults apply.

use crate::constants::{CONFIG_NAME, MIN_PAUSE_SECS, PKG_NAME};
use crate::job::Level;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tunables read from `config.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Gzip level used for directory archives.
    pub level: Level,
    /// Seconds to wait between two sources.
    pub pause_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: Level::Default,
            pause_secs: MIN_PAUSE_SECS,
        }
    }
}

impl Settings {
    /// Loads settings from the default configuration file, or defaults if there is none.
    pub fn load() -> anyhow::Result<Self> {
        match config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads settings from `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let toml_str = fs::read_to_string(path)
            .with_context(|| format!("Error reading config file '{}'", path.display()))?;
        let settings = toml::from_str(&toml_str)
            .with_context(|| format!("Error parsing config file '{}'", path.display()))?;
        tracing::debug!(config = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Pause between sources. Never shorter than one second, so names stay unique.
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs.max(MIN_PAUSE_SECS))
    }
}

/// Returns the absolute path to the configuration file, if a config directory exists.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_NAME))
}

/// Returns the configuration directory for the application, platform-specific.
#[cfg(not(target_os = "macos"))]
fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(PKG_NAME))
}

/// Returns the configuration directory for the application, platform-specific.
#[cfg(target_os = "macos")]
fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(PKG_NAME))
}
