//! Configuration for the modal layout dispatcher

mod chains;

pub use chains::CommandChains;

use crate::keys::normalize_key;
use crate::paths;
use crate::prefix::DEFAULT_PREFIX_TIMEOUT_MS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Key that forms the prefix chord together with ctrl
    #[serde(default = "default_prefix_key")]
    pub prefix_key: String,

    /// Prefix window in milliseconds, used until a persisted value is restored
    #[serde(default = "default_prefix_timeout_ms")]
    pub prefix_timeout_ms: u64,

    /// Context that must hold for an event to be handled
    #[serde(default = "default_modal_context")]
    pub modal_context: String,

    /// Context that, when it holds, keeps the dispatcher out of the way
    #[serde(default = "default_overlay_context")]
    pub overlay_context: String,

    /// Key under which the snapshot is stored
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Status surface slot owned by the dispatcher
    #[serde(default = "default_status_slot")]
    pub status_slot: String,

    /// Priority passed with the status element
    #[serde(default = "default_status_priority")]
    pub status_priority: i32,

    /// Host command chains per logical action
    #[serde(default)]
    pub chains: CommandChains,
}

fn default_prefix_key() -> String {
    "b".to_string()
}

const fn default_prefix_timeout_ms() -> u64 {
    DEFAULT_PREFIX_TIMEOUT_MS
}

fn default_modal_context() -> String {
    "editorTextFocus".to_string()
}

fn default_overlay_context() -> String {
    "inQuickOpen".to_string()
}

fn default_storage_key() -> String {
    "modal-layout.state".to_string()
}

fn default_status_slot() -> String {
    "modal-layout.status".to_string()
}

const fn default_status_priority() -> i32 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix_key: default_prefix_key(),
            prefix_timeout_ms: default_prefix_timeout_ms(),
            modal_context: default_modal_context(),
            overlay_context: default_overlay_context(),
            storage_key: default_storage_key(),
            status_slot: default_status_slot(),
            status_priority: default_status_priority(),
            chains: CommandChains::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns an error if reading or parsing the config file fails
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        // Actions added since the file was written still get their chains
        config.chains.merge_defaults();
        config.normalize_prefix_key();
        Ok(config)
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created or the file cannot be written
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn default_path() -> PathBuf {
        paths::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::APP_DIR)
            .join("config.json")
    }

    /// Canonicalize `prefix_key` the same way event keys are, so `"B"`
    /// matches a struck `b`.
    pub fn normalize_prefix_key(&mut self) {
        if let Cow::Owned(key) = normalize_key(&self.prefix_key) {
            self.prefix_key = key;
        }
    }

    /// The configured prefix window. Zero falls back to the default.
    #[must_use]
    pub const fn prefix_timeout(&self) -> Duration {
        if self.prefix_timeout_ms == 0 {
            Duration::from_millis(DEFAULT_PREFIX_TIMEOUT_MS)
        } else {
            Duration::from_millis(self.prefix_timeout_ms)
        }
    }
}
