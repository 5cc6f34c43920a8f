//! Configuration for a tablock profile.

use crate::error::{LockError, Result};
use crate::types::{Badge, GlobalSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Name of the configuration file inside the profile directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Comprehensive configuration for a tablock profile.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Defaults applied when the store holds no settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Tab-reopen behaviour.
    #[serde(default)]
    pub reopen: ReopenConfig,

    /// Toolbar badge shown on locked tabs.
    #[serde(default)]
    pub badge: BadgeConfig,

    /// Persistent store location.
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a profile directory, defaulting if absent.
    pub fn load(profile_dir: &Path) -> Result<Self> {
        let path = profile_dir.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| LockError::Config(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| LockError::Config(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to a profile directory.
    pub fn save(&self, profile_dir: &Path) -> Result<()> {
        let path = profile_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| LockError::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| LockError::Config(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// Defaults for state the store does not hold yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefaultsConfig {
    /// Global link policy on first start (default: true).
    pub open_links_in_new_tab: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            open_links_in_new_tab: true,
        }
    }
}

impl DefaultsConfig {
    /// Settings to start from when nothing is stored.
    pub fn settings(&self) -> GlobalSettings {
        GlobalSettings {
            open_links_in_new_tab: self.open_links_in_new_tab,
        }
    }
}

/// Tab-reopen behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReopenConfig {
    /// Seconds a closed tab's record waits for its replacement before it
    /// is dropped (default: 60).
    pub ttl_secs: u64,

    /// Recreate the tab at its old position unless its window is closing
    /// (default: true).
    pub restore_position: bool,
}

impl Default for ReopenConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60,
            restore_position: true,
        }
    }
}

impl ReopenConfig {
    /// Returns the TTL as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Toolbar badge appearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BadgeConfig {
    /// Badge text (default: a lock glyph).
    pub text: String,
    /// Badge background color (default: red).
    pub color: String,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            text: "\u{1F512}".to_string(),
            color: "#FF0000".to_string(),
        }
    }
}

impl BadgeConfig {
    /// The badge to show on a locked tab.
    pub fn badge(&self) -> Badge {
        Badge {
            text: self.text.clone(),
            color: self.color.clone(),
        }
    }
}

/// Persistent store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file name inside the profile directory (default: state.redb).
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file_name: "state.redb".to_string(),
        }
    }
}
