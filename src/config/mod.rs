//! Configuration management for utilitui.
//!
//! Handles persistence and loading of user preferences: the event-loop
//! poll cadence and the monitor's sampling cadence.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Event-loop input poll timeout in milliseconds. This is also the
    /// scheduler's tick granularity, so it must stay well below the
    /// shortest task interval (1s).
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,

    /// System monitor sampling cadence in milliseconds.
    #[serde(default = "default_monitor_interval_ms")]
    pub monitor_interval_ms: u64,
}

fn default_poll_ms() -> u64 {
    50
}

fn default_monitor_interval_ms() -> u64 {
    1500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_ms: default_poll_ms(),
            monitor_interval_ms: default_monitor_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate();

        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Clamp out-of-range values to something workable.
    pub fn validate(&mut self) {
        self.poll_ms = self.poll_ms.clamp(10, 500);
        self.monitor_interval_ms = self.monitor_interval_ms.clamp(250, 60_000);
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;

        Ok(config_dir.join("utilitui").join("config.json"))
    }
}
