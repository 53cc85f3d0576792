//! Application settings configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{config_path, ConfigError, Result};

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interval between tick events in milliseconds.
    pub tick_rate_ms: u64,
    /// Timeout for remote option fetches in seconds.
    pub request_timeout_secs: u64,
    /// Placeholder of the filter input.
    pub placeholder: String,
    /// The UI theme to use.
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            request_timeout_secs: 30,
            placeholder: "Search".to_string(),
            theme: "dark".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load settings from a specific file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;

        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Save settings to a specific file, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(ConfigError::WriteError)?;

        info!(path = %path.display(), "Saved settings");
        Ok(())
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if a value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
