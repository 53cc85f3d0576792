//! Configuration management for formfield.
//!
//! This module handles loading and saving the application settings stored
//! as TOML in the user's configuration directory.

mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use settings::Settings;

/// Name of the application's configuration directory.
pub const APP_DIR: &str = "formfield";

/// Name of the settings file inside the configuration directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no configuration directory.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The configuration directory could not be created.
    #[error("failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The configuration file could not be written.
    #[error("failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The configuration file is not valid TOML.
    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The settings could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A setting has an invalid value.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Path of the default settings file.
pub fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join(APP_DIR).join(CONFIG_FILE))
}
