//! Centralized error types for formfield.
//!
//! This module provides a unified error hierarchy for the application with
//! user-friendly error messages. All error types use `thiserror` for
//! ergonomic error handling.

use thiserror::Error;

use crate::config::ConfigError;
use crate::form::SchemaError;
use crate::source::SourceError;

/// The main application error type.
///
/// This enum aggregates all error types that can occur in formfield,
/// providing user-friendly error messages while preserving the underlying
/// error context for debugging.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Option source errors.
    #[error("{0}")]
    Source(#[from] SourceError),

    /// Form schema, data or error file problems.
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Source(e) => match e {
                SourceError::Network(_) => {
                    "Could not load options. Please check your network connection.".to_string()
                }
                SourceError::NotFound(url) => format!("Option source '{}' was not found.", url),
                SourceError::Status(_) => {
                    "The option source returned an error. Please try again later.".to_string()
                }
                SourceError::MalformedJson(_) => {
                    "The option source returned invalid data.".to_string()
                }
                SourceError::InvalidUrl(url) => format!("Invalid option source URL '{}'.", url),
            },
            AppError::Schema(e) => match e {
                SchemaError::Read { path, .. } => {
                    format!("Could not read '{}'. Please check the path.", path.display())
                }
                SchemaError::Parse { path, .. } => {
                    format!("'{}' is not a valid form file.", path.display())
                }
                SchemaError::InvalidField { id, reason } => {
                    format!("Field '{}' is invalid: {}", id, reason)
                }
            },
            AppError::Io(_) => {
                "A file operation failed. Please check file permissions.".to_string()
            }
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error prevents the form from being shown.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::Schema(_) | AppError::Terminal(_)
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Run 'formfield --write-config <SCHEMA>' to write a fresh configuration file.")
            }
            AppError::Schema(SchemaError::Parse { .. }) => {
                Some("The schema must be a JSON object with a 'components' array.")
            }
            AppError::Source(SourceError::Network(_)) => {
                Some("Check the field's dataSource URL and your connection.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
