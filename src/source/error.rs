//! Option source error types.

use thiserror::Error;

/// Errors that can occur while resolving options from a remote source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The data source does not exist.
    #[error("Data source not found: {0}")]
    NotFound(String),

    /// The data source answered with an unexpected status.
    #[error("Data source error: {0}")]
    Status(String),

    /// The response body is not valid JSON.
    #[error("Malformed JSON from data source: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The configured URL is not usable.
    #[error("Invalid data source URL: {0}")]
    InvalidUrl(String),
}

/// Result type for option source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

impl SourceError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, url: &str) -> Self {
        match status.as_u16() {
            404 => SourceError::NotFound(url.to_string()),
            500..=599 => SourceError::Status(format!("HTTP {}: {}", status, url)),
            _ => SourceError::Status(format!("Unexpected HTTP {}: {}", status, url)),
        }
    }

    /// Check whether a later attempt might succeed.
    ///
    /// Used only for logging; failed resolutions are never retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SourceError::Network(_) | SourceError::Status(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_from_status_404() {
        let err = SourceError::from_status(StatusCode::NOT_FOUND, "http://host/options");
        match err {
            SourceError::NotFound(url) => assert_eq!(url, "http://host/options"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_error_from_status_500() {
        let err = SourceError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "u");
        assert!(matches!(err, SourceError::Status(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_from_status_unexpected() {
        let err = SourceError::from_status(StatusCode::IM_A_TEAPOT, "u");
        assert!(err.to_string().contains("Unexpected HTTP 418"));
    }

    #[test]
    fn test_malformed_json_not_recoverable() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = SourceError::from(json_err);
        assert!(err.to_string().starts_with("Malformed JSON"));
        assert!(!err.is_recoverable());
    }
}
