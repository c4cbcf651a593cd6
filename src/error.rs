//! Error types for Campmate
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Campmate operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, credential access, and backend API calls.
///
/// Failed remote calls are deliberately collapsed into the single [`Api`]
/// variant: the client does not distinguish timeouts, 4xx, and 5xx — every
/// non-success response takes the same failure branch.
///
/// [`Api`]: CampmateError::Api
#[derive(Error, Debug)]
pub enum CampmateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend API errors (any failed remote call)
    #[error("API error: {0}")]
    Api(String),

    /// Missing credentials for the backend
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for Campmate operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = CampmateError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_api_error_display() {
        let error = CampmateError::Api("backend returned 503".to_string());
        assert_eq!(error.to_string(), "API error: backend returned 503");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = CampmateError::MissingCredentials("no token stored".to_string());
        assert_eq!(error.to_string(), "Missing credentials: no token stored");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: CampmateError = io_error.into();
        assert!(matches!(error, CampmateError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "{invalid json}";
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let error: CampmateError = json_error.into();
        assert!(matches!(error, CampmateError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: : yaml";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: CampmateError = yaml_error.into();
        assert!(matches!(error, CampmateError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CampmateError>();
    }
}
