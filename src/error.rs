//! Error types for the node console
//!
//! Only startup and backend paths can fail. The focus engine and the
//! dispatcher have no error paths at all.

use thiserror::Error;

/// Main error type for console operations
#[derive(Error, Debug)]
pub enum SshuiError {
    /// The terminal could not be acquired or drawn to
    #[error("Terminal error: {0}")]
    Terminal(std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Settings document could not be read or written
    #[error("Settings error: {0}")]
    Settings(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An external program did not finish in time
    #[error("Timed out after {0}s: {1}")]
    Timeout(u64, String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, SshuiError>;

impl From<anyhow::Error> for SshuiError {
    fn from(err: anyhow::Error) -> Self {
        SshuiError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SshuiError::Timeout(5, "systemctl restart monerod".to_string());
        assert_eq!(err.to_string(), "Timed out after 5s: systemctl restart monerod");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SshuiError = json_err.into();
        assert!(matches!(err, SshuiError::Json(_)));
    }
}
