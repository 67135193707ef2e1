//! Error types for CLI operations.

use std::path::Path;

use contracts::LogError;
use dispatcher::DispatcherError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration parsing error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    /// Dispatcher construction or dispatch error
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatcherError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.display().to_string(),
        }
    }
}

impl From<LogError> for CliError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::ConfigValidation { .. } => Self::ConfigValidation {
                message: err.to_string(),
            },
            LogError::Io(e) => Self::Io(e),
            other => Self::ConfigParse {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_error_mapping() {
        let err: CliError = LogError::config_validation("sinks[0].name", "empty").into();
        assert!(matches!(err, CliError::ConfigValidation { .. }));
        assert!(err.to_string().contains("sinks[0].name"));

        let err: CliError = LogError::config_parse("TOML parse error").into();
        assert!(matches!(err, CliError::ConfigParse { .. }));
    }
}
