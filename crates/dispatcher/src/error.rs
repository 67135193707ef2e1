//! Dispatcher error types

use contracts::LogError;
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink name empty or whitespace only
    #[error("sink name cannot be empty")]
    InvalidSinkName,

    /// A sink with this name is already registered
    #[error("sink '{name}' is already registered")]
    DuplicateSink { name: String },

    /// No sink with this name is registered
    #[error("sink '{name}' is not registered")]
    SinkNotFound { name: String },

    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Error reported by a sink (from contract)
    #[error("sink error: {0}")]
    Sink(#[from] LogError),
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether a sink reported it has no bound target
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::Sink(e) if e.is_not_ready())
    }
}
