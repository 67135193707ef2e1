//! Layered error definitions
//!
//! Categorized by source: config / severity / sink / io

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum LogError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Severity Errors =====
    /// Numeric severity outside the defined enumeration
    #[error("severity value {value} is out of range (expected 0..=4)")]
    SeverityOutOfRange { value: i64 },

    /// Unrecognised severity name
    #[error("unknown severity '{name}'")]
    UnknownSeverity { name: String },

    // ===== Sink Errors =====
    /// Sink has no bound target (never attached, or already closed)
    #[error("sink '{sink}' is not ready: no target bound")]
    NotReady { sink: String },

    /// Lifecycle transition not allowed from the current state
    #[error("sink '{sink}' invalid state: {message}")]
    InvalidState { sink: String, message: String },

    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create not-ready error
    pub fn not_ready(sink: impl Into<String>) -> Self {
        Self::NotReady { sink: sink.into() }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Whether this is the "unavailable" condition of a released or unbound sink
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}
