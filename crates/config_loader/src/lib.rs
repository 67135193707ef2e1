//! # Config Loader
//!
//! Reads the dispatcher's sink list from TOML or JSON and rejects
//! configurations that could not be turned into live sinks (blank or
//! duplicate names, zero widths, empty file paths).
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("logdispatch.toml")).unwrap();
//! println!("Sinks: {}", config.sinks.len());
//! ```

mod parser;
mod validator;

pub use contracts::DispatcherConfig;
pub use parser::ConfigFormat;

use contracts::LogError;
use std::path::Path;

/// Loads, validates and serializes [`DispatcherConfig`]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read and validate a config file; the extension selects TOML or JSON.
    pub fn load_from_path(path: &Path) -> Result<DispatcherConfig, LogError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Parse `content`, then run semantic validation on the result.
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<DispatcherConfig, LogError> {
        let config = format.parse(content)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Validate a programmatically built configuration.
    pub fn validate(config: &DispatcherConfig) -> Result<(), LogError> {
        validator::validate(config)
    }

    pub fn to_toml(config: &DispatcherConfig) -> Result<String, LogError> {
        ConfigFormat::Toml.render(config)
    }

    pub fn to_json(config: &DispatcherConfig) -> Result<String, LogError> {
        ConfigFormat::Json.render(config)
    }
}
