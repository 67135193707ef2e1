//! `logdispatch validate`: load a config and report problems without opening any sink.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use contracts::{DispatcherConfig, TargetConfig};
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::ValidateArgs;

/// Outcome of `logdispatch validate`, printed as text or JSON
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Report {
    Valid {
        path: String,
        version: String,
        /// Sink names in dispatch order
        sinks: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    Invalid {
        path: String,
        error: String,
    },
}

impl Report {
    fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    fn print(&self) {
        match self {
            Self::Valid {
                path,
                version,
                sinks,
                warnings,
            } => {
                println!("✓ {path} is valid (config {version})");
                println!("  {} sink(s) in dispatch order: {}", sinks.len(), sinks.join(", "));
                for warning in warnings {
                    println!("  ⚠ {warning}");
                }
            }
            Self::Invalid { path, error } => {
                println!("✗ {path} is invalid");
                println!("  {error}");
            }
        }
    }
}

pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let report = check(&args.config);
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{json}");
    } else {
        report.print();
    }

    anyhow::ensure!(report.is_valid(), "{} failed validation", args.config.display());
    Ok(())
}

fn check(path: &Path) -> Report {
    let display = path.display().to_string();
    match load_config(path) {
        Ok(config) => Report::Valid {
            path: display,
            version: format!("{:?}", config.version),
            sinks: config.sinks.iter().map(|s| s.name.clone()).collect(),
            warnings: collect_warnings(&config),
        },
        Err(e) => Report::Invalid {
            path: display,
            error: e.to_string(),
        },
    }
}

/// Non-fatal problems: the config loads, but probably not as intended
fn collect_warnings(config: &DispatcherConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.sinks.is_empty() {
        warnings.push("No sinks configured - every message will be dropped".to_string());
    }

    let mut file_owners: HashMap<&std::path::Path, &str> = HashMap::new();
    for sink in &config.sinks {
        if sink.flags.caller_info && !sink.threshold.is_verbose() {
            warnings.push(format!(
                "Sink '{}' shows caller info without line numbers (threshold {} is below debug)",
                sink.name, sink.threshold
            ));
        }
        match &sink.target {
            TargetConfig::Console { .. } if sink.flags.rich_text => {
                warnings.push(format!(
                    "Sink '{}' writes rich-text <span> markup to the console",
                    sink.name
                ));
            }
            TargetConfig::File { path, .. } => {
                if let Some(owner) = file_owners.insert(path.as_path(), &sink.name) {
                    warnings.push(format!(
                        "Sinks '{}' and '{}' write to the same file {}",
                        owner,
                        sink.name,
                        path.display()
                    ));
                }
            }
            _ => {}
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{RenderFlags, Severity, SinkConfig};
    use std::path::PathBuf;

    fn file_sink(name: &str, path: &str) -> SinkConfig {
        SinkConfig::new(
            name,
            TargetConfig::File {
                path: PathBuf::from(path),
                append: true,
                buffer_size: 8192,
            },
        )
    }

    #[test]
    fn test_warnings() {
        assert_eq!(collect_warnings(&DispatcherConfig::default()).len(), 1);

        let mut console = SinkConfig::new(
            "console",
            TargetConfig::Console {
                stream: Default::default(),
            },
        );
        console.flags = RenderFlags::NONE.with_rich_text().with_caller_info();
        console.threshold = Severity::Info;

        let config = DispatcherConfig {
            version: Default::default(),
            sinks: vec![console, file_sink("a", "app.log"), file_sink("b", "app.log")],
        };
        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 3, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.contains("same file")));
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let report = check(Path::new("/nonexistent/logdispatch.toml"));
        assert!(!report.is_valid());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "invalid");
        assert!(json["error"].as_str().unwrap().contains("not found"));
    }
}
