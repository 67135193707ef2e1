//! `logdispatch info`: describe each configured sink.

use anyhow::{Context, Result};
use contracts::{DispatcherConfig, SinkConfig, TargetConfig};
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::InfoArgs;

#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    threshold: String,
    flags: String,
    target: String,
    caller_width: usize,
    timestamp_widths: [usize; 3],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    color_overrides: Vec<String>,
}

pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Describing sinks");

    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&build_config_info(&config))
            .context("Failed to encode sink table")?;
        println!("{json}");
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn describe_target(target: &TargetConfig) -> String {
    match target {
        TargetConfig::Console { stream } => format!("console ({stream:?})").to_lowercase(),
        TargetConfig::File {
            path,
            append,
            buffer_size,
        } => format!(
            "file {} ({}, {} byte buffer)",
            path.display(),
            if *append { "append" } else { "replace" },
            buffer_size
        ),
        TargetConfig::Memory { capacity: Some(cap) } => format!("memory ({cap} bytes)"),
        TargetConfig::Memory { capacity: None } => "memory (unbounded)".to_string(),
    }
}

fn sink_info(sink: &SinkConfig) -> SinkInfo {
    SinkInfo {
        name: sink.name.clone(),
        threshold: sink.threshold.to_string(),
        flags: sink.flags.to_string(),
        target: describe_target(&sink.target),
        caller_width: sink.caller_width,
        timestamp_widths: [
            sink.timestamp.days,
            sink.timestamp.seconds,
            sink.timestamp.millis,
        ],
        color_overrides: sink
            .colors
            .iter()
            .map(|(severity, colors)| {
                format!(
                    "{severity}: fg={} bg={}",
                    colors.foreground.as_deref().unwrap_or("-"),
                    colors.background.as_deref().unwrap_or("-")
                )
            })
            .collect(),
    }
}

fn build_config_info(config: &DispatcherConfig) -> ConfigInfo {
    ConfigInfo {
        version: format!("{:?}", config.version),
        sinks: config.sinks.iter().map(sink_info).collect(),
    }
}

fn print_config_info(config: &DispatcherConfig) {
    println!("logdispatch config {:?}", config.version);
    println!("Sinks ({}, in dispatch order)", config.sinks.len());
    for (i, sink) in config.sinks.iter().enumerate() {
        let info = sink_info(sink);
        let (prefix, child) = if i + 1 == config.sinks.len() {
            ("└─", "   ")
        } else {
            ("├─", "│  ")
        };

        println!("   {} {} [{}]", prefix, info.name, info.threshold);
        println!("   {}  ├─ Target: {}", child, info.target);
        println!("   {}  ├─ Flags: {}", child, info.flags);
        println!(
            "   {}  ├─ Timestamp widths: {}/{}/{}",
            child, info.timestamp_widths[0], info.timestamp_widths[1], info.timestamp_widths[2]
        );
        if info.color_overrides.is_empty() {
            println!("   {}  └─ Caller width: {}", child, info.caller_width);
        } else {
            println!("   {}  ├─ Caller width: {}", child, info.caller_width);
            println!("   {}  └─ Colors: {}", child, info.color_overrides.join(", "));
        }
    }

    println!();
}
