//! Command-line surface of the `logdispatch` binary.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::Severity;
use std::path::PathBuf;

/// logdispatch - fan log messages out to configured sinks
#[derive(Parser, Debug)]
#[command(
    name = "logdispatch",
    author,
    version,
    about = "Severity-filtered log dispatch to console, file and memory sinks",
    long_about = "Loads a dispatcher configuration (TOML or JSON), builds its sinks and \n\
                  dispatches messages to every sink in registration order.\n\n\
                  Diagnostics of the tool itself go to stderr; console sinks own stdout."
)]
pub struct Cli {
    /// Diagnostic verbosity: -v info, -vv debug, -vvv trace (default warn)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LOGDISPATCH_VERBOSE")]
    pub verbose: u8,

    /// Only report errors of the tool itself
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Format of the tool's own diagnostics
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "LOGDISPATCH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration file without dispatching anything
    Validate(ValidateArgs),

    /// Display the configured sinks
    Info(InfoArgs),

    /// Build the dispatcher and dispatch messages through it
    Emit(EmitArgs),
}

/// `logdispatch validate`
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Dispatcher configuration (TOML or JSON)
    #[arg(short, long, default_value = "logdispatch.toml", env = "LOGDISPATCH_CONFIG")]
    pub config: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// `logdispatch info`
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Dispatcher configuration (TOML or JSON)
    #[arg(short, long, default_value = "logdispatch.toml", env = "LOGDISPATCH_CONFIG")]
    pub config: PathBuf,

    /// Print the sink table as JSON
    #[arg(long)]
    pub json: bool,
}

/// `logdispatch emit`
#[derive(Parser, Debug, Clone)]
pub struct EmitArgs {
    /// Dispatcher configuration (TOML or JSON)
    #[arg(short, long, default_value = "logdispatch.toml", env = "LOGDISPATCH_CONFIG")]
    pub config: PathBuf,

    /// Severity of every emitted message (name, letter or 0..=4)
    #[arg(short, long, default_value = "info", env = "LOGDISPATCH_SEVERITY")]
    pub severity: Severity,

    /// Number of threads dispatching concurrently
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: u16,

    /// How many times each thread dispatches the message list
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,

    /// Messages to dispatch (read from stdin, one per line, when omitted)
    pub messages: Vec<String>,
}

/// Diagnostic output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    Json,
    /// Multi-line, for reading in a terminal
    Pretty,
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_emit() {
        let cli = Cli::try_parse_from([
            "logdispatch",
            "-v",
            "emit",
            "-c",
            "dispatch.json",
            "-s",
            "W",
            "--threads",
            "4",
            "--repeat",
            "10",
            "disk almost full",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Emit(args) => {
                assert_eq!(args.config, PathBuf::from("dispatch.json"));
                assert_eq!(args.severity, Severity::Warning);
                assert_eq!(args.threads, 4);
                assert_eq!(args.repeat, 10);
                assert_eq!(args.messages, vec!["disk almost full"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_severity_and_zero_threads() {
        assert!(Cli::try_parse_from(["logdispatch", "emit", "-s", "loud"]).is_err());
        assert!(Cli::try_parse_from(["logdispatch", "emit", "--threads", "0"]).is_err());
    }
}
