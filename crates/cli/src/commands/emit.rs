//! `emit` command implementation.

use std::io::{self, BufRead};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::Severity;
use dispatcher::{Dispatcher, DispatcherBuilder, MetricsSnapshot};
use observability::{record_sink_metrics, DispatchAggregator};
use tracing::{debug, info, warn};

use super::load_config;
use crate::cli::EmitArgs;
use crate::error::CliError;

/// Statistics from an emit run
#[derive(Debug, Clone, Default)]
pub struct EmitStats {
    /// Wall time spent dispatching
    pub duration: Duration,

    /// Number of dispatching threads
    pub threads: usize,

    /// Per-sink counters, in dispatch order
    pub sinks: Vec<(String, MetricsSnapshot)>,

    /// Dispatch calls, failures and latency
    pub dispatch: DispatchAggregator,
}

impl EmitStats {
    /// Dispatch calls per second
    pub fn rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.dispatch.total_events as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary to stderr (stdout belongs to console sinks)
    pub fn print_summary(&self) {
        eprintln!("\n📊 Overview");
        eprintln!("   ├─ Duration: {:.3}s", self.duration.as_secs_f64());
        eprintln!("   ├─ Threads: {}", self.threads);
        eprintln!("   └─ Rate: {:.0} msg/s", self.rate());

        eprintln!("\n📤 Sinks ({})", self.sinks.len());
        for (i, (name, snapshot)) in self.sinks.iter().enumerate() {
            let prefix = if i == self.sinks.len() - 1 { "└─" } else { "├─" };
            eprintln!(
                "   {} {}: written={} filtered={} failed={}",
                prefix, name, snapshot.written, snapshot.filtered, snapshot.failed
            );
        }

        eprintln!("\n{}", self.dispatch.summary());
    }
}

/// Execute the `emit` command
pub fn run_emit(args: &EmitArgs, quiet: bool) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let messages = if args.messages.is_empty() {
        read_stdin_lines().context("Failed to read messages from stdin")?
    } else {
        args.messages.clone()
    };

    let dispatcher = DispatcherBuilder::new(config)
        .build()
        .map_err(CliError::from)
        .context("Failed to build dispatcher")?;
    info!(
        sinks = dispatcher.len(),
        messages = messages.len(),
        threads = args.threads,
        repeat = args.repeat,
        severity = %args.severity,
        "Dispatcher ready"
    );

    let stats = emit(&dispatcher, &messages, args)?;

    info!(
        events = stats.dispatch.total_events,
        failed = stats.dispatch.failed_events,
        duration_secs = stats.duration.as_secs_f64(),
        "Emit completed"
    );
    if !quiet {
        stats.print_summary();
    }

    if stats.dispatch.failed_events > 0 {
        anyhow::bail!(
            "{} of {} dispatches reported a sink failure",
            stats.dispatch.failed_events,
            stats.dispatch.total_events
        );
    }
    Ok(())
}

/// Dispatch every message `repeat` times from `threads` threads, then flush,
/// publish sink metrics and close all sinks
pub fn emit(dispatcher: &Dispatcher, messages: &[String], args: &EmitArgs) -> Result<EmitStats> {
    let threads = usize::from(args.threads.max(1));
    let start = Instant::now();

    let dispatch = if threads == 1 {
        emit_batch(dispatcher, messages, args.severity, args.repeat)
    } else {
        thread::scope(|scope| -> Result<DispatchAggregator> {
            let mut handles = Vec::with_capacity(threads);
            for i in 0..threads {
                let handle = thread::Builder::new()
                    .name(format!("emit-{i}"))
                    .spawn_scoped(scope, move || {
                        emit_batch(dispatcher, messages, args.severity, args.repeat)
                    })
                    .context("Failed to spawn emit thread")?;
                handles.push(handle);
            }

            let mut total = DispatchAggregator::new();
            for handle in handles {
                let part = handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("emit thread panicked"))?;
                total.merge(&part);
            }
            Ok(total)
        })?
    };
    let duration = start.elapsed();

    if let Err(e) = dispatcher.flush_all() {
        warn!(error = %e, "Flush failed");
    }
    let sinks = dispatcher.sink_metrics();
    for (name, snapshot) in &sinks {
        record_sink_metrics(name, snapshot);
    }
    dispatcher
        .close_all()
        .map_err(CliError::from)
        .context("Failed to close sinks")?;

    Ok(EmitStats {
        duration,
        threads,
        sinks,
        dispatch,
    })
}

fn emit_batch(
    dispatcher: &Dispatcher,
    messages: &[String],
    severity: Severity,
    repeat: u32,
) -> DispatchAggregator {
    let mut aggregator = DispatchAggregator::new();
    for round in 0..repeat {
        for message in messages {
            let started = Instant::now();
            let result = dispatcher.log(message, severity);
            aggregator.update(severity, result.is_ok(), started.elapsed());
            if let Err(e) = result {
                debug!(round, error = %e, "Dispatch reported a sink failure");
            }
        }
    }
    aggregator
}

fn read_stdin_lines() -> io::Result<Vec<String>> {
    io::stdin().lock().lines().collect()
}
