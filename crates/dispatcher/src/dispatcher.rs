//! Dispatcher - sink registry and synchronous fan-out of log events

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Write as _;
use std::panic::Location;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use contracts::{
    CallSite, ColorMapping, DispatcherConfig, EventSink, LogEvent, Severity, SinkConfig,
};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::callsite::CallerResolver;
use crate::error::DispatcherError;
use crate::format::UNKNOWN_CALLER;
use crate::metrics::{MetricsSnapshot, SinkMetrics};
use crate::palette::Palette;
use crate::sink::SinkBuilder;
use crate::targets::MemoryBuffer;
use crate::thread::current_thread_label;

/// Description used by `log_exception(None)`
pub const NO_ERROR: &str = "<no error>";

struct SinkEntry {
    sink: Box<dyn EventSink>,
    metrics: SinkMetrics,
}

/// Where the call site of an event comes from
enum SiteSource {
    /// Captured by the caller (macros, `log_at`)
    Explicit(Option<CallSite>),
    /// Resolved by walking the stack; file and line taken from the location
    Walk(&'static Location<'static>),
}

/// Builder for creating a Dispatcher from configuration
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    palette: Palette,
    resolver: CallerResolver,
}

impl DispatcherBuilder {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            palette: Palette::standard(),
            resolver: CallerResolver::default(),
        }
    }

    /// Base palette shared by every sink; per-sink overrides apply on top
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn resolver(mut self, resolver: CallerResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Build the dispatcher and register every configured sink
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        self.build_with_buffers().map(|(dispatcher, _)| dispatcher)
    }

    /// Like [`build`](Self::build), also returning the read handles of
    /// memory-backed sinks keyed by sink name
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(sink_count = self.config.sinks.len())
    )]
    pub fn build_with_buffers(
        self,
    ) -> Result<(Dispatcher, HashMap<String, MemoryBuffer>), DispatcherError> {
        let dispatcher = Dispatcher::with_resolver(self.resolver);
        let shared: Arc<dyn ColorMapping> = Arc::new(self.palette.clone());
        let mut buffers = HashMap::new();

        for sink_config in &self.config.sinks {
            let (sink, buffer) = create_sink(sink_config, &shared, &self.palette)?;
            dispatcher.add_sink(sink)?;
            if let Some(buffer) = buffer {
                buffers.insert(sink_config.name.clone(), buffer);
            }
        }

        info!(sinks = dispatcher.len(), "Dispatcher built");
        Ok((dispatcher, buffers))
    }
}

/// Create one sink from configuration
#[instrument(
    name = "dispatcher_create_sink",
    skip(config, shared, palette),
    fields(sink = %config.name, target = config.target.kind())
)]
fn create_sink(
    config: &SinkConfig,
    shared: &Arc<dyn ColorMapping>,
    palette: &Palette,
) -> Result<(crate::sink::Sink, Option<MemoryBuffer>), DispatcherError> {
    SinkBuilder::from_config(config, Arc::clone(shared), palette)
        .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))
}

/// Registry of sinks, fanning every event out to all of them in
/// registration order.
///
/// Registration, removal and dispatch share one lock, so a dispatch never
/// interleaves with a registry change and each sink sees whole lines.
/// Share between threads with `Arc`.
pub struct Dispatcher {
    registry: Mutex<Vec<SinkEntry>>,
    created_at: Instant,
    creator: ThreadId,
    resolver: CallerResolver,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Empty dispatcher; the calling thread becomes the creator thread
    pub fn new() -> Self {
        Self::with_resolver(CallerResolver::default())
    }

    pub fn with_resolver(resolver: CallerResolver) -> Self {
        Self {
            registry: Mutex::new(Vec::new()),
            created_at: Instant::now(),
            creator: thread::current().id(),
            resolver,
        }
    }

    pub fn builder(config: DispatcherConfig) -> DispatcherBuilder {
        DispatcherBuilder::new(config)
    }

    /// Time since the dispatcher was created
    pub fn elapsed(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn len(&self) -> usize {
        self.registry.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.lock().is_empty()
    }

    /// Register a sink
    ///
    /// # Errors
    /// `InvalidSinkName` for a blank name, `DuplicateSink` when the name is
    /// taken. The registry is unchanged on error.
    pub fn add_sink<S: EventSink + 'static>(&self, sink: S) -> Result<(), DispatcherError> {
        self.add_boxed_sink(Box::new(sink))
    }

    #[instrument(name = "dispatcher_add_sink", skip(self, sink), fields(sink = %sink.name()))]
    pub fn add_boxed_sink(&self, sink: Box<dyn EventSink>) -> Result<(), DispatcherError> {
        if sink.name().trim().is_empty() {
            return Err(DispatcherError::InvalidSinkName);
        }
        let mut registry = self.registry.lock();
        if registry.iter().any(|e| e.sink.name() == sink.name()) {
            return Err(DispatcherError::DuplicateSink {
                name: sink.name().to_string(),
            });
        }
        debug!(
            threshold = %sink.threshold(),
            flags = %sink.flags(),
            "Sink registered"
        );
        registry.push(SinkEntry {
            sink,
            metrics: SinkMetrics::new(),
        });
        Ok(())
    }

    /// Unregister a sink and close it
    ///
    /// # Errors
    /// `SinkNotFound` when no sink has that name; a close failure is returned
    /// after the sink has left the registry.
    #[instrument(name = "dispatcher_remove_sink", skip(self))]
    pub fn remove_sink(&self, name: &str) -> Result<(), DispatcherError> {
        let mut registry = self.registry.lock();
        let index = registry
            .iter()
            .position(|e| e.sink.name() == name)
            .ok_or_else(|| DispatcherError::SinkNotFound {
                name: name.to_string(),
            })?;
        let mut entry = registry.remove(index);
        debug!(remaining = registry.len(), "Sink unregistered");
        entry.sink.close()?;
        Ok(())
    }

    /// Dispatch `message` at `severity` to every sink.
    ///
    /// Blank messages are dropped. When a sink renders caller info, the call
    /// site is found by walking the stack.
    ///
    /// # Errors
    /// The first sink failure; the remaining sinks are still attempted.
    #[track_caller]
    pub fn log(&self, message: impl AsRef<str>, severity: Severity) -> Result<(), DispatcherError> {
        self.dispatch(
            message.as_ref(),
            severity,
            SiteSource::Walk(Location::caller()),
        )
    }

    /// Dispatch with an explicit call site
    pub fn log_at(
        &self,
        message: impl AsRef<str>,
        severity: Severity,
        call_site: Option<CallSite>,
    ) -> Result<(), DispatcherError> {
        self.dispatch(message.as_ref(), severity, SiteSource::Explicit(call_site))
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) -> Result<(), DispatcherError> {
        self.log(message, Severity::Error)
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) -> Result<(), DispatcherError> {
        self.log(message, Severity::Warning)
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) -> Result<(), DispatcherError> {
        self.log(message, Severity::Info)
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) -> Result<(), DispatcherError> {
        self.log(message, Severity::Debug)
    }

    #[track_caller]
    pub fn trace(&self, message: impl AsRef<str>) -> Result<(), DispatcherError> {
        self.log(message, Severity::Trace)
    }

    /// Dispatch an error report at `Error`: the error, its `caused by:`
    /// chain, the resolved call site and a stack trace. `None` is reported
    /// as [`NO_ERROR`].
    #[track_caller]
    pub fn log_exception(&self, error: Option<&(dyn Error + 'static)>) -> Result<(), DispatcherError> {
        let location = Location::caller();
        let site = self
            .resolver
            .resolve(false)
            .map(|site| site.with_location(location.file(), location.line()));

        let mut message = match error {
            Some(error) => error_chain(error),
            None => NO_ERROR.to_string(),
        };
        match &site {
            Some(site) => {
                let _ = write!(message, "\nat {site}");
            }
            None => {
                let _ = write!(message, "\nat {UNKNOWN_CALLER}");
            }
        }
        let _ = write!(message, "\n{:?}", backtrace::Backtrace::new());

        self.dispatch(&message, Severity::Error, SiteSource::Explicit(site))
    }

    /// Flush every sink
    ///
    /// # Errors
    /// The first flush failure; the remaining sinks are still flushed.
    pub fn flush_all(&self) -> Result<(), DispatcherError> {
        let mut registry = self.registry.lock();
        let mut first_error = None;
        for entry in registry.iter_mut() {
            if let Err(e) = entry.sink.flush() {
                warn!(sink = %entry.sink.name(), error = %e, "Sink flush failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), |e| Err(e.into()))
    }

    /// Close every sink and empty the registry. Each sink is closed once;
    /// later dispatches are no-ops.
    ///
    /// # Errors
    /// The first close failure; every sink is still closed and removed.
    #[instrument(name = "dispatcher_close_all", skip(self))]
    pub fn close_all(&self) -> Result<(), DispatcherError> {
        let mut registry = self.registry.lock();
        let drained: Vec<SinkEntry> = registry.drain(..).collect();
        let closed = close_entries(drained);
        info!(closed = closed.0, "All sinks closed");
        closed.1.map_or(Ok(()), |e| Err(e.into()))
    }

    /// Snapshot of the registered sink names, in registration order
    pub fn list_sink_names(&self) -> Vec<String> {
        self.registry
            .lock()
            .iter()
            .map(|e| e.sink.name().to_string())
            .collect()
    }

    /// Dispatch counters per sink, in registration order
    pub fn sink_metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.registry
            .lock()
            .iter()
            .map(|e| (e.sink.name().to_string(), e.metrics.snapshot()))
            .collect()
    }

    fn dispatch(
        &self,
        message: &str,
        severity: Severity,
        site: SiteSource,
    ) -> Result<(), DispatcherError> {
        if message.trim().is_empty() {
            return Ok(());
        }

        let mut registry = self.registry.lock();
        if registry.is_empty() {
            return Ok(());
        }

        let call_site = match site {
            SiteSource::Explicit(site) => site,
            SiteSource::Walk(location) => {
                if registry.iter().any(|e| e.sink.wants_caller_info()) {
                    self.resolver
                        .resolve(false)
                        .map(|site| site.with_location(location.file(), location.line()))
                } else {
                    None
                }
            }
        };

        let event = LogEvent {
            message: message.to_string(),
            severity,
            elapsed: self.created_at.elapsed(),
            thread_label: current_thread_label(),
            is_creator_thread: thread::current().id() == self.creator,
            call_site,
        };

        let mut first_error = None;
        for entry in registry.iter_mut() {
            match entry.sink.render(&event) {
                Ok(true) => entry.metrics.inc_written(),
                Ok(false) => entry.metrics.inc_filtered(),
                Err(e) => {
                    entry.metrics.inc_failed();
                    warn!(sink = %entry.sink.name(), error = %e, "Sink render failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), |e| Err(e.into()))
    }
}

/// Close drained entries, returning how many closed cleanly and the first
/// failure
fn close_entries(entries: Vec<SinkEntry>) -> (usize, Option<contracts::LogError>) {
    let mut ok = 0;
    let mut first_error = None;
    for mut entry in entries {
        match entry.sink.close() {
            Ok(()) => ok += 1,
            Err(e) => {
                warn!(sink = %entry.sink.name(), error = %e, "Sink close failed");
                first_error.get_or_insert(e);
            }
        }
    }
    (ok, first_error)
}

/// Error description followed by one `caused by:` line per source
fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(message, "\ncaused by: {cause}");
        source = cause.source();
    }
    message
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        let remaining: Vec<SinkEntry> = self.registry.get_mut().drain(..).collect();
        if !remaining.is_empty() {
            warn!(
                sinks = remaining.len(),
                "Dispatcher dropped with sinks still registered, closing them"
            );
            close_entries(remaining);
        }
    }
}

/// Convenience function to create a dispatcher from sink configs
#[instrument(name = "dispatcher_create", skip(sink_configs))]
pub fn create_dispatcher(sink_configs: Vec<SinkConfig>) -> Result<Dispatcher, DispatcherError> {
    let config = DispatcherConfig {
        sinks: sink_configs,
        ..DispatcherConfig::default()
    };
    DispatcherBuilder::new(config).build()
}
