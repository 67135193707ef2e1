//! Sink - severity filter + line formatting pipeline over one `LogTarget`

use std::fmt;
use std::sync::Arc;

use contracts::{
    ColorMapping, ConsoleStream, EventSink, LogError, LogEvent, LogTarget, RenderFlags, Severity,
    SinkConfig, TimestampWidths, DEFAULT_CALLER_WIDTH,
};
use tracing::{debug, instrument, warn};

use crate::format::{
    rich_text_open, severity_prefix, thread_tag, CallerFormat, TimestampFormat, RICH_TEXT_CLOSE,
};
use crate::palette::Palette;
use crate::targets::{
    open_target, ConsoleTarget, FileTarget, FileTargetConfig, MemoryBuffer, MemoryTarget,
};

/// Lifecycle of a sink's target binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// No target bound yet
    Created,
    /// Target bound and writable
    Ready,
    /// Target released; terminal
    Closed,
}

/// Builder for [`Sink`]
pub struct SinkBuilder {
    name: String,
    threshold: Severity,
    flags: RenderFlags,
    colors: Option<Arc<dyn ColorMapping>>,
    timestamp: TimestampWidths,
    caller_width: usize,
}

impl SinkBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threshold: Severity::default(),
            flags: RenderFlags::NONE,
            colors: None,
            timestamp: TimestampWidths::default(),
            caller_width: DEFAULT_CALLER_WIDTH,
        }
    }

    pub fn threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Color mapping for rich text; defaults to [`Palette::standard`]
    pub fn colors(mut self, colors: Arc<dyn ColorMapping>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn timestamp_widths(mut self, widths: TimestampWidths) -> Self {
        self.timestamp = widths;
        self
    }

    pub fn caller_width(mut self, width: usize) -> Self {
        self.caller_width = width;
        self
    }

    /// Build a sink with no target (`Created`); bind one later with
    /// [`Sink::attach`].
    ///
    /// # Errors
    /// `LogError::ConfigValidation` for a blank name or an out-of-range width
    pub fn build(self) -> Result<Sink, LogError> {
        if self.name.trim().is_empty() {
            return Err(LogError::config_validation(
                "name",
                "sink name cannot be empty",
            ));
        }
        let timestamp = TimestampFormat::new(self.timestamp)?;
        let caller = CallerFormat::new(self.caller_width)?;
        let colors = self
            .colors
            .unwrap_or_else(|| Arc::new(Palette::standard()));

        Ok(Sink {
            name: self.name,
            threshold: self.threshold,
            flags: self.flags,
            colors,
            timestamp,
            caller,
            target: None,
            state: SinkState::Created,
        })
    }

    /// Build a `Ready` sink bound to `target`
    pub fn target(self, target: Box<dyn LogTarget>) -> Result<Sink, LogError> {
        let mut sink = self.build()?;
        sink.attach(target)?;
        Ok(sink)
    }

    /// Build a sink writing to stdout or stderr
    pub fn console(self, stream: ConsoleStream) -> Result<Sink, LogError> {
        self.target(Box::new(ConsoleTarget::new(stream)))
    }

    /// Build a sink writing to a file; sets `backed_by_file`
    pub fn file(mut self, config: FileTargetConfig) -> Result<Sink, LogError> {
        self.flags = self.flags.with_backed_by_file();
        let mut sink = self.build()?;
        sink.attach(Box::new(FileTarget::open(config)?))?;
        Ok(sink)
    }

    /// Build a sink writing to an in-memory buffer, returning a read handle
    pub fn memory(self, capacity: Option<usize>) -> Result<(Sink, MemoryBuffer), LogError> {
        let mut sink = self.build()?;
        let target = MemoryTarget::new(capacity)?;
        let buffer = target.buffer();
        sink.attach(Box::new(target))?;
        Ok((sink, buffer))
    }

    /// Build a sink from configuration. `colors` is used unless the config
    /// overrides colors, in which case `base` with the overrides applied is.
    pub fn from_config(
        config: &SinkConfig,
        colors: Arc<dyn ColorMapping>,
        base: &Palette,
    ) -> Result<(Sink, Option<MemoryBuffer>), LogError> {
        config.validate()?;
        let colors: Arc<dyn ColorMapping> = if config.colors.is_empty() {
            colors
        } else {
            Arc::new(base.with_overrides(&config.colors))
        };
        let mut flags = config.flags;
        if config.target.kind() == "file" {
            flags = flags.with_backed_by_file();
        }
        let mut sink = SinkBuilder::new(config.name.clone())
            .threshold(config.threshold)
            .flags(flags)
            .colors(colors)
            .timestamp_widths(config.timestamp)
            .caller_width(config.caller_width)
            .build()?;
        let opened = open_target(&config.target)?;
        sink.attach(opened.target)?;
        Ok((sink, opened.buffer))
    }
}

/// A severity-filtered renderer bound to one backing target
pub struct Sink {
    name: String,
    threshold: Severity,
    flags: RenderFlags,
    colors: Arc<dyn ColorMapping>,
    timestamp: TimestampFormat,
    caller: CallerFormat,
    target: Option<Box<dyn LogTarget>>,
    state: SinkState,
}

impl Sink {
    pub fn builder(name: impl Into<String>) -> SinkBuilder {
        SinkBuilder::new(name)
    }

    pub fn state(&self) -> SinkState {
        self.state
    }

    /// Description of the bound target, if any
    pub fn target_description(&self) -> Option<String> {
        self.target.as_ref().map(|t| t.describe())
    }

    /// Bind a target to a `Created` sink
    ///
    /// # Errors
    /// `LogError::InvalidState` when the sink is already `Ready` or `Closed`
    #[instrument(name = "sink_attach", skip(self, target), fields(sink = %self.name))]
    pub fn attach(&mut self, target: Box<dyn LogTarget>) -> Result<(), LogError> {
        match self.state {
            SinkState::Created => {
                debug!(sink = %self.name, target = %target.describe(), "Sink attached");
                self.target = Some(target);
                self.state = SinkState::Ready;
                Ok(())
            }
            SinkState::Ready => Err(LogError::InvalidState {
                sink: self.name.clone(),
                message: "a target is already bound".to_string(),
            }),
            SinkState::Closed => Err(LogError::InvalidState {
                sink: self.name.clone(),
                message: "sink is closed".to_string(),
            }),
        }
    }

    /// Render one event into a complete line, header and trailer included.
    ///
    /// Does not filter by severity.
    pub fn format_line(&self, event: &LogEvent) -> String {
        let mut line = String::with_capacity(event.message.len() + 128);

        if self.flags.rich_text {
            line.push_str(&rich_text_open(&*self.colors, event.severity));
        }
        if self.flags.timestamp {
            if let Some(ts) = self.timestamp.encode(event.elapsed) {
                line.push_str(&ts);
            }
        }
        if !event.is_creator_thread || self.flags.thread_info {
            line.push_str(&thread_tag(&event.thread_label));
        }
        if self.flags.caller_info {
            let with_line = self.threshold.is_verbose();
            line.push_str(&self.caller.encode(event.call_site.as_ref(), with_line));
        }
        line.push_str(&severity_prefix(event.severity));
        line.push_str(&event.message);

        if self.flags.rich_text {
            line.push_str(RICH_TEXT_CLOSE);
        }
        line.push('\n');
        line
    }

    fn not_ready(&self) -> LogError {
        LogError::not_ready(&self.name)
    }
}

impl EventSink for Sink {
    fn name(&self) -> &str {
        &self.name
    }

    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn flags(&self) -> RenderFlags {
        self.flags
    }

    fn is_ready(&self) -> bool {
        self.state == SinkState::Ready
    }

    fn render(&mut self, event: &LogEvent) -> Result<bool, LogError> {
        if self.target.is_none() {
            return Err(self.not_ready());
        }
        if !event.severity.passes(self.threshold) {
            return Ok(false);
        }
        let line = self.format_line(event);
        let name = &self.name;
        match self.target.as_mut() {
            Some(target) => target
                .write_str(&line)
                .map(|()| true)
                .map_err(|e| LogError::sink_write(name, e.to_string())),
            None => Err(LogError::not_ready(name)),
        }
    }

    fn flush(&mut self) -> Result<(), LogError> {
        let name = &self.name;
        match self.target.as_mut() {
            Some(target) => target
                .flush()
                .map_err(|e| LogError::sink_write(name, e.to_string())),
            None => Err(LogError::not_ready(name)),
        }
    }

    #[instrument(name = "sink_close", skip(self), fields(sink = %self.name))]
    fn close(&mut self) -> Result<(), LogError> {
        self.state = SinkState::Closed;
        let Some(mut target) = self.target.take() else {
            return Ok(());
        };
        let flushed = target.flush();
        let closed = target.close();
        debug!(sink = %self.name, target = %target.describe(), "Sink closed");
        flushed
            .and(closed)
            .map_err(|e| LogError::sink_write(&self.name, e.to_string()))
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        if self.target.is_some() {
            if let Err(e) = EventSink::close(self) {
                warn!(sink = %self.name, error = %e, "Close failed while dropping sink");
            }
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("flags", &self.flags)
            .field("state", &self.state)
            .field("target", &self.target_description())
            .finish()
    }
}
