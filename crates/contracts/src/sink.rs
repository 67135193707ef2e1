//! EventSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{LogError, LogEvent, RenderFlags, Severity};

/// Severity-filtered renderer bound to one backing target
///
/// All sink implementations must implement this trait.
pub trait EventSink: Send {
    /// Sink name, unique within one dispatcher
    fn name(&self) -> &str;

    /// Least important severity this sink still renders
    fn threshold(&self) -> Severity;

    fn flags(&self) -> RenderFlags;

    /// Whether a target is bound and not yet released
    fn is_ready(&self) -> bool;

    /// Render and write one event.
    ///
    /// Returns `Ok(false)` when the event was filtered out by the threshold.
    ///
    /// # Errors
    /// `LogError::NotReady` when no target is bound, or the write error
    fn render(&mut self, event: &LogEvent) -> Result<bool, LogError>;

    /// Flush the target without closing it
    fn flush(&mut self) -> Result<(), LogError>;

    /// Flush and release the target. Closing a closed sink is a no-op.
    fn close(&mut self) -> Result<(), LogError>;

    /// Whether this sink wants caller info resolved for each event
    fn wants_caller_info(&self) -> bool {
        self.flags().caller_info
    }
}
