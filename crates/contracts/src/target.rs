//! LogTarget trait - where a sink's rendered lines end up

use std::io;

/// Writable backing target owned by exactly one sink
pub trait LogTarget: Send {
    /// Short description used in diagnostics (`stdout`, a file path, ...)
    fn describe(&self) -> String;

    /// Write one fully rendered line
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    /// Push buffered output to the underlying medium
    fn flush(&mut self) -> io::Result<()>;

    /// Flush and release the underlying resource.
    ///
    /// Called at most once; the owning sink drops the target afterwards.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}
