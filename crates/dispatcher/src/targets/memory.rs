//! MemoryTarget - keeps rendered lines in a shared in-memory buffer

use std::io;
use std::sync::Arc;

use contracts::{LogError, LogTarget};
use parking_lot::Mutex;

/// Cloneable read handle onto a memory target's contents.
///
/// Stays readable after the target itself has been closed.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    inner: Arc<Mutex<String>>,
}

impl MemoryBuffer {
    /// Copy of the current contents
    pub fn contents(&self) -> String {
        self.inner.lock().clone()
    }

    /// Current contents split into lines
    pub fn lines(&self) -> Vec<String> {
        self.inner.lock().lines().map(str::to_string).collect()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Take the contents, leaving the buffer empty
    pub fn drain(&self) -> String {
        std::mem::take(&mut *self.inner.lock())
    }
}

/// Target that appends to a [`MemoryBuffer`], optionally bounded
#[derive(Debug)]
pub struct MemoryTarget {
    buffer: MemoryBuffer,
    capacity: Option<usize>,
    closed: bool,
}

impl MemoryTarget {
    /// # Errors
    /// `LogError::ConfigValidation` for a zero capacity
    pub fn new(capacity: Option<usize>) -> Result<Self, LogError> {
        if capacity == Some(0) {
            return Err(LogError::config_validation(
                "target.capacity",
                "capacity must be > 0",
            ));
        }
        Ok(Self {
            buffer: MemoryBuffer::default(),
            capacity,
            closed: false,
        })
    }

    /// Unbounded buffer
    pub fn unbounded() -> Self {
        Self {
            buffer: MemoryBuffer::default(),
            capacity: None,
            closed: false,
        }
    }

    /// Read handle sharing this target's storage
    pub fn buffer(&self) -> MemoryBuffer {
        self.buffer.clone()
    }
}

/// Drop whole leading lines until `text` fits in `capacity` bytes.
/// A single line longer than `capacity` keeps only its tail.
fn trim_to(text: &mut String, capacity: usize) {
    if text.len() <= capacity {
        return;
    }
    let excess = text.len() - capacity;
    let bytes = text.as_bytes();
    let line_start = if bytes[excess - 1] == b'\n' {
        Some(excess)
    } else {
        bytes[excess..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|offset| excess + offset + 1)
            .filter(|&cut| cut < bytes.len())
    };
    let cut = line_start.unwrap_or_else(|| {
        let mut cut = excess;
        while !text.is_char_boundary(cut) {
            cut += 1;
        }
        cut
    });
    text.drain(..cut);
}

impl LogTarget for MemoryTarget {
    fn describe(&self) -> String {
        match self.capacity {
            Some(cap) => format!("memory({cap} bytes)"),
            None => "memory".to_string(),
        }
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "memory target closed",
            ));
        }
        let mut buf = self.buffer.inner.lock();
        buf.push_str(text);
        if let Some(capacity) = self.capacity {
            trim_to(&mut buf, capacity);
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_target_appends() {
        let mut target = MemoryTarget::unbounded();
        let buffer = target.buffer();
        target.write_str("[I] a\n").unwrap();
        target.write_str("[W] b\n").unwrap();
        assert_eq!(buffer.contents(), "[I] a\n[W] b\n");
        assert_eq!(buffer.lines(), vec!["[I] a", "[W] b"]);
    }

    #[test]
    fn test_capacity_trims_oldest_lines() {
        let mut target = MemoryTarget::new(Some(12)).unwrap();
        let buffer = target.buffer();
        target.write_str("[I] one\n").unwrap();
        target.write_str("[I] two\n").unwrap();
        assert_eq!(buffer.contents(), "[I] two\n");
        target.write_str("[I] 3\n").unwrap();
        assert_eq!(buffer.contents(), "[I] 3\n");
        assert!(buffer.len() <= 12);
    }

    #[test]
    fn test_oversized_line_keeps_tail() {
        let mut target = MemoryTarget::new(Some(4)).unwrap();
        let buffer = target.buffer();
        target.write_str("abcdefgh\n").unwrap();
        assert_eq!(buffer.contents(), "fgh\n");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(MemoryTarget::new(Some(0)).is_err());
    }

    #[test]
    fn test_closed_target_rejects_writes_but_stays_readable() {
        let mut target = MemoryTarget::unbounded();
        let buffer = target.buffer();
        target.write_str("kept\n").unwrap();
        target.close().unwrap();
        assert!(target.write_str("late\n").is_err());
        assert_eq!(buffer.drain(), "kept\n");
        assert!(buffer.is_empty());
    }
}
