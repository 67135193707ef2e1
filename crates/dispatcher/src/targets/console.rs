//! ConsoleTarget - writes lines to stdout or stderr

use std::io::{self, Write};

use contracts::{ConsoleStream, LogTarget};

/// Target bound to one of the standard streams
pub struct ConsoleTarget {
    stream: ConsoleStream,
}

impl ConsoleTarget {
    pub fn new(stream: ConsoleStream) -> Self {
        Self { stream }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }
}

impl LogTarget for ConsoleTarget {
    fn describe(&self) -> String {
        match self.stream {
            ConsoleStream::Stdout => "stdout".to_string(),
            ConsoleStream::Stderr => "stderr".to_string(),
        }
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().lock().write_all(text.as_bytes()),
            ConsoleStream::Stderr => io::stderr().lock().write_all(text.as_bytes()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush(),
            ConsoleStream::Stderr => io::stderr().flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_describe() {
        assert_eq!(ConsoleTarget::stdout().describe(), "stdout");
        assert_eq!(ConsoleTarget::stderr().describe(), "stderr");
    }

    #[test]
    fn test_console_close_flushes() {
        let mut target = ConsoleTarget::stderr();
        target.write_str("").unwrap();
        assert!(target.close().is_ok());
    }
}
