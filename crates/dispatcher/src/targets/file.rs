//! FileTarget - writes lines to a file through a `BufWriter`

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use contracts::{LogTarget, DEFAULT_FILE_BUFFER};
use tracing::debug;

/// Configuration for FileTarget
#[derive(Debug, Clone)]
pub struct FileTargetConfig {
    /// Output file
    pub path: PathBuf,
    /// Append to an existing file instead of replacing it
    pub append: bool,
    /// `BufWriter` capacity in bytes
    pub buffer_size: usize,
}

impl FileTargetConfig {
    /// Replace-on-open config with the default buffer size
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append: false,
            buffer_size: DEFAULT_FILE_BUFFER,
        }
    }

    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

/// Target that writes to a file on disk
pub struct FileTarget {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileTarget {
    /// Open (create, replace or append) the configured file.
    ///
    /// Missing parent directories are created.
    pub fn open(config: FileTargetConfig) -> io::Result<Self> {
        if config.buffer_size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer_size must be > 0",
            ));
        }
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if config.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(&config.path)?;
        debug!(path = %config.path.display(), append = config.append, "FileTarget opened");

        Ok(Self {
            writer: Some(BufWriter::with_capacity(config.buffer_size, file)),
            path: config.path,
        })
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "file target closed"))
    }
}

impl LogTarget for FileTarget {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.writer()?.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => {
                writer.flush()?;
                writer.get_ref().sync_all()?;
                debug!(path = %self.path.display(), "FileTarget closed");
                Ok(())
            }
            None => Ok(()),
        }
    }
}
