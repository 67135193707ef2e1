//! Target implementations
//!
//! Contains ConsoleTarget, FileTarget, and MemoryTarget.

mod console;
mod file;
mod memory;

pub use self::console::ConsoleTarget;
pub use self::file::{FileTarget, FileTargetConfig};
pub use self::memory::{MemoryBuffer, MemoryTarget};

use contracts::{LogError, LogTarget, TargetConfig};

/// A target opened from configuration
pub struct OpenedTarget {
    pub target: Box<dyn LogTarget>,
    /// Read handle when the target is an in-memory buffer
    pub buffer: Option<MemoryBuffer>,
}

/// Open the target described by `config`
pub fn open_target(config: &TargetConfig) -> Result<OpenedTarget, LogError> {
    config.validate()?;
    let opened = match config {
        TargetConfig::Console { stream } => OpenedTarget {
            target: Box::new(ConsoleTarget::new(*stream)),
            buffer: None,
        },
        TargetConfig::File {
            path,
            append,
            buffer_size,
        } => OpenedTarget {
            target: Box::new(FileTarget::open(FileTargetConfig {
                path: path.clone(),
                append: *append,
                buffer_size: *buffer_size,
            })?),
            buffer: None,
        },
        TargetConfig::Memory { capacity } => {
            let target = MemoryTarget::new(*capacity)?;
            OpenedTarget {
                buffer: Some(target.buffer()),
                target: Box::new(target),
            }
        }
    };
    Ok(opened)
}
