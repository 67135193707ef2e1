//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace: the
//! severity model, render flags, the per-dispatch event, the target and sink
//! traits, configuration structures and the error taxonomy.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Elapsed time is measured from dispatcher creation (`std::time::Duration`)
//! - One `LogEvent` carries one elapsed-time snapshot shared by every sink

mod color;
mod config;
mod error;
mod event;
mod flags;
mod severity;
mod sink;
mod target;

pub use color::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use flags::RenderFlags;
pub use severity::Severity;
pub use sink::EventSink;
pub use target::LogTarget;
