//! # Dispatcher
//!
//! 日志分发模块。
//!
//! 负责：
//! - 维护 sink 注册表（名称唯一、保持注册顺序）
//! - 同步 fan-out 到所有 sinks，按严重级别过滤
//! - 格式化行头：富文本、时间戳、线程标签、调用位置
//! - 统一的 flush / close 生命周期

pub mod callsite;
pub mod dispatcher;
pub mod error;
pub mod format;
mod macros;
pub mod metrics;
pub mod palette;
pub mod sink;
pub mod targets;
pub mod thread;

pub use callsite::CallerResolver;
pub use contracts::{
    CallSite, Color, ColorMapping, DispatcherConfig, EventSink, LogError, LogEvent, LogTarget,
    RenderFlags, Severity, SinkConfig,
};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder, NO_ERROR};
pub use error::DispatcherError;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use palette::Palette;
pub use sink::{Sink, SinkBuilder, SinkState};
pub use targets::{
    ConsoleTarget, FileTarget, FileTargetConfig, MemoryBuffer, MemoryTarget,
};
