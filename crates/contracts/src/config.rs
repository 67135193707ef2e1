//! DispatcherConfig - Config Loader 输出
//!
//! 描述分发器的完整配置：sink 列表、阈值、渲染标志、后端目标与格式宽度。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::{LogError, RenderFlags, Severity};

/// Default total width of the caller-info field
pub const DEFAULT_CALLER_WIDTH: usize = 60;
/// Valid caller-info widths
pub const CALLER_WIDTH_RANGE: RangeInclusive<usize> = 5..=70;

pub const DAY_WIDTH_RANGE: RangeInclusive<usize> = 2..=16;
pub const SECS_WIDTH_RANGE: RangeInclusive<usize> = 5..=16;
pub const MILLIS_WIDTH_RANGE: RangeInclusive<usize> = 3..=9;

/// Default `BufWriter` capacity for file targets
pub const DEFAULT_FILE_BUFFER: usize = 8 * 1024;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的分发器配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 输出路由配置 (按注册顺序)
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

/// Sink 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink 名称 (非空, 唯一)
    pub name: String,

    /// 严重级别阈值
    #[serde(default)]
    pub threshold: Severity,

    /// 渲染标志
    #[serde(default)]
    pub flags: RenderFlags,

    /// 后端目标
    pub target: TargetConfig,

    /// caller-info 字段总宽度
    #[serde(default = "default_caller_width")]
    pub caller_width: usize,

    /// 时间戳字段宽度
    #[serde(default)]
    pub timestamp: TimestampWidths,

    /// 按严重级别覆盖颜色
    #[serde(default)]
    pub colors: BTreeMap<Severity, ColorOverride>,
}

fn default_caller_width() -> usize {
    DEFAULT_CALLER_WIDTH
}

impl SinkConfig {
    /// Minimal config: given name and target, Info threshold, no flags
    pub fn new(name: impl Into<String>, target: TargetConfig) -> Self {
        Self {
            name: name.into(),
            threshold: Severity::default(),
            flags: RenderFlags::NONE,
            target,
            caller_width: DEFAULT_CALLER_WIDTH,
            timestamp: TimestampWidths::default(),
            colors: BTreeMap::new(),
        }
    }

    /// Check every field that does not need the rest of the document.
    ///
    /// Name uniqueness is checked by the loader / dispatcher.
    pub fn validate(&self) -> Result<(), LogError> {
        if self.name.trim().is_empty() {
            return Err(LogError::config_validation(
                "sinks[].name",
                "sink name cannot be empty",
            ));
        }
        validate_caller_width(self.caller_width)
            .map_err(|e| prefix_field(e, &self.name))?;
        self.timestamp
            .validate()
            .map_err(|e| prefix_field(e, &self.name))?;
        self.target
            .validate()
            .map_err(|e| prefix_field(e, &self.name))?;
        Ok(())
    }
}

fn prefix_field(err: LogError, sink: &str) -> LogError {
    match err {
        LogError::ConfigValidation { field, message } => {
            LogError::config_validation(format!("sinks[name={sink}].{field}"), message)
        }
        other => other,
    }
}

/// Reject caller widths outside [`CALLER_WIDTH_RANGE`]
pub fn validate_caller_width(width: usize) -> Result<(), LogError> {
    if CALLER_WIDTH_RANGE.contains(&width) {
        Ok(())
    } else {
        Err(LogError::config_validation(
            "caller_width",
            format!(
                "caller_width must be within {}..={}, got {width}",
                CALLER_WIDTH_RANGE.start(),
                CALLER_WIDTH_RANGE.end()
            ),
        ))
    }
}

/// Field widths of the elapsed-time header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampWidths {
    /// Width of the day segment including its `d` suffix
    pub days: usize,
    pub seconds: usize,
    pub millis: usize,
}

impl Default for TimestampWidths {
    fn default() -> Self {
        Self {
            days: 5,
            seconds: 5,
            millis: 3,
        }
    }
}

impl TimestampWidths {
    pub fn validate(&self) -> Result<(), LogError> {
        check_range("timestamp.days", self.days, &DAY_WIDTH_RANGE)?;
        check_range("timestamp.seconds", self.seconds, &SECS_WIDTH_RANGE)?;
        check_range("timestamp.millis", self.millis, &MILLIS_WIDTH_RANGE)?;
        Ok(())
    }
}

fn check_range(field: &str, value: usize, range: &RangeInclusive<usize>) -> Result<(), LogError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(LogError::config_validation(
            field,
            format!(
                "width must be within {}..={}, got {value}",
                range.start(),
                range.end()
            ),
        ))
    }
}

/// 后端目标配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetConfig {
    /// 标准输出 / 标准错误
    Console {
        #[serde(default)]
        stream: ConsoleStream,
    },
    /// 文件输出
    File {
        path: PathBuf,
        /// 追加写入 (false = 覆盖)
        #[serde(default)]
        append: bool,
        #[serde(default = "default_file_buffer")]
        buffer_size: usize,
    },
    /// 内存缓冲区
    Memory {
        /// 最大字节数 (None = 不限)
        #[serde(default)]
        capacity: Option<usize>,
    },
}

fn default_file_buffer() -> usize {
    DEFAULT_FILE_BUFFER
}

impl TargetConfig {
    pub fn validate(&self) -> Result<(), LogError> {
        match self {
            TargetConfig::Console { .. } => Ok(()),
            TargetConfig::File {
                path, buffer_size, ..
            } => {
                if path.as_os_str().is_empty() {
                    return Err(LogError::config_validation(
                        "target.path",
                        "file path cannot be empty",
                    ));
                }
                if *buffer_size == 0 {
                    return Err(LogError::config_validation(
                        "target.buffer_size",
                        "buffer_size must be > 0",
                    ));
                }
                Ok(())
            }
            TargetConfig::Memory { capacity } => match capacity {
                Some(0) => Err(LogError::config_validation(
                    "target.capacity",
                    "capacity must be > 0",
                )),
                _ => Ok(()),
            },
        }
    }

    /// Short label for listings
    pub fn kind(&self) -> &'static str {
        match self {
            TargetConfig::Console { .. } => "console",
            TargetConfig::File { .. } => "file",
            TargetConfig::Memory { .. } => "memory",
        }
    }
}

/// 控制台流
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

/// 单个严重级别的颜色覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOverride {
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}
