//! 配置文件格式与 serde 编解码
//!
//! TOML 为主，JSON 作为备选；两者共享同一套 serde 模型。

use std::path::Path;

use contracts::{DispatcherConfig, LogError};

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// 按扩展名识别格式（大小写不敏感）
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// 按文件路径识别格式
    pub fn from_path(path: &Path) -> Result<Self, LogError> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Err(LogError::config_parse(format!(
                "{}: missing file extension (expected .toml or .json)",
                path.display()
            )));
        };
        Self::from_extension(ext)
            .ok_or_else(|| LogError::config_parse(format!("unsupported config format: .{ext}")))
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    /// 反序列化配置（不做语义校验）
    pub fn parse(self, content: &str) -> Result<DispatcherConfig, LogError> {
        let parsed: Result<DispatcherConfig, BoxedError> = match self {
            Self::Toml => toml::from_str(content).map_err(|e| Box::new(e) as BoxedError),
            Self::Json => serde_json::from_str(content).map_err(|e| Box::new(e) as BoxedError),
        };
        parsed.map_err(|source| LogError::ConfigParse {
            message: format!("{} parse error: {source}", self.label()),
            source: Some(source),
        })
    }

    /// 序列化配置
    pub fn render(self, config: &DispatcherConfig) -> Result<String, LogError> {
        let rendered = match self {
            Self::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
        };
        rendered.map_err(|e| LogError::config_parse(format!("{} serialize error: {e}", self.label())))
    }
}
