//! 配置校验模块
//!
//! 校验规则：
//! - sink 名称非空且唯一
//! - caller_width / 时间戳宽度在允许范围内
//! - 文件目标路径非空, buffer_size > 0
//! - 内存目标 capacity > 0

use std::collections::HashSet;

use contracts::{DispatcherConfig, LogError};

/// 校验 DispatcherConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &DispatcherConfig) -> Result<(), LogError> {
    validate_sink_names(config)?;
    validate_sinks(config)?;
    Ok(())
}

/// 校验 sink 名称非空且唯一
fn validate_sink_names(config: &DispatcherConfig) -> Result<(), LogError> {
    let mut seen = HashSet::new();
    for (idx, sink) in config.sinks.iter().enumerate() {
        if sink.name.trim().is_empty() {
            return Err(LogError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(LogError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

/// 校验每个 sink 的字段
fn validate_sinks(config: &DispatcherConfig) -> Result<(), LogError> {
    config.sinks.iter().try_for_each(|sink| sink.validate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SinkConfig, TargetConfig};
    use std::path::PathBuf;

    fn minimal_config() -> DispatcherConfig {
        DispatcherConfig {
            sinks: vec![
                SinkConfig::new("console", TargetConfig::Console {
                    stream: Default::default(),
                }),
                SinkConfig::new("file", TargetConfig::File {
                    path: PathBuf::from("app.log"),
                    append: false,
                    buffer_size: 8192,
                }),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
        assert!(validate(&DispatcherConfig::default()).is_ok());
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut config = minimal_config();
        config.sinks[1].name = "console".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("duplicate sink name"), "got: {err}");
    }

    #[test]
    fn test_empty_sink_name() {
        let mut config = minimal_config();
        config.sinks[0].name = "   ".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("sinks[0].name"), "got: {err}");
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_caller_width_out_of_range() {
        let mut config = minimal_config();
        config.sinks[0].caller_width = 71;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("sinks[name=console].caller_width"), "got: {err}");
    }

    #[test]
    fn test_timestamp_width_out_of_range() {
        let mut config = minimal_config();
        config.sinks[0].timestamp.millis = 10;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("timestamp.millis"), "got: {err}");
    }

    #[test]
    fn test_zero_buffer_size() {
        let mut config = minimal_config();
        config.sinks[1].target = TargetConfig::File {
            path: PathBuf::from("app.log"),
            append: true,
            buffer_size: 0,
        };
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("buffer_size must be > 0"), "got: {err}");
    }

    #[test]
    fn test_empty_file_path() {
        let mut config = minimal_config();
        config.sinks[1].target = TargetConfig::File {
            path: PathBuf::new(),
            append: false,
            buffer_size: 8192,
        };
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("file path cannot be empty"), "got: {err}");
    }
}
