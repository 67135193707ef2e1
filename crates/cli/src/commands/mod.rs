//! Command implementations.

mod emit;
mod info;
mod validate;

pub use emit::run_emit;
pub use info::run_info;
pub use validate::run_validate;

use std::path::Path;

use contracts::DispatcherConfig;

use crate::error::{CliError, Result};

/// Load and validate the configuration at `path`
fn load_config(path: &Path) -> Result<DispatcherConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path));
    }
    Ok(config_loader::ConfigLoader::load_from_path(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            load_config(&missing),
            Err(CliError::ConfigNotFound { .. })
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[[sinks]]\nname = 1\n").unwrap();
        assert!(matches!(
            load_config(&broken),
            Err(CliError::ConfigParse { .. })
        ));

        let invalid = dir.path().join("invalid.toml");
        std::fs::write(
            &invalid,
            "[[sinks]]\nname = \"a\"\ncaller_width = 2\ntarget = { kind = \"console\" }\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(&invalid),
            Err(CliError::ConfigValidation { .. })
        ));
    }
}
