//! Startup configuration loading (spec §6), generalizing the teacher's
//! `engine/src/config/loader.rs` `EngineConfig`/`load_config` split to a
//! single `system.toml`: a typed settings struct plus a thin loader with an
//! explicit `ConfigError`.

use std::path::{Path, PathBuf};

use bibscope_common::config::SystemConfig;

/// Fully loaded application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub system: SystemConfig,
    #[allow(dead_code)]
    pub config_dir: PathBuf,
}

/// Load `system.toml` from `config_dir`. The server refuses to start on
/// validation failure, same policy as the teacher's engine.
pub fn load_config(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    tracing::info!(config_dir = %config_dir.display(), "loading configuration");

    let system_path = config_dir.join("system.toml");
    let system = if system_path.exists() {
        load_system_config(&system_path)?
    } else {
        tracing::warn!(path = %system_path.display(), "system.toml not found, using defaults");
        SystemConfig::default()
    };

    validate(&system)?;

    Ok(AppConfig {
        system,
        config_dir: config_dir.to_path_buf(),
    })
}

fn load_system_config(path: &Path) -> Result<SystemConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

fn validate(system: &SystemConfig) -> Result<(), ConfigError> {
    if system.acquisition.similarity_threshold < 0.0 || system.acquisition.similarity_threshold > 1.0 {
        return Err(ConfigError::Validation(
            "acquisition.similarity_threshold must be in [0, 1]".to_string(),
        ));
    }
    if system.acquisition.default_rate_limit_s < 0.0 {
        return Err(ConfigError::Validation(
            "acquisition.default_rate_limit_s must be non-negative".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    FileRead { path: PathBuf, source: std::io::Error },

    #[error("failed to parse {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_system_toml_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("bibscope-config-test-missing");
        let config = load_config(&dir).unwrap();
        assert_eq!(config.system.acquisition.similarity_threshold, 0.95);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let mut system = SystemConfig::default();
        system.acquisition.similarity_threshold = 1.5;
        assert!(validate(&system).is_err());
    }
}
