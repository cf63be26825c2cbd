//! Configuration loading and validation.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::GridsolveConfig;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Load full gridsolve configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<GridsolveConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GridsolveConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GridsolveConfig) -> Result<(), ConfigError> {
    if config.version == 0 {
        return Err(ConfigError::Invalid(
            "version must be greater than 0".to_string(),
        ));
    }

    if config.app.name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "app.name must not be empty".to_string(),
        ));
    }

    if config.solver.backend.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "solver.backend must not be empty".to_string(),
        ));
    }

    if config.solver.model.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "solver.model must not be empty".to_string(),
        ));
    }

    if config.solver.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "solver.timeout_secs must be > 0".to_string(),
        ));
    }

    if config.stores.grid.backend == "redis" && config.stores.grid.connection_url.is_none() {
        return Err(ConfigError::Invalid(
            "stores.grid.connection_url is required for the redis backend".to_string(),
        ));
    }

    Ok(())
}
