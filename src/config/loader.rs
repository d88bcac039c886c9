//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterFile;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate a route file from TOML text.
pub fn parse_config(content: &str) -> Result<RouterFile, ConfigError> {
    let file: RouterFile = toml::from_str(content)?;
    validate_config(&file).map_err(ConfigError::Validation)?;
    Ok(file)
}

/// Load and validate a route file.
pub fn load_config(path: &Path) -> Result<RouterFile, ConfigError> {
    let content = fs::read_to_string(path)?;
    let file = parse_config(&content)?;
    tracing::debug!(path = %path.display(), routes = file.routes.len(), "Route file loaded");
    Ok(file)
}
