//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::InstrumentationConfig;
use crate::config::source::TomlConfig;
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

/// Parse and validate typed configuration from TOML text.
pub fn parse_config(content: &str) -> Result<InstrumentationConfig, ConfigError> {
    let config: InstrumentationConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<InstrumentationConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load a TOML file as a flat key/value source.
pub fn load_source(path: &Path) -> Result<TomlConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    TomlConfig::parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
            [correlation]
            header = "x-request-id"

            [request_tracing]
            auth_id_length = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.correlation.header, "x-request-id");
        assert!(config.correlation.include_in_response);
        assert_eq!(config.request_tracing.auth_id_length, 4);
    }

    #[test]
    fn test_validation_error_is_reported() {
        let err = parse_config("[request_tracing]\nauth_id_length = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("auth_id_length"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
