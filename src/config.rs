use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Query builder configuration with validation
#[derive(Clone, Debug, PartialEq, Eq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Reject execution when a `{name}` placeholder has no bound value.
    /// Braces inside quoted string literals are not placeholders.
    pub strict_parameters: bool,

    /// Column alias of the count projection (`RETURN count(*) AS <alias>`)
    #[validate(
        length(min = 1, max = 64, message = "Count alias must be 1 to 64 characters"),
        custom(function = "validate_identifier")
    )]
    pub count_alias: String,

    /// Log rendered query text at debug level before dispatch
    pub log_queries: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            strict_parameters: true,
            count_alias: "total".to_string(),
            log_queries: true,
        }
    }
}

impl BuilderConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            strict_parameters: parse_env_var("CYPHER_BUILDER_STRICT_PARAMETERS", "true")?,
            count_alias: env::var("CYPHER_BUILDER_COUNT_ALIAS")
                .unwrap_or_else(|_| "total".to_string()),
            log_queries: parse_env_var("CYPHER_BUILDER_LOG_QUERIES", "true")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Count alias must be usable as a bare Cypher identifier
fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    let mut chars = value.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("identifier");
        err.message = Some("Count alias must be a plain identifier".into());
        Err(err)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
