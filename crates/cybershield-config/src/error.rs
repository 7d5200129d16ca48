//! Configuration error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid default role {value:?}: expected one of SOC, DFIR, SYS, INT")]
    InvalidRole { value: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Failed to render configuration as TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),
}
