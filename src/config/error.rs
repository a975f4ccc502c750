//! Errors raised while building the instrument configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file named by `--config`, `KEITHLEY_CONFIG` or the default
    /// location exists but could not be read.
    #[error("Cannot read instrument config '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("keithley.toml is not valid TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Only reachable through `--show-config`.
    #[error("Cannot render settings as TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A setting parsed but cannot drive the instrument, e.g. a zero baud
    /// rate or an empty query.
    #[error("Setting '{key}' {message}")]
    ValidationError { key: String, message: String },

    #[error("{var} is set but unusable: {message}")]
    EnvParseError { var: String, message: String },
}

impl ConfigError {
    pub fn validation<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        Self::ValidationError {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn env_parse<V: Into<String>, M: Into<String>>(var: V, message: M) -> Self {
        Self::EnvParseError {
            var: var.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
