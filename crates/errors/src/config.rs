//! Configuration error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("failed to parse config: {message}")]
    ParseFailed { message: String },

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("invalid environment variable {name}: {message}")]
    InvalidEnv { name: String, message: String },
}
