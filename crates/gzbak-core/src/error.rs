//! Error types for gzbak-core

use thiserror::Error;

/// Result type alias using gzbak-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for gzbak
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// A path could not be made absolute or is not valid UTF-8
    #[error("Cannot resolve path {path}: {message}")]
    PathResolution { path: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a path resolution error
    pub fn path_resolution(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PathResolution {
            path: path.into(),
            message: message.into(),
        }
    }
}
