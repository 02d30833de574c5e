//! Configuration errors

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ports::BackendError;
use crate::domain::value_objects::IgnoreError;

/// Result type alias for configuration resolution
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file does not end in `.yaml`, `.yml` or `.json`.
    #[error("config file format not supported for {path}, supported types are: {}", super::CONFIG_EXTENSIONS.join(", "))]
    UnsupportedExtension { path: PathBuf },

    /// An explicitly named config file does not exist.
    #[error("config file {path} was not found")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file exists but cannot be decoded.
    #[error("invalid config file {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error(
        "invalid asset name '{name}': must start with a letter, contain only \
         letters, digits, '-' or '_', and not be one of: {}",
        crate::domain::value_objects::RESERVED_NAMES.join(", ")
    )]
    InvalidName { name: String },

    #[error("invalid asset version '{version}': must be non-empty without '/', '\\' or '..'")]
    InvalidVersion { version: String },

    #[error("invalid backend settings: {message}")]
    InvalidBackend { message: String },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Ignore(#[from] IgnoreError),
}
