//! Configuration error types.

use std::io;

use surrogate_proxy::ProxyError;
use thiserror::Error;

/// Errors that can occur while loading proxy manifests.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a manifest file.
    #[error("Failed to read manifest at {path}: {source}")]
    ReadError {
        /// Path to the manifest that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to parse a manifest.
    #[error("Failed to parse manifest at {path}: {source}")]
    ParseError {
        /// Path to the manifest that failed to parse.
        path: String,
        /// Underlying TOML parse error.
        #[source]
        source: toml::de::Error,
    },

    /// A manifest failed validation.
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// Field that failed validation.
        field: String,
        /// Validation failure description.
        message: String,
    },

    /// A manifest adopts a protocol the registry does not know.
    #[error("Unknown protocol '{0}'")]
    UnknownProtocol(String),

    /// A protocol with this name is already registered.
    #[error("Protocol '{0}' is already registered")]
    DuplicateProtocol(String),

    /// The protocol declaration was rejected.
    #[error(transparent)]
    Protocol(#[from] ProxyError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
