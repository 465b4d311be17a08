//! Telemetry error types.

use thiserror::Error;

/// Errors raised while installing a subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The logging configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A global subscriber is already installed, or installation failed.
    #[error("Initialization error: {0}")]
    InitError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
