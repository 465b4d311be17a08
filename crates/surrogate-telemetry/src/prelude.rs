//! Prelude module - commonly used types for convenient import.
//!
//! ```rust,no_run
//! use surrogate_telemetry::prelude::*;
//!
//! # fn main() -> TelemetryResult<()> {
//! setup_logging(&LogConfig::new("info").with_forwarding_trace())?;
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{TelemetryError, TelemetryResult};

// Configuration
pub use crate::{LogConfig, LogFormat, LogTarget};

// Setup
pub use crate::{setup_default_logging, setup_logging};
