//! Surrogate Telemetry - `tracing` subscriber setup.
//!
//! Proxies report each forward-or-default decision as a `trace` event with
//! `protocol` and `selector` fields, and the manifest loader reports the
//! files it reads at `debug`. This crate installs a subscriber that shows
//! them:
//!
//! ```rust,no_run
//! use surrogate_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), surrogate_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_forwarding_trace();
//!
//! setup_logging(&config)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
