//! Surrogate Test - Shared test utilities for surrogate proxies.
//!
//! This crate provides fixture protocols, mock delegates and harness helpers
//! that can be used across the workspace as a dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! surrogate-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use surrogate_proxy::{DelegateProxy, Responder};
//! use surrogate_test::{RecordingResponder, greeter_protocol, test_invocation};
//!
//! #[test]
//! fn test_forwarding() {
//!     let delegate = Arc::new(RecordingResponder::new().with_reply("greet", "hi"));
//!     let handle: Arc<dyn Responder> = delegate.clone();
//!     let proxy = DelegateProxy::new(Some(&handle), greeter_protocol());
//!
//!     proxy.invoke(&test_invocation("greet", ["ada"])).unwrap();
//!     assert_eq!(delegate.call_count("greet"), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
