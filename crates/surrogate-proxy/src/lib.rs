//! Surrogate Proxy - stand-ins for absent or partial delegates.
//!
//! This crate provides:
//! - Protocols: named capability sets, optionally adopting one another
//! - Delegate proxies holding a weak reference to the real delegate
//! - Default-value policies for calls no delegate answers
//! - Typed forwarding through protocols declared with [`delegate_protocol!`]
//! - Dynamic forwarding of [`Invocation`]s to [`Responder`]s
//! - [`DelegateSlot`] and [`delegate_property!`] for owners exposing a
//!   `delegate` property
//!
//! # Forwarding rules
//!
//! Every call through a proxy:
//! - Fails with [`ProxyError::UnsupportedCapability`] if the method is not in
//!   the protocol.
//! - Is forwarded unchanged if the delegate is alive and implements the
//!   method; the delegate's answer, including its errors, comes back as is.
//! - Otherwise is answered by the [`DefaultPolicy`]. Methods returning
//!   nothing become no-ops. With no policy, methods returning a value fail
//!   with [`ProxyError::UndefinedDefault`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use surrogate_proxy::prelude::*;
//!
//! let protocol = Arc::new(
//!     Protocol::builder("GreeterDelegate")
//!         .value_method("greet")
//!         .bool_method("farewell")
//!         .build()
//!         .unwrap(),
//! );
//!
//! // No delegate yet: boolean methods answer `true`.
//! let proxy = DelegateProxy::<dyn Responder>::detached(protocol).with_bool_true_default();
//! assert_eq!(
//!     proxy.invoke(&Invocation::new("farewell")).unwrap(),
//!     serde_json::Value::Bool(true)
//! );
//! assert!(proxy.invoke(&Invocation::new("greet")).is_err());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod macros;

pub mod prelude;

mod dynamic;
mod error;
mod policy;
mod protocol;
mod proxy;
mod slot;

pub use dynamic::{Invocation, Responder};
pub use error::{DelegateError, ProxyError, ProxyResult};
pub use policy::{DefaultPolicy, DefaultValue};
pub use protocol::{MethodSpec, Protocol, ProtocolBuilder, ReturnKind, Selector};
pub use proxy::{Capability, DelegateProxy, ProtocolProxy};
pub use slot::DelegateSlot;
