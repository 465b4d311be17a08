//! Surrogate Config - protocol manifests for delegate proxies.
//!
//! Protocols can be declared in TOML instead of code. Each manifest names a
//! protocol, lists its methods with their return kinds, and sets the default
//! policy new proxies start with. A [`ProtocolRegistry`] loads manifests,
//! resolves adopted protocols by name and builds proxies:
//!
//! ```
//! use surrogate_config::{ProtocolRegistry, ProxyManifest};
//! use surrogate_proxy::{Invocation, Responder};
//!
//! let manifest = ProxyManifest::from_toml_str(r#"
//!     [protocol]
//!     name = "ScrollViewDelegate"
//!
//!     [[protocol.methods]]
//!     selector = "should_scroll_to_top"
//!     returns = "bool"
//!
//!     [default]
//!     kind = "bool_true"
//! "#)?;
//!
//! let mut registry = ProtocolRegistry::new();
//! registry.register_manifest(manifest)?;
//!
//! let proxy = registry.proxy::<dyn Responder>("ScrollViewDelegate", None)?;
//! let answer = proxy.invoke(&Invocation::new("should_scroll_to_top"))?;
//! assert_eq!(answer, serde_json::Value::Bool(true));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod loader;
mod registry;
mod types;
mod validate;

pub use error::{ConfigError, ConfigResult};
pub use registry::ProtocolRegistry;
pub use types::{MethodSection, PolicyConfig, ProtocolSection, ProxyManifest};
pub use validate::validate;
