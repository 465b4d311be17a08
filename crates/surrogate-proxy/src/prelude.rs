//! Prelude module - commonly used types for convenient import.
//!
//! Use `use surrogate_proxy::prelude::*;` to import all essential types.

// Errors
pub use crate::{DelegateError, ProxyError, ProxyResult};

// Protocols
pub use crate::{MethodSpec, Protocol, ProtocolBuilder, ReturnKind, Selector};

// Proxies and policies
pub use crate::{Capability, DefaultPolicy, DefaultValue, DelegateProxy, ProtocolProxy};

// Dynamic forwarding
pub use crate::{Invocation, Responder};

// Owner integration
pub use crate::DelegateSlot;
pub use crate::{delegate_property, delegate_protocol};
