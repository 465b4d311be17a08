//! Prelude module - commonly used types for convenient import.
//!
//! Use `use surrogate_config::prelude::*;` to import all essential types.

// Errors
pub use crate::{ConfigError, ConfigResult};

// Manifests
pub use crate::{MethodSection, PolicyConfig, ProtocolSection, ProxyManifest};

// Registry
pub use crate::ProtocolRegistry;
