//! Manifest types.
//!
//! A manifest declares one protocol and the default policy proxies for it
//! start with:
//!
//! ```toml
//! [protocol]
//! name = "TableViewDelegate"
//! adopts = ["ScrollViewDelegate"]
//!
//! [[protocol.methods]]
//! selector = "should_highlight_row"
//! returns = "bool"
//!
//! [default]
//! kind = "bool_true"
//! ```

use serde::{Deserialize, Serialize};
use surrogate_proxy::{DefaultPolicy, DefaultValue, ReturnKind};

/// A protocol declaration plus its default policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyManifest {
    /// The protocol being declared.
    pub protocol: ProtocolSection,
    /// Default policy for proxies of this protocol.
    #[serde(default)]
    pub default: PolicyConfig,
}

/// The `[protocol]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolSection {
    /// Protocol name; unique within a registry.
    pub name: String,
    /// Names of protocols this one adopts. They must already be registered.
    #[serde(default)]
    pub adopts: Vec<String>,
    /// Methods declared by this protocol itself.
    #[serde(default)]
    pub methods: Vec<MethodSection>,
}

/// One `[[protocol.methods]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodSection {
    /// Method selector.
    pub selector: String,
    /// Return kind: `void`, `bool` or `value`.
    pub returns: ReturnKind,
}

/// The `[default]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// No default.
    #[default]
    None,
    /// Boolean methods answer `true`.
    BoolTrue,
    /// Unanswered calls return `value`.
    Value {
        /// The value to return.
        value: serde_json::Value,
    },
}

impl PolicyConfig {
    /// Convert into the runtime policy.
    ///
    /// Scalar values are unpacked into Rust types, so a typed proxy can read
    /// `value = true` as a `bool` and `value = "x"` as a `String`.
    #[must_use]
    pub fn into_policy(self) -> DefaultPolicy {
        match self {
            Self::None => DefaultPolicy::None,
            Self::BoolTrue => DefaultPolicy::BoolTrue,
            Self::Value { value } => DefaultPolicy::Value(DefaultValue::from_json(value)),
        }
    }
}
