//! Protocols - the named capability sets a proxy stands in for.
//!
//! A protocol is a fixed set of method signatures. It may adopt other
//! protocols, in which case their methods become part of its capability set
//! and it conforms to each of them.

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ProxyError, ProxyResult};

/// Identifies a method within a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    /// Create a selector from a method name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The method name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Selector {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Selector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a method hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// Nothing.
    Void,
    /// A boolean answer.
    Bool,
    /// Any other value.
    Value,
}

impl ReturnKind {
    /// Classify a Rust return type.
    #[must_use]
    pub fn of<T: ?Sized + Any>() -> Self {
        let id = TypeId::of::<T>();
        if id == TypeId::of::<()>() {
            Self::Void
        } else if id == TypeId::of::<bool>() {
            Self::Bool
        } else {
            Self::Value
        }
    }
}

impl std::fmt::Display for ReturnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Bool => write!(f, "bool"),
            Self::Value => write!(f, "value"),
        }
    }
}

/// A single method signature in a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpec {
    /// The method's selector.
    pub selector: Selector,
    /// The method's return kind.
    pub returns: ReturnKind,
}

impl MethodSpec {
    /// Create a method signature.
    #[must_use]
    pub fn new(selector: impl Into<Selector>, returns: ReturnKind) -> Self {
        Self {
            selector: selector.into(),
            returns,
        }
    }
}

/// A named capability set.
///
/// Immutable once built; share it through an [`Arc`].
#[derive(Debug, Clone)]
pub struct Protocol {
    name: String,
    methods: BTreeMap<Selector, MethodSpec>,
    adopted: Vec<Arc<Protocol>>,
}

impl Protocol {
    /// Start declaring a protocol.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ProtocolBuilder {
        ProtocolBuilder {
            name: name.into(),
            methods: Vec::new(),
            adopted: Vec::new(),
        }
    }

    /// Build a protocol from a trait declaration.
    ///
    /// Method names come from Rust identifiers, so they are non-empty and
    /// unique by construction.
    #[doc(hidden)]
    #[must_use]
    pub fn from_declaration(name: &str, methods: Vec<MethodSpec>) -> Self {
        Self {
            name: name.to_string(),
            methods: methods
                .into_iter()
                .map(|m| (m.selector.clone(), m))
                .collect(),
            adopted: Vec::new(),
        }
    }

    /// The protocol's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a method, including those of adopted protocols.
    #[must_use]
    pub fn method(&self, selector: &str) -> Option<&MethodSpec> {
        self.methods
            .get(selector)
            .or_else(|| self.adopted.iter().find_map(|p| p.method(selector)))
    }

    /// Whether `selector` is part of the capability set.
    #[must_use]
    pub fn contains(&self, selector: &str) -> bool {
        self.method(selector).is_some()
    }

    /// Every method in the capability set; own methods first.
    #[must_use]
    pub fn methods(&self) -> Vec<&MethodSpec> {
        let mut all: Vec<&MethodSpec> = self.methods.values().collect();
        for parent in &self.adopted {
            for method in parent.methods() {
                if !all.iter().any(|m| m.selector == method.selector) {
                    all.push(method);
                }
            }
        }
        all
    }

    /// Protocols this one adopts directly.
    #[must_use]
    pub fn adopted(&self) -> &[Arc<Protocol>] {
        &self.adopted
    }

    /// Whether this protocol is `other` or adopts it, directly or not.
    ///
    /// Protocols are identified by name.
    #[must_use]
    pub fn conforms_to(&self, other: &Protocol) -> bool {
        self.name == other.name || self.adopted.iter().any(|p| p.conforms_to(other))
    }
}

/// Builder for [`Protocol`].
#[derive(Debug)]
pub struct ProtocolBuilder {
    name: String,
    methods: Vec<MethodSpec>,
    adopted: Vec<Arc<Protocol>>,
}

impl ProtocolBuilder {
    /// Declare a method.
    #[must_use]
    pub fn method(mut self, selector: impl Into<Selector>, returns: ReturnKind) -> Self {
        self.methods.push(MethodSpec::new(selector, returns));
        self
    }

    /// Declare a method that returns nothing.
    #[must_use]
    pub fn void_method(self, selector: impl Into<Selector>) -> Self {
        self.method(selector, ReturnKind::Void)
    }

    /// Declare a method that returns a boolean.
    #[must_use]
    pub fn bool_method(self, selector: impl Into<Selector>) -> Self {
        self.method(selector, ReturnKind::Bool)
    }

    /// Declare a method that returns some other value.
    #[must_use]
    pub fn value_method(self, selector: impl Into<Selector>) -> Self {
        self.method(selector, ReturnKind::Value)
    }

    /// Adopt another protocol.
    #[must_use]
    pub fn adopting(mut self, protocol: Arc<Protocol>) -> Self {
        self.adopted.push(protocol);
        self
    }

    /// Finish the declaration.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidProtocol`] if the name or a selector is
    /// empty, or if a selector is declared with two different return kinds.
    pub fn build(self) -> ProxyResult<Protocol> {
        if self.name.trim().is_empty() {
            return Err(ProxyError::InvalidProtocol(
                "protocol name must not be empty".to_string(),
            ));
        }

        let mut inherited: BTreeMap<&Selector, ReturnKind> = BTreeMap::new();
        for parent in &self.adopted {
            for method in parent.methods() {
                match inherited.get(&method.selector) {
                    Some(returns) if *returns != method.returns => {
                        return Err(ProxyError::InvalidProtocol(format!(
                            "{}: `{}` is inherited as both {} and {}",
                            self.name, method.selector, returns, method.returns
                        )));
                    },
                    Some(_) => {},
                    None => {
                        inherited.insert(&method.selector, method.returns);
                    },
                }
            }
        }

        let mut methods: BTreeMap<Selector, MethodSpec> = BTreeMap::new();
        for method in self.methods {
            if method.selector.as_str().is_empty() {
                return Err(ProxyError::InvalidProtocol(format!(
                    "{}: selector must not be empty",
                    self.name
                )));
            }
            let previous = methods
                .get(&method.selector)
                .map(|m| m.returns)
                .or_else(|| inherited.get(&method.selector).copied());
            if let Some(previous) = previous
                && previous != method.returns
            {
                return Err(ProxyError::InvalidProtocol(format!(
                    "{}: `{}` declared as both {} and {}",
                    self.name, method.selector, previous, method.returns
                )));
            }
            methods.insert(method.selector.clone(), method);
        }

        Ok(Protocol {
            name: self.name,
            methods,
            adopted: self.adopted,
        })
    }
}
