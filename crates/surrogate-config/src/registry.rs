//! Registry of protocols declared by manifests.

use std::collections::BTreeMap;
use std::sync::Arc;

use surrogate_proxy::{DefaultPolicy, DelegateProxy, Protocol};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::ProxyManifest;
use crate::validate;

#[derive(Debug, Clone)]
struct Entry {
    protocol: Arc<Protocol>,
    default: DefaultPolicy,
}

/// Protocols by name, each with the default policy its proxies start with.
#[derive(Debug, Clone, Default)]
pub struct ProtocolRegistry {
    entries: BTreeMap<String, Entry>,
}

impl ProtocolRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a protocol built in code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateProtocol`] if the name is taken.
    pub fn register(&mut self, protocol: Arc<Protocol>, default: DefaultPolicy) -> ConfigResult<()> {
        let name = protocol.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(ConfigError::DuplicateProtocol(name));
        }
        debug!(protocol = %name, "registered protocol");
        self.entries.insert(name, Entry { protocol, default });
        Ok(())
    }

    /// Build a manifest's protocol and register it with the manifest's
    /// default policy.
    ///
    /// # Errors
    ///
    /// See [`ProxyManifest::build`]; also returns
    /// [`ConfigError::DuplicateProtocol`] if the name is taken.
    pub fn register_manifest(&mut self, manifest: ProxyManifest) -> ConfigResult<Arc<Protocol>> {
        let (protocol, default) = manifest.build(self)?;
        self.register(Arc::clone(&protocol), default)?;
        Ok(protocol)
    }

    /// Look up a protocol.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Protocol>> {
        self.entries.get(name).map(|e| Arc::clone(&e.protocol))
    }

    /// The default policy registered for a protocol.
    #[must_use]
    pub fn default_policy(&self, name: &str) -> Option<&DefaultPolicy> {
        self.entries.get(name).map(|e| &e.default)
    }

    /// Build a proxy for a registered protocol, with its default policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProtocol`] if `name` is not registered.
    pub fn proxy<D: ?Sized>(
        &self,
        name: &str,
        delegate: Option<&Arc<D>>,
    ) -> ConfigResult<DelegateProxy<D>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProtocol(name.to_string()))?;
        Ok(DelegateProxy::new(delegate, Arc::clone(&entry.protocol))
            .with_default_policy(entry.default.clone()))
    }

    /// Registered protocol names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered protocols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProxyManifest {
    /// Validate the manifest and build its protocol and default policy.
    ///
    /// Adopted protocols are looked up in `registry`; the result is not
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the manifest is invalid, adopts a
    /// protocol `registry` does not know, or redeclares an adopted method
    /// with a different return kind.
    pub fn build(&self, registry: &ProtocolRegistry) -> ConfigResult<(Arc<Protocol>, DefaultPolicy)> {
        validate::validate(self)?;

        let section = &self.protocol;
        let mut builder = Protocol::builder(section.name.as_str());
        for parent in &section.adopts {
            let adopted = registry
                .get(parent)
                .ok_or_else(|| ConfigError::UnknownProtocol(parent.clone()))?;
            builder = builder.adopting(adopted);
        }
        for method in &section.methods {
            builder = builder.method(method.selector.as_str(), method.returns);
        }

        Ok((Arc::new(builder.build()?), self.default.clone().into_policy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MethodSection, PolicyConfig, ProtocolSection};
    use surrogate_proxy::ReturnKind;

    fn scroll_manifest() -> ProxyManifest {
        ProxyManifest {
            protocol: ProtocolSection {
                name: "ScrollViewDelegate".to_string(),
                adopts: Vec::new(),
                methods: vec![MethodSection {
                    selector: "should_scroll_to_top".to_string(),
                    returns: ReturnKind::Bool,
                }],
            },
            default: PolicyConfig::BoolTrue,
        }
    }

    fn table_manifest() -> ProxyManifest {
        ProxyManifest {
            protocol: ProtocolSection {
                name: "TableViewDelegate".to_string(),
                adopts: vec!["ScrollViewDelegate".to_string()],
                methods: vec![MethodSection {
                    selector: "height_for_row".to_string(),
                    returns: ReturnKind::Value,
                }],
            },
            default: PolicyConfig::None,
        }
    }

    #[test]
    fn test_register_manifest_resolves_adoption() {
        let mut registry = ProtocolRegistry::new();
        registry.register_manifest(scroll_manifest()).unwrap();
        let table = registry.register_manifest(table_manifest()).unwrap();

        assert!(table.contains("should_scroll_to_top"));
        assert!(table.conforms_to(&registry.get("ScrollViewDelegate").unwrap()));
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["ScrollViewDelegate", "TableViewDelegate"]
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_adopted_protocol() {
        let mut registry = ProtocolRegistry::new();
        let err = registry.register_manifest(table_manifest()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProtocol(name) if name == "ScrollViewDelegate"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_build_does_not_register() {
        let registry = ProtocolRegistry::new();
        let (protocol, default) = scroll_manifest().build(&registry).unwrap();
        assert_eq!(protocol.name(), "ScrollViewDelegate");
        assert!(matches!(default, DefaultPolicy::BoolTrue));
        assert!(registry.get("ScrollViewDelegate").is_none());
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ProtocolRegistry::new();
        registry.register_manifest(scroll_manifest()).unwrap();
        let err = registry.register_manifest(scroll_manifest()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateProtocol(_)));
    }

    #[test]
    fn test_conflict_with_adopted_method() {
        let mut registry = ProtocolRegistry::new();
        registry.register_manifest(scroll_manifest()).unwrap();

        let mut manifest = table_manifest();
        manifest.protocol.methods.push(MethodSection {
            selector: "should_scroll_to_top".to_string(),
            returns: ReturnKind::Value,
        });
        let err = registry.register_manifest(manifest).unwrap_err();
        assert!(matches!(err, ConfigError::Protocol(_)));
    }

    #[test]
    fn test_proxy_carries_registered_default() {
        let mut registry = ProtocolRegistry::new();
        registry.register_manifest(scroll_manifest()).unwrap();

        let proxy = registry
            .proxy::<dyn surrogate_proxy::Responder>("ScrollViewDelegate", None)
            .unwrap();
        assert!(matches!(proxy.default_policy(), DefaultPolicy::BoolTrue));
        assert!(registry
            .proxy::<dyn surrogate_proxy::Responder>("Missing", None)
            .is_err());
    }
}
