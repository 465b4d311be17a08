//! Delegate slots - the storage behind an owner's `delegate` property.

use std::sync::Arc;

use crate::policy::DefaultPolicy;
use crate::proxy::ProtocolProxy;

/// Holds the proxy for an owner's delegate.
///
/// Setting a delegate builds a fresh proxy around it; reading returns the
/// delegate itself, so callers outside the owner never see the proxy. The
/// slot's default policy is applied to every proxy it builds.
#[derive(Debug)]
pub struct DelegateSlot<P: ProtocolProxy> {
    proxy: Option<P>,
    policy: DefaultPolicy,
}

impl<P: ProtocolProxy> DelegateSlot<P> {
    /// An empty slot with no default policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            proxy: None,
            policy: DefaultPolicy::None,
        }
    }

    /// Apply `policy` to every proxy this slot builds.
    #[must_use]
    pub fn with_default_policy(mut self, policy: DefaultPolicy) -> Self {
        self.set_default_policy(policy);
        self
    }

    /// Answer `true` for unanswered boolean methods.
    #[must_use]
    pub fn with_bool_true_default(self) -> Self {
        self.with_default_policy(DefaultPolicy::BoolTrue)
    }

    /// Replace the slot's default policy, including on the current proxy.
    pub fn set_default_policy(&mut self, policy: DefaultPolicy) {
        if let Some(proxy) = self.proxy.as_mut() {
            proxy.as_proxy_mut().set_default_policy(policy.clone());
        }
        self.policy = policy;
    }

    /// Attach `delegate`, or clear the slot when `None`.
    pub fn set(&mut self, delegate: Option<&Arc<P::Delegate>>) {
        self.proxy = delegate.map(|delegate| {
            let mut proxy = P::attach(Some(delegate));
            proxy
                .as_proxy_mut()
                .set_default_policy(self.policy.clone());
            proxy
        });
    }

    /// The attached delegate, if set and still alive.
    #[must_use]
    pub fn get(&self) -> Option<Arc<P::Delegate>> {
        self.proxy.as_ref().and_then(|p| p.as_proxy().delegate())
    }

    /// The proxy to call through.
    #[must_use]
    pub fn proxy(&self) -> Option<&P> {
        self.proxy.as_ref()
    }

    /// Whether a delegate has been set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.proxy.is_some()
    }
}

impl<P: ProtocolProxy> Default for DelegateSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}
