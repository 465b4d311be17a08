//! The delegate forwarding proxy.
//!
//! A [`DelegateProxy`] stands in for a delegate that may be missing or may
//! implement only part of its protocol. Every call goes through three steps:
//! - Reject selectors outside the protocol.
//! - Forward to the delegate if it is alive and implements the method.
//! - Otherwise answer from the [`DefaultPolicy`].
//!
//! The delegate is held weakly. Dropping it detaches the proxy; a proxy
//! never re-attaches on its own.

use std::any::Any;
use std::sync::{Arc, Weak};

use tracing::{debug, trace};

use crate::error::{ProxyError, ProxyResult};
use crate::policy::{DefaultPolicy, DefaultValue};
use crate::protocol::{MethodSpec, Protocol, Selector};

/// A protocol with a shared, statically declared capability set.
///
/// Implemented for `dyn Trait` by [`delegate_protocol!`](crate::delegate_protocol).
pub trait Capability {
    /// The protocol describing the trait's methods.
    fn protocol() -> Arc<Protocol>;
}

/// Forwards calls to a weakly held delegate, falling back to defaults.
pub struct DelegateProxy<D: ?Sized> {
    delegate: Option<Weak<D>>,
    protocol: Arc<Protocol>,
    policy: DefaultPolicy,
}

impl<D: ?Sized> DelegateProxy<D> {
    /// Wrap `delegate` in a proxy restricted to `protocol`.
    ///
    /// The delegate is not checked for conformance; each call finds out
    /// whether it implements the invoked method.
    #[must_use]
    pub fn new(delegate: Option<&Arc<D>>, protocol: Arc<Protocol>) -> Self {
        Self {
            delegate: delegate.map(Arc::downgrade),
            protocol,
            policy: DefaultPolicy::None,
        }
    }

    /// A proxy with no delegate.
    #[must_use]
    pub fn detached(protocol: Arc<Protocol>) -> Self {
        Self::new(None, protocol)
    }

    /// The delegate, if it is still alive.
    #[must_use]
    pub fn delegate(&self) -> Option<Arc<D>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    /// Whether a live delegate is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.delegate.as_ref().is_some_and(|d| d.strong_count() > 0)
    }

    /// The protocol this proxy represents.
    #[must_use]
    pub fn protocol(&self) -> &Arc<Protocol> {
        &self.protocol
    }

    /// The active default policy.
    #[must_use]
    pub fn default_policy(&self) -> &DefaultPolicy {
        &self.policy
    }

    /// Answer `true` for unanswered boolean methods.
    #[must_use]
    pub fn with_bool_true_default(mut self) -> Self {
        self.set_bool_true_default();
        self
    }

    /// Answer `value` for unanswered calls.
    #[must_use]
    pub fn with_default_return<T: Any + Clone + Send + Sync>(mut self, value: T) -> Self {
        self.set_default_return(value);
        self
    }

    /// Replace the default policy.
    #[must_use]
    pub fn with_default_policy(mut self, policy: DefaultPolicy) -> Self {
        self.set_default_policy(policy);
        self
    }

    /// Answer `true` for unanswered boolean methods.
    pub fn set_bool_true_default(&mut self) -> &mut Self {
        self.set_default_policy(DefaultPolicy::BoolTrue)
    }

    /// Answer `value` for unanswered calls.
    pub fn set_default_return<T: Any + Clone + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.set_default_policy(DefaultPolicy::Value(DefaultValue::new(value)))
    }

    /// Replace the default policy.
    pub fn set_default_policy(&mut self, policy: DefaultPolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    /// Remove the default policy.
    pub fn clear_default(&mut self) -> &mut Self {
        self.set_default_policy(DefaultPolicy::None)
    }

    /// Whether the proxy answers `selector`.
    ///
    /// Reflects the protocol, not the delegate: a detached proxy responds to
    /// every method its protocol declares.
    #[must_use]
    pub fn responds_to(&self, selector: &str) -> bool {
        self.protocol.contains(selector)
    }

    /// Whether the proxy conforms to `protocol`.
    #[must_use]
    pub fn conforms_to(&self, protocol: &Protocol) -> bool {
        self.protocol.conforms_to(protocol)
    }

    /// Forward a typed call.
    ///
    /// `call` invokes the method on the delegate and returns `None` when the
    /// delegate does not implement it. The delegate's answer is returned
    /// as is; a `Result` return type carries the delegate's own errors.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::UnsupportedCapability`] if `selector` is not in the protocol.
    /// - [`ProxyError::UndefinedDefault`] or [`ProxyError::PolicyTypeMismatch`]
    ///   if the call falls back to a default that cannot answer it.
    pub fn forward<T, F>(&self, selector: &str, call: F) -> ProxyResult<T>
    where
        T: Any,
        F: FnOnce(&D) -> Option<T>,
    {
        let method = self.method(selector)?;

        match self.delegate() {
            Some(delegate) => {
                if let Some(answer) = call(delegate.as_ref()) {
                    trace!(protocol = %self.protocol.name(), selector, "forwarded to delegate");
                    return Ok(answer);
                }
                trace!(
                    protocol = %self.protocol.name(),
                    selector,
                    "delegate does not implement method"
                );
            },
            None => {
                trace!(protocol = %self.protocol.name(), selector, "no delegate attached");
            },
        }

        self.policy.resolve(&self.protocol, method)
    }

    /// Turn a forwarded result into the `Option` a delegate trait returns.
    ///
    /// Used by the trait impls [`delegate_protocol!`](crate::delegate_protocol)
    /// generates. The dropped error is logged at `debug`.
    #[doc(hidden)]
    pub fn delegate_answer<T>(&self, selector: &str, result: ProxyResult<T>) -> Option<T> {
        match result {
            Ok(answer) => Some(answer),
            Err(err) => {
                debug!(
                    protocol = %self.protocol.name(),
                    selector,
                    error = %err,
                    "answering as not implemented"
                );
                None
            },
        }
    }

    pub(crate) fn method(&self, selector: &str) -> ProxyResult<&MethodSpec> {
        self.protocol
            .method(selector)
            .ok_or_else(|| ProxyError::UnsupportedCapability {
                protocol: self.protocol.name().to_string(),
                selector: Selector::new(selector),
            })
    }
}

impl<D: ?Sized + Capability> DelegateProxy<D> {
    /// Wrap `delegate` in a proxy for its declared protocol.
    #[must_use]
    pub fn for_delegate(delegate: Option<&Arc<D>>) -> Self {
        Self::new(delegate, D::protocol())
    }
}

impl<D: ?Sized> Clone for DelegateProxy<D> {
    fn clone(&self) -> Self {
        Self {
            delegate: self.delegate.clone(),
            protocol: Arc::clone(&self.protocol),
            policy: self.policy.clone(),
        }
    }
}

impl<D: ?Sized> std::fmt::Debug for DelegateProxy<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegateProxy")
            .field("protocol", &self.protocol.name())
            .field("attached", &self.is_attached())
            .field("policy", &self.policy)
            .finish()
    }
}

/// A typed proxy generated for one protocol.
///
/// [`delegate_protocol!`](crate::delegate_protocol) implements this for the
/// proxy type it declares, which lets [`DelegateSlot`](crate::DelegateSlot)
/// build proxies generically.
pub trait ProtocolProxy: Sized {
    /// The delegate trait object, e.g. `dyn GreeterDelegate`.
    type Delegate: ?Sized + Capability;

    /// Wrap an untyped proxy.
    fn from_proxy(proxy: DelegateProxy<Self::Delegate>) -> Self;

    /// The underlying proxy.
    fn as_proxy(&self) -> &DelegateProxy<Self::Delegate>;

    /// The underlying proxy, mutably.
    fn as_proxy_mut(&mut self) -> &mut DelegateProxy<Self::Delegate>;

    /// Build a proxy around `delegate`.
    #[must_use]
    fn attach(delegate: Option<&Arc<Self::Delegate>>) -> Self {
        Self::from_proxy(DelegateProxy::for_delegate(delegate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter {
        fn greet(&self, name: &str) -> Option<String>;
        fn farewell(&self) -> Option<bool>;
    }

    struct Polite;

    impl Greeter for Polite {
        fn greet(&self, name: &str) -> Option<String> {
            Some(format!("hello, {name}"))
        }

        fn farewell(&self) -> Option<bool> {
            None
        }
    }

    fn greeter() -> Arc<Protocol> {
        Arc::new(
            Protocol::builder("Greeter")
                .value_method("greet")
                .bool_method("farewell")
                .void_method("did_finish")
                .build()
                .unwrap(),
        )
    }

    fn attached(delegate: &Arc<dyn Greeter>) -> DelegateProxy<dyn Greeter> {
        DelegateProxy::new(Some(delegate), greeter())
    }

    #[test]
    fn test_forwards_to_delegate() {
        let delegate: Arc<dyn Greeter> = Arc::new(Polite);
        let proxy = attached(&delegate);

        let answer = proxy.forward("greet", |d| d.greet("ada")).unwrap();
        assert_eq!(answer, "hello, ada");
    }

    #[test]
    fn test_unimplemented_method_uses_default() {
        let delegate: Arc<dyn Greeter> = Arc::new(Polite);
        let proxy = attached(&delegate).with_bool_true_default();

        assert!(proxy.forward("farewell", |d| d.farewell()).unwrap());
    }

    #[test]
    fn test_unknown_selector_is_rejected_regardless_of_delegate() {
        let delegate: Arc<dyn Greeter> = Arc::new(Polite);
        let proxy = attached(&delegate);
        let err = proxy.forward("shout", |d| d.greet("x")).unwrap_err();
        assert!(matches!(err, ProxyError::UnsupportedCapability { .. }));

        let detached = DelegateProxy::<dyn Greeter>::detached(greeter()).with_bool_true_default();
        let err = detached.forward("shout", |d| d.farewell()).unwrap_err();
        assert!(matches!(err, ProxyError::UnsupportedCapability { .. }));
    }

    #[test]
    fn test_proxy_does_not_keep_delegate_alive() {
        let delegate: Arc<dyn Greeter> = Arc::new(Polite);
        let proxy = attached(&delegate);
        assert!(proxy.is_attached());
        assert_eq!(Arc::strong_count(&delegate), 1);

        drop(delegate);
        assert!(!proxy.is_attached());
        assert!(proxy.delegate().is_none());

        let err = proxy.forward("greet", |d| d.greet("ada")).unwrap_err();
        assert!(matches!(err, ProxyError::UndefinedDefault { .. }));
    }

    #[test]
    fn test_void_call_without_delegate_is_a_no_op() {
        let proxy = DelegateProxy::<dyn Greeter>::detached(greeter());
        let mut called = false;
        proxy
            .forward("did_finish", |_| {
                called = true;
                Some(())
            })
            .unwrap();
        assert!(!called);
    }

    #[test]
    fn test_fallback_checks_the_declared_return_kind() {
        let proxy = DelegateProxy::<dyn Greeter>::detached(greeter()).with_bool_true_default();

        // `greet` is declared as a value method; asking for a bool is not
        // enough to get the bool-true default.
        let err = proxy.forward::<bool, _>("greet", |_| None).unwrap_err();
        assert!(matches!(err, ProxyError::PolicyTypeMismatch { .. }));
        assert!(err.is_contract_violation());

        let proxy = DelegateProxy::<dyn Greeter>::detached(greeter());
        let err = proxy.forward::<(), _>("farewell", |_| None).unwrap_err();
        assert!(matches!(err, ProxyError::UndefinedDefault { .. }));

        let err = proxy.forward::<bool, _>("did_finish", |_| None).unwrap_err();
        assert!(matches!(err, ProxyError::PolicyTypeMismatch { .. }));
    }

    #[test]
    fn test_setting_a_policy_replaces_the_previous_one() {
        let mut proxy = DelegateProxy::<dyn Greeter>::detached(greeter());
        proxy.set_bool_true_default();
        proxy.set_default_return(String::from("fallback"));
        assert!(matches!(proxy.default_policy(), DefaultPolicy::Value(_)));
        assert!(proxy.forward("farewell", |d| d.farewell()).is_err());
        assert_eq!(
            proxy.forward("greet", |d| d.greet("x")).unwrap(),
            "fallback"
        );

        proxy.clear_default();
        assert!(proxy.default_policy().is_none());
    }

    #[test]
    fn test_introspection_reflects_protocol() {
        let proxy = DelegateProxy::<dyn Greeter>::detached(greeter());
        assert!(proxy.responds_to("greet"));
        assert!(proxy.responds_to("did_finish"));
        assert!(!proxy.responds_to("shout"));
        assert!(proxy.conforms_to(&greeter()));
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_dropped_errors_are_logged() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let proxy = DelegateProxy::<dyn Greeter>::detached(greeter());
        let answer = tracing::subscriber::with_default(subscriber, || {
            let result = proxy.forward::<String, _>("greet", |d| d.greet("ada"));
            proxy.delegate_answer("greet", result)
        });
        assert_eq!(answer, None);

        let logs = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("answering as not implemented"));
        assert!(logs.contains("no delegate answered `greet`"));

        let answer = proxy.delegate_answer("greet", Ok(String::from("hi")));
        assert_eq!(answer.as_deref(), Some("hi"));
    }

    #[test]
    fn test_debug_output() {
        let proxy = DelegateProxy::<dyn Greeter>::detached(greeter());
        let debug = format!("{proxy:?}");
        assert!(debug.contains("Greeter"));
        assert!(debug.contains("attached: false"));
    }
}
