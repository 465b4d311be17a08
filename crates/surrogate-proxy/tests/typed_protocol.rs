//! Integration tests for protocols declared with `delegate_protocol!`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use surrogate_proxy::{
    Capability, DelegateError, DelegateSlot, ProxyError, ReturnKind, delegate_property,
    delegate_protocol,
};

delegate_protocol! {
    /// Receives greeting events.
    pub trait GreeterDelegate {
        /// Produce a greeting.
        fn greet(&self) -> String;
        /// Whether to say goodbye.
        fn farewell(&self) -> bool;
        /// Called when the greeter is done.
        fn did_finish(&self, count: u32);
        /// A lookup that can fail.
        fn lookup(&self, key: &str) -> Result<String, DelegateError>;
    }

    /// Proxy for [`GreeterDelegate`].
    pub struct GreeterProxy;
}

/// Implements every method and counts `did_finish` calls.
#[derive(Default)]
struct Complete {
    finished: AtomicUsize,
}

impl GreeterDelegate for Complete {
    fn greet(&self) -> Option<String> {
        Some("hello".to_string())
    }

    fn farewell(&self) -> Option<bool> {
        Some(false)
    }

    fn did_finish(&self, count: u32) -> Option<()> {
        self.finished.fetch_add(count as usize, Ordering::SeqCst);
        Some(())
    }

    fn lookup(&self, key: &str) -> Option<Result<String, DelegateError>> {
        Some(if key.is_empty() {
            Err("empty key".into())
        } else {
            Ok(key.to_uppercase())
        })
    }
}

/// Implements `greet` only.
struct GreetOnly;

impl GreeterDelegate for GreetOnly {
    fn greet(&self) -> Option<String> {
        Some("hi there".to_string())
    }
}

#[test]
fn test_declared_protocol_matches_trait() {
    let protocol = <dyn GreeterDelegate as Capability>::protocol();
    assert_eq!(protocol.name(), "GreeterDelegate");

    let kinds: Vec<_> = ["greet", "farewell", "did_finish", "lookup"]
        .iter()
        .map(|s| protocol.method(s).map(|m| m.returns))
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(ReturnKind::Value),
            Some(ReturnKind::Bool),
            Some(ReturnKind::Void),
            Some(ReturnKind::Value),
        ]
    );

    // The protocol is built once and shared.
    assert!(Arc::ptr_eq(
        &protocol,
        &<dyn GreeterDelegate as Capability>::protocol()
    ));
}

#[test]
fn test_forwarding_is_transparent() {
    let delegate = Arc::new(Complete::default());
    let handle: Arc<dyn GreeterDelegate> = Arc::clone(&delegate) as Arc<dyn GreeterDelegate>;
    let proxy = GreeterProxy::new(Some(&handle)).with_bool_true_default();

    assert_eq!(proxy.greet().unwrap(), "hello");
    assert!(!proxy.farewell().unwrap());
    proxy.did_finish(3).unwrap();
    proxy.did_finish(4).unwrap();
    assert_eq!(delegate.finished.load(Ordering::SeqCst), 7);
}

#[test]
fn test_delegate_errors_are_returned_verbatim() {
    let handle: Arc<dyn GreeterDelegate> = Arc::new(Complete::default());
    let proxy = GreeterProxy::new(Some(&handle));

    assert_eq!(proxy.lookup("abc").unwrap().unwrap(), "ABC");
    let inner = proxy.lookup("").unwrap().unwrap_err();
    assert_eq!(inner.to_string(), "empty key");
}

#[test]
fn test_absent_delegate_with_bool_true_default() {
    // greet() -> String, farewell() -> bool; no delegate, bool-true default.
    let proxy = GreeterProxy::new(None).with_bool_true_default();

    assert!(proxy.farewell().unwrap());
    let err = proxy.greet().unwrap_err();
    assert!(matches!(err, ProxyError::PolicyTypeMismatch { .. }));
    assert!(err.is_contract_violation());
    proxy.did_finish(1).unwrap();
}

#[test]
fn test_partial_delegate_with_value_default() {
    // Delegate implements greet() only; the default holds `true`.
    let handle: Arc<dyn GreeterDelegate> = Arc::new(GreetOnly);
    let proxy = GreeterProxy::new(Some(&handle)).with_default_return(true);

    assert_eq!(proxy.greet().unwrap(), "hi there");
    assert!(proxy.farewell().unwrap());
}

#[test]
fn test_value_default_type_must_match() {
    let proxy = GreeterProxy::new(None).with_default_return(42_u64);

    let err = proxy.greet().unwrap_err();
    match err {
        ProxyError::PolicyTypeMismatch {
            selector,
            expected,
            found,
        } => {
            assert_eq!(selector.as_str(), "greet");
            assert_eq!(expected, std::any::type_name::<String>());
            assert_eq!(found, "u64");
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_no_default_fails_loudly_for_returning_methods() {
    let proxy = GreeterProxy::new(None);
    assert!(matches!(
        proxy.greet().unwrap_err(),
        ProxyError::UndefinedDefault { .. }
    ));
    assert!(matches!(
        proxy.farewell().unwrap_err(),
        ProxyError::UndefinedDefault { .. }
    ));
    proxy.did_finish(1).unwrap();
}

#[test]
fn test_proxy_conforms_to_the_trait() {
    fn ask(delegate: &dyn GreeterDelegate) -> Option<bool> {
        delegate.farewell()
    }

    let handle: Arc<dyn GreeterDelegate> = Arc::new(GreetOnly);
    let proxy = GreeterProxy::new(Some(&handle));

    // Unanswered calls read as "not implemented" through the trait.
    assert_eq!(ask(&proxy), None);
    assert_eq!(ask(&proxy.clone().with_bool_true_default()), Some(true));
    assert_eq!(GreeterDelegate::greet(&proxy).as_deref(), Some("hi there"));

    assert!(proxy.responds_to("did_finish"));
    assert!(!proxy.responds_to("shout"));
    assert!(proxy.conforms_to(&<dyn GreeterDelegate as Capability>::protocol()));
}

#[test]
fn test_proxies_chain_through_the_trait() {
    let handle: Arc<dyn GreeterDelegate> = Arc::new(GreetOnly);
    let inner: Arc<dyn GreeterDelegate> =
        Arc::new(GreeterProxy::new(Some(&handle)).with_bool_true_default());
    let outer = GreeterProxy::new(Some(&inner));

    assert_eq!(outer.greet().unwrap(), "hi there");
    assert!(outer.farewell().unwrap());
}

#[test]
fn test_dropping_the_delegate_detaches() {
    let handle: Arc<dyn GreeterDelegate> = Arc::new(GreetOnly);
    let proxy = GreeterProxy::new(Some(&handle)).with_default_return("gone".to_string());
    assert!(proxy.is_attached());
    assert_eq!(proxy.greet().unwrap(), "hi there");

    drop(handle);
    assert!(proxy.delegate().is_none());
    assert_eq!(proxy.greet().unwrap(), "gone");
}

/// An owner exposing a `delegate` property backed by a proxy.
#[derive(Default)]
struct Greeter {
    delegate: DelegateSlot<GreeterProxy>,
}

impl Greeter {
    delegate_property!(delegate: GreeterProxy);

    fn say_goodbye(&self) -> bool {
        self.delegate
            .proxy()
            .is_some_and(|proxy| proxy.farewell().unwrap_or(false))
    }
}

#[test]
fn test_owner_property_hides_the_proxy() {
    let mut greeter = Greeter {
        delegate: DelegateSlot::new().with_bool_true_default(),
    };
    assert!(greeter.delegate().is_none());
    assert!(!greeter.say_goodbye());

    let handle: Arc<dyn GreeterDelegate> = Arc::new(GreetOnly);
    greeter.set_delegate(Some(&handle));
    assert!(Arc::ptr_eq(&greeter.delegate().unwrap(), &handle));
    assert!(greeter.say_goodbye());

    greeter.set_delegate(None);
    assert!(greeter.delegate().is_none());
}

#[test]
fn test_property_accessors_can_be_renamed() {
    #[derive(Default)]
    struct Table {
        data_source: DelegateSlot<GreeterProxy>,
    }

    impl Table {
        delegate_property!(data_source: GreeterProxy, data_source, set_data_source);
    }

    let mut table = Table::default();
    let handle: Arc<dyn GreeterDelegate> = Arc::new(Complete::default());
    table.set_data_source(Some(&handle));
    assert!(table.data_source().is_some());
}
