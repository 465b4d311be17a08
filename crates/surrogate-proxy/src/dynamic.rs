//! Dynamic dispatch: forwarding invocations described as data.
//!
//! A [`Responder`] answers [`Invocation`]s by selector with JSON arguments and
//! results. This is the shape to use when the protocol is only known at
//! runtime, e.g. loaded from a manifest.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::{DelegateError, ProxyError, ProxyResult};
use crate::protocol::Selector;
use crate::proxy::DelegateProxy;

/// A method call described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// The method being called.
    pub selector: Selector,
    /// Positional arguments.
    #[serde(default)]
    pub arguments: Vec<Value>,
}

impl Invocation {
    /// An invocation with no arguments.
    #[must_use]
    pub fn new(selector: impl Into<Selector>) -> Self {
        Self {
            selector: selector.into(),
            arguments: Vec::new(),
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<Value>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Replace the arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }
}

/// An object that answers invocations by selector.
pub trait Responder {
    /// Whether this object implements `selector`.
    fn responds_to(&self, selector: &Selector) -> bool;

    /// Perform the invocation.
    ///
    /// Only called for selectors [`responds_to`](Self::responds_to) accepts.
    ///
    /// # Errors
    ///
    /// Any failure of the implementation; proxies pass it on untouched.
    fn invoke(&self, invocation: &Invocation) -> Result<Value, DelegateError>;
}

impl DelegateProxy<dyn Responder> {
    /// Forward an invocation.
    ///
    /// A delegate that fails with a contract-violation [`ProxyError`] (a
    /// stacked proxy that could not answer either) counts as not answering,
    /// so this proxy's own default applies.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::UnsupportedCapability`] if the selector is not in the protocol.
    /// - [`ProxyError::Delegate`] carrying the delegate's own error if it fails.
    /// - [`ProxyError::UndefinedDefault`] or [`ProxyError::PolicyTypeMismatch`]
    ///   if the call falls back to a default that cannot answer it.
    pub fn invoke(&self, invocation: &Invocation) -> ProxyResult<Value> {
        let selector = invocation.selector.as_str();
        let method = self.method(selector)?;

        if let Some(delegate) = self.delegate()
            && delegate.responds_to(&invocation.selector)
        {
            match delegate.invoke(invocation) {
                Ok(answer) => {
                    trace!(protocol = %self.protocol().name(), selector, "forwarded to delegate");
                    return Ok(answer);
                },
                Err(err) => match err.downcast::<ProxyError>() {
                    Ok(inner) if inner.is_contract_violation() => {
                        trace!(
                            protocol = %self.protocol().name(),
                            selector,
                            error = %inner,
                            "stacked proxy could not answer"
                        );
                    },
                    Ok(inner) => return Err(*inner),
                    Err(err) => return Err(ProxyError::Delegate(err)),
                },
            }
        }

        trace!(protocol = %self.protocol().name(), selector, "no delegate answered");
        self.default_policy().resolve_json(self.protocol(), method)
    }

    /// Whether the attached delegate itself implements `selector`.
    ///
    /// Unlike [`responds_to`](DelegateProxy::responds_to), this asks the
    /// delegate, and is `false` when none is attached.
    #[must_use]
    pub fn delegate_responds_to(&self, selector: &Selector) -> bool {
        self.delegate().is_some_and(|d| d.responds_to(selector))
    }
}

/// Proxies are responders themselves, so they can stand in for one another.
impl Responder for DelegateProxy<dyn Responder> {
    fn responds_to(&self, selector: &Selector) -> bool {
        self.protocol().contains(selector.as_str())
    }

    fn invoke(&self, invocation: &Invocation) -> Result<Value, DelegateError> {
        DelegateProxy::<dyn Responder>::invoke(self, invocation).map_err(|err| match err {
            ProxyError::Delegate(inner) => inner,
            other => Box::new(other) as DelegateError,
        })
    }
}
