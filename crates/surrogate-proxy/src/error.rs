//! Proxy error types.

use thiserror::Error;

use crate::protocol::Selector;

/// A failure raised by a delegate.
///
/// The proxy carries it to the caller untouched; downcast it to recover the
/// delegate's own error type.
pub type DelegateError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a delegate proxy.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The selector is not part of the proxy's protocol.
    #[error("`{selector}` is not part of protocol {protocol}")]
    UnsupportedCapability {
        /// Name of the protocol the proxy represents.
        protocol: String,
        /// The selector that was invoked.
        selector: Selector,
    },

    /// Nothing answered a call that expects a return value.
    #[error("no delegate answered `{selector}` on {protocol} and no default return is configured")]
    UndefinedDefault {
        /// Name of the protocol the proxy represents.
        protocol: String,
        /// The selector that was invoked.
        selector: Selector,
    },

    /// The configured default cannot stand in for the method's return type.
    #[error("default return for `{selector}` is {found}, but the method returns {expected}")]
    PolicyTypeMismatch {
        /// The selector that was invoked.
        selector: Selector,
        /// The return type the method declares.
        expected: String,
        /// The type held by the default policy.
        found: String,
    },

    /// A protocol declaration is malformed.
    #[error("invalid protocol: {0}")]
    InvalidProtocol(String),

    /// The delegate failed; the error is the delegate's own.
    #[error(transparent)]
    Delegate(#[from] DelegateError),
}

impl ProxyError {
    /// Whether this error marks a programming error at the call site rather
    /// than a runtime failure of the delegate.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedCapability { .. }
                | Self::UndefinedDefault { .. }
                | Self::PolicyTypeMismatch { .. }
        )
    }

    /// The delegate's error, if the delegate is what failed.
    #[must_use]
    pub fn delegate_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Delegate(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;
