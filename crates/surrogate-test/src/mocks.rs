//! Mock delegates for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use surrogate_proxy::{DelegateError, Invocation, Responder, Selector};
use thiserror::Error;

/// Error raised by mock delegates for selectors configured to fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mock delegate failed `{selector}`: {message}")]
pub struct MockDelegateError {
    /// The selector that failed.
    pub selector: String,
    /// The configured failure message.
    pub message: String,
}

#[derive(Debug, Clone)]
enum Reply {
    Value(Value),
    Fail(String),
}

/// A [`Responder`] that answers configured selectors and records every call.
///
/// Selectors without a configured reply are reported as not implemented.
/// Uses `std::sync::Mutex` internally so it can be shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct RecordingResponder {
    replies: HashMap<Selector, Reply>,
    invocations: Mutex<Vec<Invocation>>,
}

impl RecordingResponder {
    /// Create a responder that implements nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Implement `selector`, answering `reply`.
    #[must_use]
    pub fn with_reply(mut self, selector: &str, reply: impl Into<Value>) -> Self {
        self.replies
            .insert(Selector::new(selector), Reply::Value(reply.into()));
        self
    }

    /// Implement `selector`, failing with [`MockDelegateError`].
    #[must_use]
    pub fn with_failure(mut self, selector: &str, message: impl Into<String>) -> Self {
        self.replies
            .insert(Selector::new(selector), Reply::Fail(message.into()));
        self
    }

    /// Every invocation received, in order.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// How many times `selector` was invoked.
    #[must_use]
    pub fn call_count(&self, selector: &str) -> usize {
        self.invocations
            .lock()
            .map(|guard| {
                guard
                    .iter()
                    .filter(|i| i.selector.as_str() == selector)
                    .count()
            })
            .unwrap_or_default()
    }

    /// Forget recorded invocations.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.invocations.lock() {
            guard.clear();
        }
    }
}

impl Responder for RecordingResponder {
    fn responds_to(&self, selector: &Selector) -> bool {
        self.replies.contains_key(selector)
    }

    fn invoke(&self, invocation: &Invocation) -> Result<Value, DelegateError> {
        if let Ok(mut guard) = self.invocations.lock() {
            guard.push(invocation.clone());
        }
        tracing::debug!(selector = %invocation.selector, "mock delegate invoked");

        match self.replies.get(&invocation.selector) {
            Some(Reply::Value(value)) => Ok(value.clone()),
            Some(Reply::Fail(message)) => Err(Box::new(MockDelegateError {
                selector: invocation.selector.to_string(),
                message: message.clone(),
            })),
            None => Err(Box::new(MockDelegateError {
                selector: invocation.selector.to_string(),
                message: "not implemented".to_string(),
            })),
        }
    }
}

/// A [`Responder`] that claims every selector and fails all of them.
#[derive(Debug, Clone, Default)]
pub struct FailingResponder {
    message: String,
}

impl FailingResponder {
    /// Create a responder failing with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Responder for FailingResponder {
    fn responds_to(&self, _selector: &Selector) -> bool {
        true
    }

    fn invoke(&self, invocation: &Invocation) -> Result<Value, DelegateError> {
        Err(Box::new(MockDelegateError {
            selector: invocation.selector.to_string(),
            message: self.message.clone(),
        }))
    }
}
