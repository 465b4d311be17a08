//! Default-value policies for calls no delegate answers.

use serde_json::{Number, Value};
use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::error::{ProxyError, ProxyResult};
use crate::protocol::{MethodSpec, Protocol, ReturnKind};

type Produce = dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync;

/// An opaque value handed back for unanswered calls.
///
/// Every read yields a fresh clone of the stored value, so the same default
/// can answer any number of calls.
#[derive(Clone)]
pub struct DefaultValue {
    produce: Arc<Produce>,
    type_id: TypeId,
    type_name: &'static str,
}

impl DefaultValue {
    /// Wrap a value.
    #[must_use]
    pub fn new<T: Any + Clone + Send + Sync>(value: T) -> Self {
        Self {
            produce: Arc::new(move || Box::new(value.clone()) as Box<dyn Any + Send + Sync>),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Wrap a JSON value, unpacking scalars into their Rust types.
    ///
    /// `true` becomes a `bool`, `"text"` a `String`, integers `i64`
    /// or `u64`, and floats `f64`; arrays, objects and `null` stay JSON.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(b) => Self::new(b),
            Value::String(s) => Self::new(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::new(i)
                } else if let Some(u) = n.as_u64() {
                    Self::new(u)
                } else if let Some(f) = n.as_f64() {
                    Self::new(f)
                } else {
                    Self::new(Value::Number(n))
                }
            },
            other => Self::new(other),
        }
    }

    /// Name of the stored type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the stored value is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Read the value as a `T`.
    ///
    /// Reading as [`serde_json::Value`] succeeds for any value
    /// [`to_json`](Self::to_json) understands.
    #[must_use]
    pub fn get<T: Any>(&self) -> Option<T> {
        if self.is::<T>() {
            return (self.produce)().downcast::<T>().ok().map(|b| *b);
        }
        if TypeId::of::<T>() == TypeId::of::<Value>() {
            let json: Box<dyn Any> = Box::new(self.to_json()?);
            return json.downcast::<T>().ok().map(|b| *b);
        }
        None
    }

    /// Read the value as JSON.
    ///
    /// Recognises JSON values, booleans, strings, integers and floats;
    /// anything else yields `None`.
    #[must_use]
    pub fn to_json(&self) -> Option<Value> {
        let value = (self.produce)();
        let value: &(dyn Any + Send + Sync) = value.as_ref();

        if let Some(v) = value.downcast_ref::<Value>() {
            return Some(v.clone());
        }
        if let Some(b) = value.downcast_ref::<bool>() {
            return Some(Value::Bool(*b));
        }
        if let Some(s) = value.downcast_ref::<String>() {
            return Some(Value::String(s.clone()));
        }
        if let Some(s) = value.downcast_ref::<&'static str>() {
            return Some(Value::String((*s).to_string()));
        }
        if let Some(i) = value.downcast_ref::<i64>() {
            return Some(Value::from(*i));
        }
        if let Some(i) = value.downcast_ref::<i32>() {
            return Some(Value::from(*i));
        }
        if let Some(u) = value.downcast_ref::<u64>() {
            return Some(Value::from(*u));
        }
        if let Some(u) = value.downcast_ref::<u32>() {
            return Some(Value::from(*u));
        }
        if let Some(f) = value.downcast_ref::<f64>() {
            return Number::from_f64(*f).map(Value::Number);
        }
        None
    }
}

impl std::fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultValue")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// What a proxy returns when it cannot forward a call.
#[derive(Debug, Clone, Default)]
pub enum DefaultPolicy {
    /// No default: unanswered calls with a return value fail.
    #[default]
    None,
    /// Unanswered boolean methods return `true`.
    BoolTrue,
    /// Unanswered calls return this value.
    Value(DefaultValue),
}

impl DefaultPolicy {
    /// A policy returning `value` for unanswered calls.
    #[must_use]
    pub fn value<T: Any + Clone + Send + Sync>(value: T) -> Self {
        Self::Value(DefaultValue::new(value))
    }

    /// Whether no default is configured.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Answer an unforwarded typed call.
    ///
    /// The declared return kind decides first: void methods only accept
    /// `T = ()`, and a `T` whose kind differs from the declared one is a
    /// mismatch under every policy.
    pub(crate) fn resolve<T: Any>(
        &self,
        protocol: &Protocol,
        method: &MethodSpec,
    ) -> ProxyResult<T> {
        let requested = std::any::type_name::<T>();

        if method.returns == ReturnKind::Void {
            return produce::<T>(())
                .ok_or_else(|| mismatch(method, &method.returns.to_string(), requested));
        }
        match self {
            Self::None => Err(undefined(protocol, method)),
            _ if ReturnKind::of::<T>() != method.returns => {
                Err(mismatch(method, &method.returns.to_string(), requested))
            },
            Self::BoolTrue => produce::<T>(true).ok_or_else(|| mismatch(method, requested, "bool")),
            Self::Value(value) => value
                .get::<T>()
                .ok_or_else(|| mismatch(method, requested, value.type_name())),
        }
    }

    /// Answer an unforwarded dynamic call.
    pub(crate) fn resolve_json(
        &self,
        protocol: &Protocol,
        method: &MethodSpec,
    ) -> ProxyResult<Value> {
        if method.returns == ReturnKind::Void {
            return Ok(Value::Null);
        }
        match self {
            Self::None => Err(undefined(protocol, method)),
            Self::BoolTrue if method.returns == ReturnKind::Bool => Ok(Value::Bool(true)),
            Self::BoolTrue => Err(mismatch(method, &method.returns.to_string(), "bool")),
            Self::Value(value) => match value.to_json() {
                Some(json) if method.returns == ReturnKind::Bool && !json.is_boolean() => {
                    Err(mismatch(method, "bool", value.type_name()))
                },
                Some(json) => Ok(json),
                None => Err(mismatch(method, "json", value.type_name())),
            },
        }
    }
}

/// Hand `value` back as a `T` when `T` is its type.
fn produce<T: Any>(value: impl Any) -> Option<T> {
    let boxed: Box<dyn Any> = Box::new(value);
    boxed.downcast::<T>().ok().map(|b| *b)
}

fn undefined(protocol: &Protocol, method: &MethodSpec) -> ProxyError {
    ProxyError::UndefinedDefault {
        protocol: protocol.name().to_string(),
        selector: method.selector.clone(),
    }
}

fn mismatch(method: &MethodSpec, expected: &str, found: &str) -> ProxyError {
    ProxyError::PolicyTypeMismatch {
        selector: method.selector.clone(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}
