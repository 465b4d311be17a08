//! Test fixtures for common protocols and invocations.

use std::sync::Arc;

use serde_json::Value;
use surrogate_proxy::{Invocation, Protocol};

/// `GreeterDelegate`: `greet` (value), `farewell` (bool), `did_finish` (void).
///
/// # Panics
///
/// Panics if the protocol builder rejects the declaration.
#[must_use]
pub fn greeter_protocol() -> Arc<Protocol> {
    Arc::new(
        Protocol::builder("GreeterDelegate")
            .value_method("greet")
            .bool_method("farewell")
            .void_method("did_finish")
            .build()
            .expect("greeter protocol is valid"),
    )
}

/// `ScrollViewDelegate`: `did_scroll` (void), `should_scroll_to_top` (bool).
///
/// # Panics
///
/// Panics if the protocol builder rejects the declaration.
#[must_use]
pub fn scroll_protocol() -> Arc<Protocol> {
    Arc::new(
        Protocol::builder("ScrollViewDelegate")
            .void_method("did_scroll")
            .bool_method("should_scroll_to_top")
            .build()
            .expect("scroll protocol is valid"),
    )
}

/// `TableViewDelegate`, adopting [`scroll_protocol`]:
/// `should_highlight_row` (bool), `height_for_row` (value).
///
/// # Panics
///
/// Panics if the protocol builder rejects the declaration.
#[must_use]
pub fn table_protocol() -> Arc<Protocol> {
    Arc::new(
        Protocol::builder("TableViewDelegate")
            .bool_method("should_highlight_row")
            .value_method("height_for_row")
            .adopting(scroll_protocol())
            .build()
            .expect("table protocol is valid"),
    )
}

/// Create an invocation with the given arguments.
#[must_use]
pub fn test_invocation<I, A>(selector: &str, arguments: I) -> Invocation
where
    I: IntoIterator<Item = A>,
    A: Into<Value>,
{
    Invocation::new(selector).with_arguments(arguments.into_iter().map(Into::into).collect())
}
