//! Declarative macros for typed protocols and delegate properties.

/// Declare a delegate protocol and its typed proxy.
///
/// Every method in the generated trait returns `Option<R>` and defaults to
/// `None`, meaning "not implemented": a delegate overrides only the methods
/// it cares about. Methods without a return type return `Option<()>`.
///
/// The macro also generates:
/// - a [`Capability`](crate::Capability) impl for `dyn Trait`, naming the
///   protocol after the trait and each selector after its method;
/// - the proxy struct, with one inherent method per protocol method that
///   forwards through [`DelegateProxy::forward`](crate::DelegateProxy::forward)
///   and returns a [`ProxyResult`](crate::ProxyResult);
/// - `Deref`/`DerefMut` from the proxy to its [`DelegateProxy`](crate::DelegateProxy);
/// - an impl of the trait for the proxy, so the proxy can be handed out
///   wherever a delegate is expected. That impl answers `None` for any call
///   the inherent method would fail, logging the dropped error at `debug`;
/// - a [`ProtocolProxy`](crate::ProtocolProxy) impl for use with
///   [`DelegateSlot`](crate::DelegateSlot).
///
/// Return types must be `'static`. Argument types may borrow.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use surrogate_proxy::delegate_protocol;
///
/// delegate_protocol! {
///     /// Receives greeting events.
///     pub trait GreeterDelegate {
///         /// Produce a greeting.
///         fn greet(&self, name: &str) -> String;
///         /// Whether to say goodbye.
///         fn farewell(&self) -> bool;
///     }
///
///     /// Proxy for [`GreeterDelegate`].
///     pub struct GreeterProxy;
/// }
///
/// struct Polite;
///
/// impl GreeterDelegate for Polite {
///     fn greet(&self, name: &str) -> Option<String> {
///         Some(format!("hello, {name}"))
///     }
/// }
///
/// let delegate: Arc<dyn GreeterDelegate> = Arc::new(Polite);
/// let proxy = GreeterProxy::new(Some(&delegate)).with_bool_true_default();
///
/// assert_eq!(proxy.greet("ada").unwrap(), "hello, ada");
/// assert!(proxy.farewell().unwrap());
/// ```
#[macro_export]
macro_rules! delegate_protocol {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)*) $(-> $ret:ty)?;
            )*
        }

        $(#[$proxy_meta:meta])*
        $proxy_vis:vis struct $proxy:ident;
    ) => {
        $(#[$meta])*
        $vis trait $name {
            $(
                $(#[$method_meta])*
                #[allow(unused_variables)]
                fn $method(&self $(, $arg: $arg_ty)*)
                    -> ::core::option::Option<$crate::__surrogate_return_type!($($ret)?)>
                {
                    ::core::option::Option::None
                }
            )*
        }

        impl $crate::Capability for dyn $name {
            fn protocol() -> ::std::sync::Arc<$crate::Protocol> {
                static PROTOCOL: ::std::sync::OnceLock<::std::sync::Arc<$crate::Protocol>> =
                    ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(PROTOCOL.get_or_init(|| {
                    ::std::sync::Arc::new($crate::Protocol::from_declaration(
                        stringify!($name),
                        ::std::vec![
                            $(
                                $crate::MethodSpec::new(
                                    stringify!($method),
                                    $crate::ReturnKind::of::<
                                        $crate::__surrogate_return_type!($($ret)?)
                                    >(),
                                ),
                            )*
                        ],
                    ))
                }))
            }
        }

        $(#[$proxy_meta])*
        #[derive(Debug, Clone)]
        $proxy_vis struct $proxy($crate::DelegateProxy<dyn $name>);

        impl $proxy {
            /// Wrap `delegate` (if any) in a proxy for the protocol.
            #[must_use]
            $proxy_vis fn new(delegate: ::core::option::Option<&::std::sync::Arc<dyn $name>>) -> Self {
                <Self as $crate::ProtocolProxy>::attach(delegate)
            }

            /// Answer `true` for unanswered boolean methods.
            #[must_use]
            $proxy_vis fn with_bool_true_default(self) -> Self {
                Self(self.0.with_bool_true_default())
            }

            /// Answer `value` for unanswered calls.
            #[must_use]
            $proxy_vis fn with_default_return<T>(self, value: T) -> Self
            where
                T: ::core::any::Any + ::core::clone::Clone + ::core::marker::Send + ::core::marker::Sync,
            {
                Self(self.0.with_default_return(value))
            }

            $(
                $(#[$method_meta])*
                $proxy_vis fn $method(&self $(, $arg: $arg_ty)*)
                    -> $crate::ProxyResult<$crate::__surrogate_return_type!($($ret)?)>
                {
                    self.0.forward(stringify!($method), |delegate| delegate.$method($($arg),*))
                }
            )*
        }

        impl $name for $proxy {
            $(
                fn $method(&self $(, $arg: $arg_ty)*)
                    -> ::core::option::Option<$crate::__surrogate_return_type!($($ret)?)>
                {
                    let result = $proxy::$method(self $(, $arg)*);
                    self.0.delegate_answer(stringify!($method), result)
                }
            )*
        }

        impl ::core::ops::Deref for $proxy {
            type Target = $crate::DelegateProxy<dyn $name>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::core::ops::DerefMut for $proxy {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl $crate::ProtocolProxy for $proxy {
            type Delegate = dyn $name;

            fn from_proxy(proxy: $crate::DelegateProxy<dyn $name>) -> Self {
                Self(proxy)
            }

            fn as_proxy(&self) -> &$crate::DelegateProxy<dyn $name> {
                &self.0
            }

            fn as_proxy_mut(&mut self) -> &mut $crate::DelegateProxy<dyn $name> {
                &mut self.0
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __surrogate_return_type {
    () => { () };
    ($ret:ty) => { $ret };
}

/// Generate `delegate` / `set_delegate` accessors over a
/// [`DelegateSlot`](crate::DelegateSlot) field.
///
/// Invoke it inside the owner's `impl` block. The getter returns the real
/// delegate, never the proxy. Pass two more identifiers to choose the
/// accessor names.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use surrogate_proxy::{DelegateSlot, delegate_property, delegate_protocol};
///
/// delegate_protocol! {
///     pub trait DownloadDelegate {
///         fn should_start(&self, url: &str) -> bool;
///     }
///
///     pub struct DownloadProxy;
/// }
///
/// #[derive(Default)]
/// struct Downloader {
///     delegate: DelegateSlot<DownloadProxy>,
/// }
///
/// impl Downloader {
///     delegate_property!(delegate: DownloadProxy);
///
///     fn start(&self, url: &str) -> bool {
///         self.delegate
///             .proxy()
///             .is_some_and(|p| p.should_start(url).unwrap_or(false))
///     }
/// }
///
/// struct AllowAll;
/// impl DownloadDelegate for AllowAll {
///     fn should_start(&self, _url: &str) -> Option<bool> {
///         Some(true)
///     }
/// }
///
/// let mut downloader = Downloader::default();
/// let delegate: Arc<dyn DownloadDelegate> = Arc::new(AllowAll);
/// downloader.set_delegate(Some(&delegate));
/// assert!(downloader.delegate().is_some());
/// assert!(downloader.start("https://example.com"));
/// ```
#[macro_export]
macro_rules! delegate_property {
    ($field:ident : $proxy:ty) => {
        $crate::delegate_property!($field: $proxy, delegate, set_delegate);
    };
    ($field:ident : $proxy:ty, $getter:ident, $setter:ident) => {
        /// The delegate, if one is set and still alive.
        #[must_use]
        pub fn $getter(
            &self,
        ) -> ::core::option::Option<
            ::std::sync::Arc<<$proxy as $crate::ProtocolProxy>::Delegate>,
        > {
            self.$field.get()
        }

        /// Set the delegate; `None` clears it.
        pub fn $setter(
            &mut self,
            delegate: ::core::option::Option<
                &::std::sync::Arc<<$proxy as $crate::ProtocolProxy>::Delegate>,
            >,
        ) {
            self.$field.set(delegate);
        }
    };
}
