//! Proxy strategies and the bypass/proxy decision.
//!
//! Rust has no runtime proxy generation, so the proxy engine is rendered as
//! compile-time decorator generation: a service contract opts into one of two
//! strategies by implementing [`InterfaceProxy`] (for trait-object services)
//! or [`ClassProxy`] (for concrete class services). The
//! [`interface_proxy!`](crate::interface_proxy) macro writes the trait-object
//! decorator mechanically.

use std::sync::Arc;

use super::invocation::InterceptorChain;

/// Interface-proxy strategy, implemented for `dyn Service` trait objects.
///
/// Given the real implementation and an interceptor chain, produces a value
/// with the same public contract whose members run the chain before
/// delegating to the target. Usually generated by
/// [`interface_proxy!`](crate::interface_proxy) rather than written by hand.
pub trait InterfaceProxy: Send + Sync {
    /// Wraps `target` in a decorator applying `chain` around every member.
    fn interface_proxy(target: Arc<Self>, chain: InterceptorChain) -> Arc<Self>;
}

/// Class-proxy strategy, implemented by concrete service types.
///
/// The created instance is consumed (its state is the already-resolved
/// constructor arguments) and returned with the chain installed. Only the
/// members the type routes through its chain are intercepted; any other
/// member bypasses the chain, mirroring non-overridable members under a
/// subclassing proxy engine.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{ClassProxy, InterceptorChain};
/// use std::sync::Mutex;
///
/// struct Ledger {
///     chain: InterceptorChain,
///     entries: Mutex<Vec<String>>,
/// }
///
/// impl Ledger {
///     fn new() -> Self {
///         Self { chain: InterceptorChain::default(), entries: Mutex::new(Vec::new()) }
///     }
///
///     // Interceptable member: routed through the chain.
///     fn record(&self, entry: &str) {
///         self.chain.invoke("Ledger", "record", || {
///             self.entries.lock().unwrap().push(entry.to_string());
///         })
///     }
/// }
///
/// impl ClassProxy for Ledger {
///     fn class_proxy(mut self, chain: InterceptorChain) -> Self {
///         self.chain = chain;
///         self
///     }
/// }
/// ```
pub trait ClassProxy: Sized + Send + Sync {
    /// Installs `chain` on this instance's interceptable members.
    fn class_proxy(self, chain: InterceptorChain) -> Self;
}

/// The proxy decision for trait-object services: an empty chain exposes the
/// created instance unmodified (no proxy is built); a non-empty chain wraps
/// it in an interface proxy.
///
/// Entered fresh per resolution; holds no state across calls.
pub fn expose_interface<T>(target: Arc<T>, chain: InterceptorChain) -> Arc<T>
where
    T: ?Sized + InterfaceProxy,
{
    if chain.is_empty() {
        target
    } else {
        T::interface_proxy(target, chain)
    }
}

/// The proxy decision for concrete class services: an empty chain exposes the
/// created instance unmodified; a non-empty chain installs the chain via the
/// class-proxy strategy.
pub fn expose_class<T: ClassProxy>(instance: T, chain: InterceptorChain) -> T {
    if chain.is_empty() {
        instance
    } else {
        instance.class_proxy(chain)
    }
}

/// Declares a service trait and generates its interception decorator.
///
/// Expands to the trait itself (with `Send + Sync` supertraits), a hidden
/// decorator type forwarding every member through an
/// [`InterceptorChain`](crate::InterceptorChain), and an
/// [`InterfaceProxy`](crate::InterfaceProxy) impl for the trait object, so
/// the trait can be used directly with the intercepted registration entry
/// points.
///
/// Members must be `&self` methods with owned or borrowed arguments and a
/// `'static` return type (or none).
///
/// # Examples
///
/// ```rust
/// use intercept_di::interface_proxy;
///
/// interface_proxy! {
///     /// Resolves display names.
///     pub trait NameService {
///         fn get_name(&self) -> String;
///     }
/// }
///
/// struct DefaultNameService;
/// impl NameService for DefaultNameService {
///     fn get_name(&self) -> String {
///         "DefaultNameService".to_string()
///     }
/// }
/// ```
#[macro_export]
macro_rules! interface_proxy {
    (
        $(#[$attr:meta])*
        $vis:vis trait $name:ident {
            $(
                $(#[$method_attr:meta])*
                fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)* $(,)?) $(-> $ret:ty)?;
            )*
        }
    ) => {
        $(#[$attr])*
        $vis trait $name: Send + Sync {
            $(
                $(#[$method_attr])*
                fn $method(&self $(, $arg: $arg_ty)*) $(-> $ret)?;
            )*
        }

        const _: () = {
            struct Decorator {
                target: ::std::sync::Arc<dyn $name>,
                chain: $crate::InterceptorChain,
            }

            impl $name for Decorator {
                $(
                    fn $method(&self $(, $arg: $arg_ty)*) $(-> $ret)? {
                        let target = ::std::sync::Arc::clone(&self.target);
                        self.chain.invoke(
                            ::std::stringify!($name),
                            ::std::stringify!($method),
                            move || target.$method($($arg),*),
                        )
                    }
                )*
            }

            impl $crate::InterfaceProxy for dyn $name {
                fn interface_proxy(
                    target: ::std::sync::Arc<dyn $name>,
                    chain: $crate::InterceptorChain,
                ) -> ::std::sync::Arc<dyn $name> {
                    ::std::sync::Arc::new(Decorator { target, chain })
                }
            }
        };
    };
}
