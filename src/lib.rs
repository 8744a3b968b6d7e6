//! # intercept-di
//!
//! Registration-time interception for dependency injection, inspired by
//! Microsoft.Extensions.DependencyInjection and Castle DynamicProxy.
//!
//! ## Features
//!
//! - **Intercepted registrations**: declare interceptors (instances or
//!   container-resolved types) when registering a service; resolved instances
//!   are wrapped in an interception proxy before consumers see them
//! - **Two proxy strategies**: interface proxies for trait-object services
//!   (generated by `interface_proxy!`), class proxies for concrete types
//! - **Type-safe lifetimes**: Singleton, Scoped, and Transient services
//! - **Keyed services**: multiple registrations of one type under distinct
//!   key tokens, the null key included
//! - **Try-add semantics**: conditional registration that never duplicates
//! - **Thread-safe**: Arc-based sharing, at-most-once singleton initialization
//!
//! ## Quick Start
//!
//! ```rust
//! use intercept_di::{interface_proxy, Interceptor, Invocation, Resolver, ServiceCollection};
//! use std::sync::{Arc, Mutex};
//!
//! // Declare a service trait; the macro also generates its interception
//! // decorator.
//! interface_proxy! {
//!     pub trait Greeter {
//!         fn greet(&self, who: String) -> String;
//!     }
//! }
//!
//! struct EnglishGreeter;
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self, who: String) -> String {
//!         format!("hello {}", who)
//!     }
//! }
//!
//! // An interceptor records every member call, then proceeds to the target.
//! struct CallLog {
//!     calls: Arc<Mutex<Vec<String>>>,
//! }
//!
//! impl Interceptor for CallLog {
//!     fn intercept(&self, invocation: &mut Invocation<'_>) {
//!         self.calls.lock().unwrap().push(invocation.method().to_string());
//!         invocation.proceed();
//!     }
//! }
//!
//! let calls = Arc::new(Mutex::new(Vec::new()));
//! let log = Arc::new(CallLog { calls: calls.clone() }) as Arc<dyn Interceptor>;
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .add_transient_intercepted_trait::<dyn Greeter, _, _>(
//!         |_| Arc::new(EnglishGreeter),
//!         vec![log],
//!     )
//!     .unwrap();
//!
//! let provider = services.build();
//! let greeter = provider.get_required_trait::<dyn Greeter>();
//!
//! assert_eq!(greeter.greet("world".to_string()), "hello world");
//! assert_eq!(*calls.lock().unwrap(), vec!["greet"]);
//! ```
//!
//! ## Interceptors resolved by type
//!
//! Interceptor types registered in the container are constructed with their
//! own dependencies when the owning service is created:
//!
//! ```rust
//! use intercept_di::{
//!     interface_proxy, Interceptor, InterceptorTypes, Invocation, Resolver, ServiceCollection,
//! };
//! use std::sync::Arc;
//!
//! interface_proxy! {
//!     pub trait Clock {
//!         fn now(&self) -> u64;
//!     }
//! }
//!
//! struct FixedClock;
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 { 1234 }
//! }
//!
//! struct Passthrough;
//! impl Interceptor for Passthrough {
//!     fn intercept(&self, invocation: &mut Invocation<'_>) {
//!         invocation.proceed();
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_transient_factory::<Passthrough, _>(|_| Passthrough);
//! services
//!     .add_singleton_intercepted_trait::<dyn Clock, _, _>(
//!         |_| Arc::new(FixedClock),
//!         InterceptorTypes::new().with::<Passthrough>(),
//!     )
//!     .unwrap();
//!
//! let provider = services.build();
//! assert_eq!(provider.get_required_trait::<dyn Clock>().now(), 1234);
//! ```

// Module declarations
pub mod collection;
pub mod descriptors;
pub mod error;
pub mod interception;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod provider;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use collection::ServiceCollection;
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult, InterceptorViolation, ViolationKind};
pub use interception::{
    expose_class, expose_interface, ClassProxy, InterceptorChain, InterceptorSource,
    InterceptorTypeRef, InterceptorTypes, Interceptor, InterfaceProxy, Invocation,
    RegistrationMode,
};
pub use key::{key_of_trait, key_of_type, Key, ServiceKey};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver};
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use traits::{Resolver, ResolverCore};
