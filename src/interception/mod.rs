//! Registration-time interception planning.
//!
//! Lets a caller declare "register service S, and if interceptors are
//! supplied, wrap resolved instances in an interception proxy before handing
//! them to consumers". The pieces:
//!
//! - [`invocation`]: the [`Interceptor`] capability, the per-call
//!   [`Invocation`] context with `proceed()`, and the ordered
//!   [`InterceptorChain`];
//! - [`source`]: [`InterceptorSource`], either pre-built instances or
//!   container-resolved [`InterceptorTypes`], materialized per creation of
//!   the owning service;
//! - validation: whole-batch registration-time checking of interceptor
//!   type candidates;
//! - [`proxy`]: the [`InterfaceProxy`]/[`ClassProxy`] strategies, the
//!   bypass/proxy decision, and the `interface_proxy!` decorator generator;
//! - [`registrar`]: publishing the planned factory under a lifetime, key,
//!   and [`RegistrationMode`];
//! - [`facade`]: the registration entry points on
//!   [`ServiceCollection`](crate::ServiceCollection) combining all of the
//!   above.
//!
//! Registration runs synchronously at composition time and stores a factory;
//! nothing is proxied until the container invokes that factory at resolution
//! time. The stored factory keeps no shared mutable state, so concurrent
//! resolutions are independent.

pub mod facade;
pub mod invocation;
pub mod proxy;
pub mod registrar;
pub mod source;

mod validate;

pub use invocation::{Interceptor, InterceptorChain, Invocation};
pub use proxy::{expose_class, expose_interface, ClassProxy, InterfaceProxy};
pub use registrar::RegistrationMode;
pub use source::{InterceptorSource, InterceptorTypeRef, InterceptorTypes};
