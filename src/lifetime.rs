//! Service lifetime definitions.

/// Cadence at which a registration's factory runs and its result is cached.
///
/// The lifetime also governs how often an interceptor chain is materialized
/// for an intercepted registration: once per provider for singletons, once
/// per scope for scoped services, and on every resolution for transients.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Registry(&'static str);
/// struct Mirror(Arc<Registry>);
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Registry("eu-central"));
/// services.add_scoped_factory::<Mirror, _>(|r| Mirror(r.get_required::<Registry>()));
///
/// let provider = services.build();
/// let scope = provider.create_scope();
///
/// // The singleton is one allocation everywhere it appears.
/// let direct = provider.get_required::<Registry>();
/// let via_scope = scope.get_required::<Mirror>();
/// assert!(Arc::ptr_eq(&direct, &via_scope.0));
///
/// // The scoped wrapper is cached for the scope.
/// let again = scope.get_required::<Mirror>();
/// assert!(Arc::ptr_eq(&via_scope, &again));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// One instance per root provider, retained for its whole life.
    Singleton,
    /// One instance per scope; different scopes never share it.
    Scoped,
    /// A fresh instance on every resolution, never cached.
    Transient,
}
