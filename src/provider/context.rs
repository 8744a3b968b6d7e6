//! The resolver handle factories see.

use crate::traits::{Resolver, ResolverCore};

/// Borrowed resolver passed into every factory.
///
/// Factories written against `ResolverContext` do not care whether the
/// resolution started at the root provider or inside a scope; the context
/// forwards to whichever started it. Interceptor chains declared by type are
/// materialized through the same context, so type-based interceptors get
/// constructor-injection semantics identical to ordinary services.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Quota(u64);
/// struct Throttle { quota: Arc<Quota> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Quota(100));
/// services.add_transient_factory::<Throttle, _>(|ctx| Throttle {
///     quota: ctx.get_required::<Quota>(),
/// });
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &crate::Key) -> crate::DiResult<crate::registration::AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn resolve_many(
        &self,
        key: &crate::Key,
    ) -> crate::DiResult<Vec<crate::registration::AnyArc>> {
        self.resolver.resolve_many(key)
    }
}

impl<'a> Resolver for ResolverContext<'a> {}
