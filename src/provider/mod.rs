//! Resolution side of the container.
//!
//! Once a [`ServiceCollection`](crate::ServiceCollection) is built, the
//! [`ServiceProvider`] here is the only way services come out of it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use once_cell::sync::OnceCell;

use crate::error::{DiError, DiResult};
use crate::internal::with_cycle_guard;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::Observers;
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::{Resolver, ResolverCore};

pub mod context;
pub mod scope;

pub use context::ResolverContext;
pub use scope::Scope;

/// Root resolver over a finalized registration set.
///
/// Services come back per their registered lifetimes. For registrations
/// planned with an interceptor source, the stored factory materializes the
/// chain and applies the proxy decision on each invocation; the provider
/// itself only supplies the lifetime caching around that factory.
///
/// Cloning is cheap (`Arc` internally) and the provider may be shared
/// across threads. Singleton cells initialize at most once; stored
/// factories hold no shared mutable state, so concurrent invocations of the
/// same factory are independent.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Credentials { token: String }
/// struct ApiClient { creds: Arc<Credentials> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Credentials { token: "t-123".to_string() });
/// services.add_transient_factory::<ApiClient, _>(|r| ApiClient {
///     creds: r.get_required::<Credentials>(),
/// });
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<ApiClient>().creds.token, "t-123");
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) registry: Registry,
    /// Singleton cache for multi-binding registrations
    pub(crate) multi_singletons: Mutex<HashMap<Key, AnyArc>>,
    pub(crate) observers: Observers,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry, observers: Observers) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                multi_singletons: Mutex::new(HashMap::new()),
                observers,
            }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    /// Opens a new scope.
    ///
    /// Each scope carries its own slot cache for scoped registrations and
    /// keeps sharing singletons with the root provider.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use intercept_di::{ServiceCollection, Resolver};
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::sync::Arc;
    ///
    /// struct RequestId(u32);
    ///
    /// let next = Arc::new(AtomicU32::new(0));
    /// let next_clone = next.clone();
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_scoped_factory::<RequestId, _>(move |_| {
    ///     RequestId(next_clone.fetch_add(1, Ordering::SeqCst))
    /// });
    ///
    /// let provider = services.build();
    /// let scope_a = provider.create_scope();
    /// let scope_b = provider.create_scope();
    ///
    /// // Cached within a scope, fresh across scopes.
    /// assert_eq!(scope_a.get_required::<RequestId>().0, 0);
    /// assert_eq!(scope_a.get_required::<RequestId>().0, 0);
    /// assert_eq!(scope_b.get_required::<RequestId>().0, 1);
    /// ```
    pub fn create_scope(&self) -> Scope {
        let scoped_count = self.inner().registry.scoped_count;
        let scoped_cells: Box<[OnceCell<AnyArc>]> = (0..scoped_count)
            .map(|_| OnceCell::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Scope {
            root: self.clone(),
            scoped_cells,
        }
    }

    /// Singleton resolution through the registration's embedded cell.
    /// The factory runs at most once per provider; a failed run leaves the
    /// cell empty so the error is observable on every attempt.
    #[inline(always)]
    pub(crate) fn resolve_singleton(&self, reg: &Registration) -> DiResult<AnyArc> {
        if let Some(cell) = &reg.single_cell {
            let value = cell.get_or_try_init(|| {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            })?;
            Ok(value.clone())
        } else {
            let ctx = ResolverContext::new(self);
            (reg.ctor)(&ctx)
        }
    }

    pub(crate) fn resolve_observed(
        &self,
        key: &Key,
        resolve: impl FnOnce() -> DiResult<AnyArc>,
    ) -> DiResult<AnyArc> {
        let observers = &self.inner().observers;
        if observers.is_empty() {
            return resolve();
        }

        observers.resolving(key);
        let start = Instant::now();
        let result = resolve();
        match &result {
            Ok(_) => observers.resolved(key, start.elapsed()),
            Err(error) => observers.resolution_failed(key, error),
        }
        result
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        let name = key.display_name();

        if let Some(reg) = self.inner().registry.get(key) {
            match reg.lifetime {
                Lifetime::Singleton => self.resolve_singleton(reg),
                Lifetime::Scoped => Err(DiError::WrongLifetime(
                    "Cannot resolve scoped service from root provider",
                )),
                Lifetime::Transient => {
                    let ctx = ResolverContext::new(self);
                    (reg.ctor)(&ctx)
                }
            }
        } else if let Key::Trait(trait_name) = key {
            // Fallback: if the trait has multi-bindings, return the last as single
            match self.inner().registry.many.get(trait_name).and_then(|r| r.last()) {
                Some(last) => {
                    let ctx = ResolverContext::new(self);
                    (last.ctor)(&ctx)
                }
                None => Err(DiError::NotFound(name)),
            }
        } else {
            Err(DiError::NotFound(name))
        }
    }

    fn resolve_many_impl(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        let trait_name = match key {
            Key::Trait(name) => *name,
            _ => return Ok(Vec::new()),
        };
        let regs = match self.inner().registry.many.get(trait_name) {
            Some(regs) => regs,
            None => return Ok(Vec::new()),
        };

        let mut results = Vec::with_capacity(regs.len());
        for (i, reg) in regs.iter().enumerate() {
            let multi_key = Key::MultiTrait(trait_name, i);

            let value = match reg.lifetime {
                Lifetime::Singleton => {
                    // Double-checked locking: never hold the lock while a
                    // factory runs.
                    {
                        let cache = self.inner().multi_singletons.lock().unwrap();
                        if let Some(cached) = cache.get(&multi_key) {
                            results.push(cached.clone());
                            continue;
                        }
                    }

                    let ctx = ResolverContext::new(self);
                    let value = (reg.ctor)(&ctx)?;

                    let mut cache = self.inner().multi_singletons.lock().unwrap();
                    match cache.get(&multi_key) {
                        Some(cached) => cached.clone(),
                        None => {
                            cache.insert(multi_key, value.clone());
                            value
                        }
                    }
                }
                Lifetime::Scoped => {
                    return Err(DiError::WrongLifetime(
                        "Cannot resolve scoped service from root provider",
                    ));
                }
                Lifetime::Transient => {
                    let ctx = ResolverContext::new(self);
                    (reg.ctor)(&ctx)?
                }
            };

            results.push(value);
        }

        Ok(results)
    }
}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let name = key.display_name();
        self.resolve_observed(key, || with_cycle_guard(name, || self.resolve_any_impl(key)))
    }

    fn resolve_many(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        if let Key::Trait(_) = key {
            let name = key.display_name();
            with_cycle_guard(name, || self.resolve_many_impl(key))
        } else {
            Ok(Vec::new())
        }
    }
}

impl Resolver for ServiceProvider {}
