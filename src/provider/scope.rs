//! Scoped service resolution.

use once_cell::sync::OnceCell;

use crate::error::{DiError, DiResult};
use crate::internal::with_cycle_guard;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Registration};
use crate::traits::{Resolver, ResolverCore};

use super::{ResolverContext, ServiceProvider};

/// One unit of scoped caching, created by
/// [`ServiceProvider::create_scope`](super::ServiceProvider::create_scope).
///
/// Scoped registrations resolve to one instance per `Scope`; singletons keep
/// coming from the root provider, and transients are fresh on every call. An
/// intercepted scoped registration materializes its interceptor chain once
/// per scope, together with the instance it wraps.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Session(&'static str);
///
/// struct AuditTrail {
///     session: Arc<Session>,
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped_factory::<Session, _>(|_| Session("session-7"));
/// services.add_transient_factory::<AuditTrail, _>(|r| AuditTrail {
///     session: r.get_required::<Session>(),
/// });
///
/// let provider = services.build();
/// let scope = provider.create_scope();
///
/// // Transients created in one scope share that scope's session.
/// let a = scope.get_required::<AuditTrail>();
/// let b = scope.get_required::<AuditTrail>();
/// assert!(Arc::ptr_eq(&a.session, &b.session));
/// ```
pub struct Scope {
    pub(crate) root: ServiceProvider,
    /// Slot-based scoped storage for O(1) access; each cell initializes its
    /// registration's factory at most once per scope.
    pub(crate) scoped_cells: Box<[OnceCell<AnyArc>]>,
}

impl Scope {
    #[inline(always)]
    fn resolve_scoped(&self, reg: &Registration) -> DiResult<AnyArc> {
        match reg.scoped_slot {
            Some(slot) => {
                let cell = &self.scoped_cells[slot];
                let value = cell.get_or_try_init(|| {
                    let ctx = ResolverContext::new(self);
                    (reg.ctor)(&ctx)
                })?;
                Ok(value.clone())
            }
            // Slots are assigned during build; a scoped registration without
            // one can only come from an unfinalized registry.
            None => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        }
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        let name = key.display_name();

        if let Some(reg) = self.root.inner().registry.get(key) {
            match reg.lifetime {
                Lifetime::Singleton => self.root.resolve_singleton(reg),
                Lifetime::Scoped => self.resolve_scoped(reg),
                Lifetime::Transient => {
                    let ctx = ResolverContext::new(self);
                    (reg.ctor)(&ctx)
                }
            }
        } else if let Key::Trait(trait_name) = key {
            match self
                .root
                .inner()
                .registry
                .many
                .get(trait_name)
                .and_then(|r| r.last())
            {
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
        let regs = match self.root.inner().registry.many.get(trait_name) {
            Some(regs) => regs,
            None => return Ok(Vec::new()),
        };

        let mut results = Vec::with_capacity(regs.len());
        for (i, reg) in regs.iter().enumerate() {
            let multi_key = Key::MultiTrait(trait_name, i);

            let value = match reg.lifetime {
                Lifetime::Singleton => {
                    {
                        let cache = self.root.inner().multi_singletons.lock().unwrap();
                        if let Some(cached) = cache.get(&multi_key) {
                            results.push(cached.clone());
                            continue;
                        }
                    }

                    let ctx = ResolverContext::new(&self.root);
                    let value = (reg.ctor)(&ctx)?;

                    let mut cache = self.root.inner().multi_singletons.lock().unwrap();
                    match cache.get(&multi_key) {
                        Some(cached) => cached.clone(),
                        None => {
                            cache.insert(multi_key, value.clone());
                            value
                        }
                    }
                }
                Lifetime::Scoped => self.resolve_scoped(reg)?,
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

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let name = key.display_name();
        self.root
            .resolve_observed(key, || with_cycle_guard(name, || self.resolve_any_impl(key)))
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

impl Resolver for Scope {}
