//! Resolver traits for service resolution.

use std::any::TypeId;
use std::sync::Arc;

use crate::error::DiResult;
use crate::key::{Key, ServiceKey};

/// Object-safe resolution core.
///
/// The two methods here are the whole surface the rest of the crate needs
/// from a resolver: look up one registration, or all multi-bindings of a
/// trait. Everything ergonomic lives on [`Resolver`], which is implemented
/// in terms of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service by key.
    ///
    /// Returns the service wrapped in `Arc<dyn Any>`; [`Resolver`] methods
    /// handle the downcast.
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn std::any::Any + Send + Sync>>;

    /// Resolves all multi-bound services for a trait, in registration order.
    ///
    /// Single-bound traits and concrete types return empty vectors.
    fn resolve_many(&self, key: &Key) -> DiResult<Vec<Arc<dyn std::any::Any + Send + Sync>>>;
}

/// Typed resolution interface.
///
/// Implemented by `ServiceProvider`, `Scope`, and the `ResolverContext`
/// handed to factories, so the same `get`/`get_trait` calls work in every
/// resolution position. The `_required` forms panic instead of returning an
/// error and are meant for composition-root code where a missing
/// registration is a configuration bug.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greeting(&self) -> String;
/// }
///
/// struct Terse;
/// impl Greeter for Terse {
///     fn greeting(&self) -> String {
///         "hi".to_string()
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(7usize);
/// services.add_singleton_trait(Arc::new(Terse) as Arc<dyn Greeter>);
///
/// let provider = services.build();
/// assert_eq!(*provider.get_required::<usize>(), 7);
/// assert_eq!(provider.get_required_trait::<dyn Greeter>().greeting(), "hi");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| crate::error::DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a single trait implementation.
    ///
    /// Returns the most recently registered implementation for the trait `T`.
    /// For accessing all implementations, use [`get_all_trait`](Self::get_all_trait).
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = Key::Trait(std::any::type_name::<T>());
        let any = self.resolve_any(&key)?;
        // Trait objects are stored as Arc<Arc<dyn Trait>> inside the Any.
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| crate::error::DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves all registered implementations of a trait, in registration order.
    fn get_all_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Vec<Arc<T>>>
    where
        Arc<T>: 'static,
    {
        let key = Key::Trait(std::any::type_name::<T>());
        let anys = self.resolve_many(&key)?;

        let mut results = Vec::with_capacity(anys.len());
        for any in anys {
            let arc = any
                .downcast::<Arc<T>>()
                .map(|boxed| (*boxed).clone())
                .map_err(|_| crate::error::DiError::TypeMismatch(std::any::type_name::<T>()))?;
            results.push(arc);
        }
        Ok(results)
    }

    /// Resolves a keyed concrete service type.
    ///
    /// The key must match the one used at registration; `ServiceKey::Null` is
    /// a valid key and distinct from the unkeyed registration space.
    fn get_keyed<T: 'static + Send + Sync>(&self, key: ServiceKey) -> DiResult<Arc<T>> {
        let key = Key::TypeKeyed(TypeId::of::<T>(), std::any::type_name::<T>(), key);
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| crate::error::DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a keyed trait implementation.
    fn get_keyed_trait<T: ?Sized + 'static + Send + Sync>(
        &self,
        key: ServiceKey,
    ) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = Key::TraitKeyed(std::any::type_name::<T>(), key);
        let any = self.resolve_any(&key)?;
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| crate::error::DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete service type, panicking on failure.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {:?}", std::any::type_name::<T>(), e))
    }

    /// Resolves a trait implementation, panicking on failure.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T>
    where
        Arc<T>: 'static,
    {
        self.get_trait::<T>().unwrap_or_else(|e| {
            panic!("Failed to resolve trait {}: {:?}", std::any::type_name::<T>(), e)
        })
    }

    /// Resolves a keyed concrete service type, panicking on failure.
    fn get_keyed_required<T: 'static + Send + Sync>(&self, key: ServiceKey) -> Arc<T> {
        self.get_keyed::<T>(key).unwrap_or_else(|e| {
            panic!(
                "Failed to resolve keyed {} ({}): {:?}",
                std::any::type_name::<T>(),
                key,
                e
            )
        })
    }

    /// Resolves a keyed trait implementation, panicking on failure.
    fn get_keyed_trait_required<T: ?Sized + 'static + Send + Sync>(
        &self,
        key: ServiceKey,
    ) -> Arc<T>
    where
        Arc<T>: 'static,
    {
        self.get_keyed_trait::<T>(key).unwrap_or_else(|e| {
            panic!(
                "Failed to resolve keyed trait {} ({}): {:?}",
                std::any::type_name::<T>(),
                key,
                e
            )
        })
    }
}
