//! Registration surface of the container.
//!
//! [`ServiceCollection`] gathers registrations at composition time and turns
//! them into an immutable [`ServiceProvider`](crate::ServiceProvider) via
//! [`build`](ServiceCollection::build). The intercepted registration entry
//! points live in [`crate::interception`] and publish through the same
//! registry.

use std::any::TypeId;
use std::sync::Arc;

use crate::descriptors::ServiceDescriptor;
use crate::error::DiResult;
use crate::key::{Key, ServiceKey};
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, Observers};
use crate::provider::{ResolverContext, ServiceProvider};
use crate::registration::{AnyArc, Registration, Registry};

pub struct ServiceCollection {
    pub(crate) registry: Registry,
    observers: Observers,
}

impl ServiceCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            observers: Observers::new(),
        }
    }

    // ----- Concrete Type Registrations -----

    /// Registers an already-constructed value as a singleton.
    ///
    /// The value is wrapped in an `Arc` and every resolution returns a clone
    /// of that same `Arc` for the life of the provider.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use intercept_di::ServiceCollection;
    /// struct RetryPolicy {
    ///     max_attempts: u32,
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(RetryPolicy { max_attempts: 3 });
    /// ```
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let arc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.registry.insert(
            crate::key::key_of_type::<T>(),
            Registration::new(Lifetime::Singleton, Arc::new(ctor)),
        );
        self
    }

    /// Registers a singleton built lazily on first resolution.
    ///
    /// The factory runs at most once per provider; its result is cached and
    /// shared thereafter. Dependencies are resolved through the
    /// `ResolverContext` the factory receives.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use intercept_di::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// struct RetryPolicy { max_attempts: u32 }
    /// struct HttpGateway { retries: u32 }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(RetryPolicy { max_attempts: 3 });
    /// services.add_singleton_factory::<HttpGateway, _>(|r| HttpGateway {
    ///     retries: r.get_required::<RetryPolicy>().max_attempts,
    /// });
    /// ```
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a factory invoked once per scope.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a factory invoked on every resolution.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry.insert(
            crate::key::key_of_type::<T>(),
            Registration::new(lifetime, Arc::new(ctor)),
        );
        self
    }

    // ----- Keyed Concrete Type Registrations -----

    /// Registers a keyed singleton instance.
    ///
    /// Keyed services allow multiple registrations of the same type
    /// distinguished by a [`ServiceKey`] token. `ServiceKey::Null` is a valid
    /// key, distinct from the unkeyed registration space and from any named
    /// key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use intercept_di::{ServiceCollection, ServiceKey, Resolver};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_keyed_singleton(ServiceKey::from("primary"), 42usize);
    /// services.add_keyed_singleton(ServiceKey::Null, 100usize);
    ///
    /// let provider = services.build();
    /// assert_eq!(*provider.get_keyed_required::<usize>(ServiceKey::from("primary")), 42);
    /// assert_eq!(*provider.get_keyed_required::<usize>(ServiceKey::Null), 100);
    /// ```
    pub fn add_keyed_singleton<T: 'static + Send + Sync>(
        &mut self,
        key: ServiceKey,
        value: T,
    ) -> &mut Self {
        let arc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.registry.insert(
            Key::TypeKeyed(TypeId::of::<T>(), std::any::type_name::<T>(), key),
            Registration::new(Lifetime::Singleton, Arc::new(ctor)),
        );
        self
    }

    /// Registers a keyed singleton factory.
    pub fn add_keyed_singleton_factory<T, F>(&mut self, key: ServiceKey, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_keyed_factory(key, Lifetime::Singleton, factory)
    }

    /// Registers a keyed scoped factory.
    pub fn add_keyed_scoped_factory<T, F>(&mut self, key: ServiceKey, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_keyed_factory(key, Lifetime::Scoped, factory)
    }

    /// Registers a keyed transient factory.
    pub fn add_keyed_transient_factory<T, F>(&mut self, key: ServiceKey, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_keyed_factory(key, Lifetime::Transient, factory)
    }

    fn add_keyed_factory<T, F>(
        &mut self,
        key: ServiceKey,
        lifetime: Lifetime,
        factory: F,
    ) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry.insert(
            Key::TypeKeyed(TypeId::of::<T>(), std::any::type_name::<T>(), key),
            Registration::new(lifetime, Arc::new(ctor)),
        );
        self
    }

    // ----- Trait Single-Binding Registrations -----

    /// Binds an already-constructed implementation to a trait, as a singleton.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use intercept_di::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Cache: Send + Sync {
    ///     fn get(&self, key: &str) -> Option<String>;
    /// }
    ///
    /// struct NullCache;
    /// impl Cache for NullCache {
    ///     fn get(&self, _key: &str) -> Option<String> {
    ///         None
    ///     }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_trait::<dyn Cache>(Arc::new(NullCache));
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        // Trait objects are stored as Arc<Arc<dyn Trait>> inside the Any.
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.registry.insert(
            Key::Trait(std::any::type_name::<T>()),
            Registration::new(Lifetime::Singleton, Arc::new(ctor)),
        );
        self
    }

    /// Binds a trait to a factory invoked at most once per provider.
    pub fn add_singleton_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_impl(Lifetime::Singleton, factory)
    }

    /// Binds a trait to a factory invoked once per scope.
    pub fn add_scoped_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_impl(Lifetime::Scoped, factory)
    }

    /// Binds a trait to a factory invoked on every resolution.
    pub fn add_transient_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_impl(Lifetime::Transient, factory)
    }

    fn add_trait_factory_impl<Trait, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry.insert(
            Key::Trait(std::any::type_name::<Trait>()),
            Registration::new(lifetime, Arc::new(ctor)),
        );
        self
    }

    // ----- Keyed Trait Registrations -----

    /// Binds an implementation to a trait under a [`ServiceKey`].
    pub fn add_keyed_singleton_trait<T>(&mut self, key: ServiceKey, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.registry.insert(
            Key::TraitKeyed(std::any::type_name::<T>(), key),
            Registration::new(Lifetime::Singleton, Arc::new(ctor)),
        );
        self
    }

    /// Binds a trait to a keyed singleton factory.
    pub fn add_keyed_singleton_trait_factory<Trait, F>(
        &mut self,
        key: ServiceKey,
        factory: F,
    ) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_keyed_trait_factory_impl(key, Lifetime::Singleton, factory)
    }

    /// Binds a trait to a keyed scoped factory.
    pub fn add_keyed_scoped_trait_factory<Trait, F>(
        &mut self,
        key: ServiceKey,
        factory: F,
    ) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_keyed_trait_factory_impl(key, Lifetime::Scoped, factory)
    }

    /// Binds a trait to a keyed transient factory.
    pub fn add_keyed_transient_trait_factory<Trait, F>(
        &mut self,
        key: ServiceKey,
        factory: F,
    ) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_keyed_trait_factory_impl(key, Lifetime::Transient, factory)
    }

    fn add_keyed_trait_factory_impl<Trait, F>(
        &mut self,
        key: ServiceKey,
        lifetime: Lifetime,
        factory: F,
    ) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry.insert(
            Key::TraitKeyed(std::any::type_name::<Trait>(), key),
            Registration::new(lifetime, Arc::new(ctor)),
        );
        self
    }

    // ----- Trait Multi-Binding Registrations -----

    /// Appends an implementation to the trait's multi-binding list.
    ///
    /// Multi-bound implementations accumulate in registration order and are
    /// resolved together with `get_all_trait`. Single-value resolution of the
    /// trait returns the last one registered.
    pub fn add_trait_implementation<T>(&mut self, value: Arc<T>, lifetime: Lifetime) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let name = std::any::type_name::<T>();
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.registry
            .many
            .entry(name)
            .or_default()
            .push(Registration::new(lifetime, Arc::new(ctor)));
        self
    }

    // ----- Conditional Registration (TryAdd*) -----

    /// Registers a singleton value only if the type is not yet registered.
    ///
    /// Returns `true` when the value was registered, `false` when a
    /// registration for the same key already existed and the new value was
    /// discarded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use intercept_di::ServiceCollection;
    ///
    /// let mut services = ServiceCollection::new();
    ///
    /// assert!(services.try_add_singleton(42usize));
    /// assert!(!services.try_add_singleton(100usize)); // Ignored
    /// ```
    pub fn try_add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> bool {
        if self.registry.contains_key(&crate::key::key_of_type::<T>()) {
            false
        } else {
            self.add_singleton(value);
            true
        }
    }

    /// Registers a singleton factory only if the type is not yet registered.
    pub fn try_add_singleton_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        if self.registry.contains_key(&crate::key::key_of_type::<T>()) {
            false
        } else {
            self.add_singleton_factory(factory);
            true
        }
    }

    /// Registers a scoped factory only if the type is not yet registered.
    pub fn try_add_scoped_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        if self.registry.contains_key(&crate::key::key_of_type::<T>()) {
            false
        } else {
            self.add_scoped_factory(factory);
            true
        }
    }

    /// Registers a transient factory only if the type is not yet registered.
    pub fn try_add_transient_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        if self.registry.contains_key(&crate::key::key_of_type::<T>()) {
            false
        } else {
            self.add_transient_factory(factory);
            true
        }
    }

    /// Binds a trait implementation only if the trait is not yet bound.
    pub fn try_add_singleton_trait<T>(&mut self, value: Arc<T>) -> bool
    where
        T: ?Sized + 'static + Send + Sync,
    {
        if self
            .registry
            .contains_key(&Key::Trait(std::any::type_name::<T>()))
        {
            false
        } else {
            self.add_singleton_trait(value);
            true
        }
    }

    /// Binds a trait factory only if the trait is not yet bound.
    pub fn try_add_singleton_trait_factory<Trait, F>(&mut self, factory: F) -> bool
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        if self
            .registry
            .contains_key(&Key::Trait(std::any::type_name::<Trait>()))
        {
            false
        } else {
            self.add_singleton_trait_factory(factory);
            true
        }
    }

    // ----- Presence / Introspection -----

    /// Checks whether any registration exists for the given key.
    ///
    /// The check looks at the key alone; whether the existing registration is
    /// intercepted or not is irrelevant.
    pub fn has_registration(&self, key: &Key) -> bool {
        self.registry.contains_key(key)
    }

    /// Returns a descriptor per single-binding registration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use intercept_di::{ServiceCollection, Lifetime};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(42usize);
    /// services.add_scoped_factory::<String, _>(|_| "hello".to_string());
    ///
    /// let descriptors = services.get_service_descriptors();
    /// assert_eq!(descriptors.len(), 2);
    /// ```
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .iter()
            .map(|(key, registration)| ServiceDescriptor {
                key: key.clone(),
                lifetime: registration.lifetime,
                intercepted: registration.intercepted,
            })
            .collect()
    }

    // ----- Observer Management -----

    /// Attaches a diagnostic observer notified around every resolution.
    ///
    /// Observer calls are made synchronously during resolution; keep
    /// implementations lightweight.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Consumes the collection and produces the provider.
    ///
    /// After this point the registration set is fixed; the provider resolves
    /// services per their lifetimes and can create scopes for scoped ones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use intercept_di::{ServiceCollection, Resolver};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(8080u16);
    /// services.add_transient_factory::<String, _>(|r| {
    ///     format!("listening on :{}", r.get_required::<u16>())
    /// });
    ///
    /// let provider = services.build();
    /// assert_eq!(&*provider.get_required::<String>(), "listening on :8080");
    /// ```
    pub fn build(mut self) -> ServiceProvider {
        // Scoped slot indices are assigned once, here.
        self.registry.finalize();
        ServiceProvider::new(self.registry, self.observers)
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
