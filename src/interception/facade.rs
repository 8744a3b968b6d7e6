//! Intercepted registration entry points.
//!
//! The entry points combine the interceptor source, registration-time
//! validation, the proxy decision, and the registrar for every supported
//! input shape: factory or pre-built instance, trait-object or concrete
//! class service, keyed or unkeyed, add or try-add. Lifetime is fixed per
//! method family; the `*_with` forms accept it explicitly.
//!
//! Every form accepts zero or more interceptor entries; zero entries yields
//! a plain, non-proxied registration. Registration-time faults (invalid
//! interceptor types) surface immediately from the entry point, before any
//! container mutation.

use std::any::TypeId;
use std::sync::{Arc, Mutex};

use crate::collection::ServiceCollection;
use crate::error::{DiError, DiResult};
use crate::key::{key_of_type, Key, ServiceKey};
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;
use crate::registration::AnyArc;

use super::invocation::InterceptorChain;
use super::proxy::{expose_class, expose_interface, ClassProxy, InterfaceProxy};
use super::registrar::RegistrationMode;
use super::source::InterceptorSource;

impl ServiceCollection {
    // ----- General-purpose entry points (explicit lifetime and mode) -----

    /// Registers a concrete class service with an interceptor source,
    /// lifetime, mode, and optional service key all given explicitly.
    ///
    /// The stored factory, invoked by the container per the lifetime's
    /// cadence, materializes the chain, creates the instance, and applies
    /// the class-proxy decision: an empty chain exposes the instance
    /// unchanged, a non-empty chain installs it via [`ClassProxy`].
    ///
    /// Returns whether a registration was published (`TryAdd` against an
    /// existing key publishes nothing). Interceptor *types* are validated as
    /// a whole batch before anything is published.
    pub fn add_intercepted_with<T, F, I>(
        &mut self,
        lifetime: Lifetime,
        mode: RegistrationMode,
        key: Option<ServiceKey>,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        let source = interceptors.into();
        if let InterceptorSource::Types(refs) = &source {
            self.validate_interceptor_types(lifetime, refs)?;
        }
        let intercepted = source.declares_interceptors();

        let service_key = match key {
            Some(token) => Key::TypeKeyed(TypeId::of::<T>(), std::any::type_name::<T>(), token),
            None => key_of_type::<T>(),
        };

        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            let chain = InterceptorChain::new(source.materialize(r)?);
            let instance = factory(r);
            Ok(Arc::new(expose_class(instance, chain)))
        };

        Ok(self.publish(service_key, lifetime, mode, intercepted, Arc::new(ctor)))
    }

    /// Registers a trait-object service with an interceptor source, lifetime,
    /// mode, and optional service key all given explicitly.
    ///
    /// Same shape as [`add_intercepted_with`](Self::add_intercepted_with),
    /// but the proxy decision requests an interface proxy around the factory
    /// output instead of a class proxy.
    pub fn add_intercepted_trait_with<S, F, I>(
        &mut self,
        lifetime: Lifetime,
        mode: RegistrationMode,
        key: Option<ServiceKey>,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        let source = interceptors.into();
        if let InterceptorSource::Types(refs) = &source {
            self.validate_interceptor_types(lifetime, refs)?;
        }
        let intercepted = source.declares_interceptors();

        let service_key = match key {
            Some(token) => Key::TraitKeyed(std::any::type_name::<S>(), token),
            None => Key::Trait(std::any::type_name::<S>()),
        };

        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            let chain = InterceptorChain::new(source.materialize(r)?);
            let target = factory(r);
            let exposed = expose_interface(target, chain);
            Ok(Arc::new(exposed) as AnyArc)
        };

        Ok(self.publish(service_key, lifetime, mode, intercepted, Arc::new(ctor)))
    }

    fn add_intercepted_instance_impl<T, I>(
        &mut self,
        mode: RegistrationMode,
        key: Option<ServiceKey>,
        instance: T,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        I: Into<InterceptorSource>,
    {
        let source = interceptors.into();
        if let InterceptorSource::Types(refs) = &source {
            self.validate_interceptor_types(Lifetime::Singleton, refs)?;
        }
        let intercepted = source.declares_interceptors();

        let service_key = match key {
            Some(token) => Key::TypeKeyed(TypeId::of::<T>(), std::any::type_name::<T>(), token),
            None => key_of_type::<T>(),
        };

        // The instance is consumed when the chain is installed; the singleton
        // cell invokes this factory at most once per provider.
        let slot = Mutex::new(Some(instance));
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            let chain = InterceptorChain::new(source.materialize(r)?);
            let instance = slot.lock().unwrap().take().ok_or(DiError::WrongLifetime(
                "singleton instance factory invoked more than once",
            ))?;
            Ok(Arc::new(expose_class(instance, chain)) as AnyArc)
        };

        Ok(self.publish(service_key, Lifetime::Singleton, mode, intercepted, Arc::new(ctor)))
    }

    fn add_intercepted_trait_instance_impl<S, I>(
        &mut self,
        mode: RegistrationMode,
        key: Option<ServiceKey>,
        instance: Arc<S>,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        I: Into<InterceptorSource>,
    {
        let source = interceptors.into();
        if let InterceptorSource::Types(refs) = &source {
            self.validate_interceptor_types(Lifetime::Singleton, refs)?;
        }
        let intercepted = source.declares_interceptors();

        let service_key = match key {
            Some(token) => Key::TraitKeyed(std::any::type_name::<S>(), token),
            None => Key::Trait(std::any::type_name::<S>()),
        };

        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            let chain = InterceptorChain::new(source.materialize(r)?);
            let exposed = expose_interface(instance.clone(), chain);
            Ok(Arc::new(exposed) as AnyArc)
        };

        Ok(self.publish(service_key, Lifetime::Singleton, mode, intercepted, Arc::new(ctor)))
    }

    // ----- Concrete class services, factory creation -----

    /// Registers an intercepted transient concrete class service.
    ///
    /// A fresh instance and a freshly materialized chain are produced on
    /// every resolution.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use intercept_di::{
    ///     ClassProxy, Interceptor, InterceptorChain, Invocation, Resolver, ServiceCollection,
    /// };
    /// use std::sync::{Arc, Mutex};
    ///
    /// struct Ledger {
    ///     chain: InterceptorChain,
    ///     entries: Mutex<Vec<String>>,
    /// }
    ///
    /// impl Ledger {
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
    ///
    /// struct Tracing {
    ///     seen: Arc<Mutex<Vec<String>>>,
    /// }
    ///
    /// impl Interceptor for Tracing {
    ///     fn intercept(&self, invocation: &mut Invocation<'_>) {
    ///         self.seen.lock().unwrap().push(invocation.method().to_string());
    ///         invocation.proceed();
    ///     }
    /// }
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let tracing = Arc::new(Tracing { seen: seen.clone() }) as Arc<dyn Interceptor>;
    ///
    /// let mut services = ServiceCollection::new();
    /// services
    ///     .add_transient_intercepted::<Ledger, _, _>(
    ///         |_| Ledger { chain: InterceptorChain::default(), entries: Mutex::new(Vec::new()) },
    ///         vec![tracing],
    ///     )
    ///     .unwrap();
    ///
    /// let provider = services.build();
    /// let ledger = provider.get_required::<Ledger>();
    /// ledger.record("first");
    /// assert_eq!(*seen.lock().unwrap(), vec!["record"]);
    /// ```
    pub fn add_transient_intercepted<T, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Transient, RegistrationMode::Add, None, factory, interceptors)?;
        Ok(self)
    }

    /// Registers an intercepted scoped concrete class service.
    pub fn add_scoped_intercepted<T, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Scoped, RegistrationMode::Add, None, factory, interceptors)?;
        Ok(self)
    }

    /// Registers an intercepted singleton concrete class service.
    pub fn add_singleton_intercepted<T, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Singleton, RegistrationMode::Add, None, factory, interceptors)?;
        Ok(self)
    }

    /// Registers an intercepted transient class service only if absent.
    pub fn try_add_transient_intercepted<T, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Transient, RegistrationMode::TryAdd, None, factory, interceptors)
    }

    /// Registers an intercepted scoped class service only if absent.
    pub fn try_add_scoped_intercepted<T, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Scoped, RegistrationMode::TryAdd, None, factory, interceptors)
    }

    /// Registers an intercepted singleton class service only if absent.
    pub fn try_add_singleton_intercepted<T, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Singleton, RegistrationMode::TryAdd, None, factory, interceptors)
    }

    // ----- Concrete class services, keyed -----

    /// Registers a keyed intercepted transient class service.
    ///
    /// `ServiceKey::Null` is a valid key, distinct from the unkeyed space.
    pub fn add_keyed_transient_intercepted<T, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Transient, RegistrationMode::Add, Some(key), factory, interceptors)?;
        Ok(self)
    }

    /// Registers a keyed intercepted scoped class service.
    pub fn add_keyed_scoped_intercepted<T, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Scoped, RegistrationMode::Add, Some(key), factory, interceptors)?;
        Ok(self)
    }

    /// Registers a keyed intercepted singleton class service.
    pub fn add_keyed_singleton_intercepted<T, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Singleton, RegistrationMode::Add, Some(key), factory, interceptors)?;
        Ok(self)
    }

    /// Registers a keyed intercepted transient class service only if absent.
    pub fn try_add_keyed_transient_intercepted<T, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Transient, RegistrationMode::TryAdd, Some(key), factory, interceptors)
    }

    /// Registers a keyed intercepted scoped class service only if absent.
    pub fn try_add_keyed_scoped_intercepted<T, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Scoped, RegistrationMode::TryAdd, Some(key), factory, interceptors)
    }

    /// Registers a keyed intercepted singleton class service only if absent.
    pub fn try_add_keyed_singleton_intercepted<T, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_with(Lifetime::Singleton, RegistrationMode::TryAdd, Some(key), factory, interceptors)
    }

    // ----- Concrete class services, pre-built instance (singleton only) -----

    /// Registers a pre-built class instance with interceptors, as a singleton.
    ///
    /// A pre-built instance implies singleton semantics: the chain is
    /// materialized once, when the container first resolves the service, and
    /// the exposed instance is retained for the provider's lifetime.
    pub fn add_singleton_intercepted_instance<T, I>(
        &mut self,
        instance: T,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        T: ClassProxy + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_instance_impl(RegistrationMode::Add, None, instance, interceptors)?;
        Ok(self)
    }

    /// Registers a pre-built class instance with interceptors, only if absent.
    pub fn try_add_singleton_intercepted_instance<T, I>(
        &mut self,
        instance: T,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_instance_impl(RegistrationMode::TryAdd, None, instance, interceptors)
    }

    /// Registers a keyed pre-built class instance with interceptors.
    pub fn add_keyed_singleton_intercepted_instance<T, I>(
        &mut self,
        key: ServiceKey,
        instance: T,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        T: ClassProxy + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_instance_impl(RegistrationMode::Add, Some(key), instance, interceptors)?;
        Ok(self)
    }

    /// Registers a keyed pre-built class instance with interceptors, only if absent.
    pub fn try_add_keyed_singleton_intercepted_instance<T, I>(
        &mut self,
        key: ServiceKey,
        instance: T,
        interceptors: I,
    ) -> DiResult<bool>
    where
        T: ClassProxy + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_instance_impl(RegistrationMode::TryAdd, Some(key), instance, interceptors)
    }

    // ----- Trait-object services, factory creation -----

    /// Registers an intercepted transient trait-object service.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use intercept_di::{interface_proxy, Interceptor, Invocation, Resolver, ServiceCollection};
    /// use std::sync::{Arc, Mutex};
    ///
    /// interface_proxy! {
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
    ///
    /// struct MemberRecorder {
    ///     last: Arc<Mutex<Option<String>>>,
    /// }
    ///
    /// impl Interceptor for MemberRecorder {
    ///     fn intercept(&self, invocation: &mut Invocation<'_>) {
    ///         *self.last.lock().unwrap() = Some(invocation.method().to_string());
    ///         invocation.proceed();
    ///     }
    /// }
    ///
    /// let last = Arc::new(Mutex::new(None));
    /// let recorder = Arc::new(MemberRecorder { last: last.clone() }) as Arc<dyn Interceptor>;
    ///
    /// let mut services = ServiceCollection::new();
    /// services
    ///     .add_transient_intercepted_trait::<dyn NameService, _, _>(
    ///         |_| Arc::new(DefaultNameService),
    ///         vec![recorder],
    ///     )
    ///     .unwrap();
    ///
    /// let provider = services.build();
    /// let service = provider.get_required_trait::<dyn NameService>();
    /// assert_eq!(service.get_name(), "DefaultNameService");
    /// assert_eq!(last.lock().unwrap().as_deref(), Some("get_name"));
    /// ```
    pub fn add_transient_intercepted_trait<S, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Transient, RegistrationMode::Add, None, factory, interceptors)?;
        Ok(self)
    }

    /// Registers an intercepted scoped trait-object service.
    pub fn add_scoped_intercepted_trait<S, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Scoped, RegistrationMode::Add, None, factory, interceptors)?;
        Ok(self)
    }

    /// Registers an intercepted singleton trait-object service.
    pub fn add_singleton_intercepted_trait<S, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Singleton, RegistrationMode::Add, None, factory, interceptors)?;
        Ok(self)
    }

    /// Registers an intercepted transient trait service only if absent.
    pub fn try_add_transient_intercepted_trait<S, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Transient, RegistrationMode::TryAdd, None, factory, interceptors)
    }

    /// Registers an intercepted scoped trait service only if absent.
    pub fn try_add_scoped_intercepted_trait<S, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Scoped, RegistrationMode::TryAdd, None, factory, interceptors)
    }

    /// Registers an intercepted singleton trait service only if absent.
    pub fn try_add_singleton_intercepted_trait<S, F, I>(
        &mut self,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Singleton, RegistrationMode::TryAdd, None, factory, interceptors)
    }

    // ----- Trait-object services, keyed -----

    /// Registers a keyed intercepted transient trait service.
    pub fn add_keyed_transient_intercepted_trait<S, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Transient, RegistrationMode::Add, Some(key), factory, interceptors)?;
        Ok(self)
    }

    /// Registers a keyed intercepted scoped trait service.
    pub fn add_keyed_scoped_intercepted_trait<S, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Scoped, RegistrationMode::Add, Some(key), factory, interceptors)?;
        Ok(self)
    }

    /// Registers a keyed intercepted singleton trait service.
    pub fn add_keyed_singleton_intercepted_trait<S, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Singleton, RegistrationMode::Add, Some(key), factory, interceptors)?;
        Ok(self)
    }

    /// Registers a keyed intercepted transient trait service only if absent.
    pub fn try_add_keyed_transient_intercepted_trait<S, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Transient, RegistrationMode::TryAdd, Some(key), factory, interceptors)
    }

    /// Registers a keyed intercepted scoped trait service only if absent.
    pub fn try_add_keyed_scoped_intercepted_trait<S, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Scoped, RegistrationMode::TryAdd, Some(key), factory, interceptors)
    }

    /// Registers a keyed intercepted singleton trait service only if absent.
    pub fn try_add_keyed_singleton_intercepted_trait<S, F, I>(
        &mut self,
        key: ServiceKey,
        factory: F,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        F: Fn(&ResolverContext) -> Arc<S> + Send + Sync + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_with(Lifetime::Singleton, RegistrationMode::TryAdd, Some(key), factory, interceptors)
    }

    // ----- Trait-object services, pre-built instance (singleton only) -----

    /// Registers a pre-built trait implementation with interceptors, as a
    /// singleton.
    ///
    /// With an empty interceptor source the instance is exposed as-is; the
    /// resolved `Arc` is then pointer-equal to the one registered.
    pub fn add_singleton_intercepted_trait_instance<S, I>(
        &mut self,
        instance: Arc<S>,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        S: ?Sized + InterfaceProxy + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_instance_impl(RegistrationMode::Add, None, instance, interceptors)?;
        Ok(self)
    }

    /// Registers a pre-built trait implementation with interceptors, only if absent.
    pub fn try_add_singleton_intercepted_trait_instance<S, I>(
        &mut self,
        instance: Arc<S>,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_instance_impl(RegistrationMode::TryAdd, None, instance, interceptors)
    }

    /// Registers a keyed pre-built trait implementation with interceptors.
    pub fn add_keyed_singleton_intercepted_trait_instance<S, I>(
        &mut self,
        key: ServiceKey,
        instance: Arc<S>,
        interceptors: I,
    ) -> DiResult<&mut Self>
    where
        S: ?Sized + InterfaceProxy + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_instance_impl(RegistrationMode::Add, Some(key), instance, interceptors)?;
        Ok(self)
    }

    /// Registers a keyed pre-built trait implementation with interceptors,
    /// only if absent.
    pub fn try_add_keyed_singleton_intercepted_trait_instance<S, I>(
        &mut self,
        key: ServiceKey,
        instance: Arc<S>,
        interceptors: I,
    ) -> DiResult<bool>
    where
        S: ?Sized + InterfaceProxy + 'static,
        I: Into<InterceptorSource>,
    {
        self.add_intercepted_trait_instance_impl(RegistrationMode::TryAdd, Some(key), instance, interceptors)
    }
}
