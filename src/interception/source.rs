//! Interceptor sources and resolution-time materialization.
//!
//! A registration carries its interceptors either as ready-made instances or
//! as a list of interceptor *types* resolved through the container when the
//! owning service is created. The two shapes are mutually exclusive within a
//! single registration and modeled as a tagged variant.

use std::any::TypeId;
use std::sync::Arc;

use crate::error::DiResult;
use crate::provider::ResolverContext;
use crate::traits::Resolver;

use super::invocation::Interceptor;

type InterceptorResolver =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<Arc<dyn Interceptor>> + Send + Sync>;

/// A declared interceptor type plus the means to construct it through the
/// container. Captured statically by [`InterceptorTypes::with`]; the type's
/// identity is kept for validation and error reporting.
#[derive(Clone)]
pub struct InterceptorTypeRef {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) resolve: InterceptorResolver,
}

impl InterceptorTypeRef {
    /// Name of the declared interceptor type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Ordered list of interceptor types to be resolved through the container.
///
/// Each type must be registered in the collection like any other service; its
/// constructor dependencies are satisfied by the container when the owning
/// service is created. Declaration order is application order.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{Interceptor, InterceptorTypes, Invocation};
///
/// struct AuditInterceptor;
/// impl Interceptor for AuditInterceptor {
///     fn intercept(&self, invocation: &mut Invocation<'_>) {
///         invocation.proceed();
///     }
/// }
///
/// struct MetricsInterceptor;
/// impl Interceptor for MetricsInterceptor {
///     fn intercept(&self, invocation: &mut Invocation<'_>) {
///         invocation.proceed();
///     }
/// }
///
/// let types = InterceptorTypes::new()
///     .with::<AuditInterceptor>()
///     .with::<MetricsInterceptor>();
/// assert_eq!(types.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct InterceptorTypes {
    refs: Vec<InterceptorTypeRef>,
}

impl InterceptorTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interceptor type to the list.
    ///
    /// The `Interceptor` bound is the compile-time form of the capability
    /// check: only concrete, constructible interceptor types can be named.
    pub fn with<I>(mut self) -> Self
    where
        I: Interceptor + 'static,
    {
        let resolve = |r: &ResolverContext| -> DiResult<Arc<dyn Interceptor>> {
            let instance = r.get::<I>()?;
            Ok(instance as Arc<dyn Interceptor>)
        };
        self.refs.push(InterceptorTypeRef {
            type_id: TypeId::of::<I>(),
            type_name: std::any::type_name::<I>(),
            resolve: Arc::new(resolve),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// The interceptor source attached to a registration: either pre-built
/// instances or container-resolved types.
#[derive(Clone)]
pub enum InterceptorSource {
    /// Ready-made interceptor instances, applied in the given order.
    Instances(Vec<Arc<dyn Interceptor>>),
    /// Interceptor types resolved through the container per creation of the
    /// owning service.
    Types(Vec<InterceptorTypeRef>),
}

impl InterceptorSource {
    /// An empty source: the registration is published without a proxy.
    pub fn none() -> Self {
        InterceptorSource::Instances(Vec::new())
    }

    /// Whether the source declares any interceptors at all.
    pub fn declares_interceptors(&self) -> bool {
        match self {
            InterceptorSource::Instances(links) => !links.is_empty(),
            InterceptorSource::Types(refs) => !refs.is_empty(),
        }
    }

    /// Converts the source into the ordered list of interceptor instances to
    /// apply, resolving type-based entries through `resolver`.
    ///
    /// Runs once per creation of the owning service, so chains are never
    /// shared across creations unless an interceptor type is itself a
    /// singleton in the container. Resolution errors propagate unchanged.
    pub(crate) fn materialize(
        &self,
        resolver: &ResolverContext<'_>,
    ) -> DiResult<Vec<Arc<dyn Interceptor>>> {
        match self {
            InterceptorSource::Instances(links) => Ok(links.clone()),
            InterceptorSource::Types(refs) => refs
                .iter()
                .map(|type_ref| (type_ref.resolve)(resolver))
                .collect(),
        }
    }
}

impl From<Vec<Arc<dyn Interceptor>>> for InterceptorSource {
    fn from(links: Vec<Arc<dyn Interceptor>>) -> Self {
        InterceptorSource::Instances(links)
    }
}

impl From<Arc<dyn Interceptor>> for InterceptorSource {
    fn from(link: Arc<dyn Interceptor>) -> Self {
        InterceptorSource::Instances(vec![link])
    }
}

impl From<InterceptorTypes> for InterceptorSource {
    fn from(types: InterceptorTypes) -> Self {
        InterceptorSource::Types(types.refs)
    }
}

impl From<()> for InterceptorSource {
    fn from(_: ()) -> Self {
        InterceptorSource::none()
    }
}
