//! Read-only view of what a collection has registered.

use crate::key::{Key, ServiceKey};
use crate::lifetime::Lifetime;

/// Snapshot of one registration: its key, lifetime, and whether its factory
/// was planned with an interceptor source. Useful for startup checks and for
/// debugging container configuration.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{Lifetime, ServiceCollection};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(9000u16);
///
/// let descriptors = services.get_service_descriptors();
/// let port = descriptors
///     .iter()
///     .find(|d| d.type_name().contains("u16"))
///     .unwrap();
/// assert_eq!(port.lifetime, Lifetime::Singleton);
/// assert!(!port.intercepted);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// Identity the registration is filed under.
    pub key: Key,
    /// Cadence its factory runs at.
    pub lifetime: Lifetime,
    /// Whether the factory applies an interceptor chain.
    pub intercepted: bool,
}

impl ServiceDescriptor {
    /// The service key token, or `None` for an unkeyed registration.
    pub fn service_key(&self) -> Option<ServiceKey> {
        self.key.service_key()
    }

    /// The registered type or trait name.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Whether the registration carries a service key.
    pub fn is_keyed(&self) -> bool {
        self.service_key().is_some()
    }
}
