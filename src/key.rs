//! Registration identity: what a service is filed under.

use std::any::TypeId;
use std::fmt;

/// Caller-supplied token distinguishing keyed registrations of the same service type.
///
/// A keyed registration lives in a different registration space than an unkeyed one,
/// and `ServiceKey::Null` is itself a valid key, distinct both from "no key" and from
/// every named key. Two registrations of the same service type under two distinct
/// keys resolve independently, regardless of lifetime.
///
/// # Examples
///
/// ```rust
/// use intercept_di::ServiceKey;
///
/// let primary = ServiceKey::from("primary");
/// let null = ServiceKey::Null;
///
/// assert_ne!(primary, null);
/// assert_eq!(primary, ServiceKey::Name("primary"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceKey {
    /// The null key: a valid, distinct key token
    Null,
    /// A named key token
    Name(&'static str),
}

impl From<&'static str> for ServiceKey {
    fn from(name: &'static str) -> Self {
        ServiceKey::Name(name)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKey::Null => write!(f, "<null>"),
            ServiceKey::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Identity a registration is stored and looked up under.
///
/// Covers concrete types, single and multi-bound traits, and the keyed
/// variants of each. Two keys that differ only in their [`ServiceKey`]
/// token, or in whether they carry one at all, name independent
/// registrations.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{Key, ServiceKey};
/// use std::any::TypeId;
///
/// let unkeyed = Key::Type(TypeId::of::<u32>(), "u32");
/// let keyed = Key::TypeKeyed(TypeId::of::<u32>(), "u32", ServiceKey::Name("port"));
/// assert_ne!(unkeyed, keyed);
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type, identified by TypeId; the name rides along for messages.
    Type(TypeId, &'static str),
    /// Single trait binding.
    ///
    /// Trait objects have no usable TypeId, so the trait name is the identity.
    Trait(&'static str),
    /// One entry of a trait's multi-binding list, by position.
    MultiTrait(&'static str, usize),
    /// Concrete type under a [`ServiceKey`] token.
    ///
    /// `ServiceKey::Null` and `ServiceKey::Name(..)` are distinct spaces.
    TypeKeyed(TypeId, &'static str, ServiceKey),
    /// Trait binding under a [`ServiceKey`] token.
    TraitKeyed(&'static str, ServiceKey),
}

impl Key {
    /// The `std::any::type_name` string this key carries for diagnostics.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
            Key::MultiTrait(name, _) => name,
            Key::TypeKeyed(_, name, _) => name,
            Key::TraitKeyed(name, _) => name,
        }
    }

    /// Get the service key for keyed registrations, or None for unkeyed ones
    ///
    /// ```rust
    /// use intercept_di::{Key, ServiceKey};
    /// use std::any::TypeId;
    ///
    /// let unkeyed = Key::Type(TypeId::of::<u32>(), "u32");
    /// assert_eq!(unkeyed.service_key(), None);
    ///
    /// let keyed = Key::TraitKeyed("dyn myapp::Logger", ServiceKey::Null);
    /// assert_eq!(keyed.service_key(), Some(ServiceKey::Null));
    /// ```
    pub fn service_key(&self) -> Option<ServiceKey> {
        match self {
            Key::Type(_, _) | Key::Trait(_) | Key::MultiTrait(_, _) => None,
            Key::TypeKeyed(_, _, key) => Some(*key),
            Key::TraitKeyed(_, key) => Some(*key),
        }
    }
}

// TypeId-only comparison for concrete types on the hot path; the name string
// is carried for diagnostics only.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::TypeKeyed(a, _, ka), Key::TypeKeyed(b, _, kb)) => a == b && ka == kb,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            (Key::TraitKeyed(a, ka), Key::TraitKeyed(b, kb)) => a == b && ka == kb,
            (Key::MultiTrait(a, ia), Key::MultiTrait(b, ib)) => a == b && ia == ib,
            _ => false,
        }
    }
}

impl Eq for Key {}

// Ordering for sorting in the hybrid registry
impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a.cmp(b),
            (Key::TypeKeyed(a, _, ka), Key::TypeKeyed(b, _, kb)) => {
                a.cmp(b).then_with(|| ka.cmp(kb))
            }

            (Key::Type(_, _), _) => Ordering::Less,
            (_, Key::Type(_, _)) => Ordering::Greater,
            (Key::TypeKeyed(_, _, _), _) => Ordering::Less,
            (_, Key::TypeKeyed(_, _, _)) => Ordering::Greater,

            (Key::Trait(a), Key::Trait(b)) => a.cmp(b),
            (Key::TraitKeyed(a, ka), Key::TraitKeyed(b, kb)) => {
                a.cmp(b).then_with(|| ka.cmp(kb))
            }
            (Key::MultiTrait(a, ia), Key::MultiTrait(b, ib)) => {
                a.cmp(b).then_with(|| ia.cmp(ib))
            }

            (Key::Trait(_), _) => Ordering::Less,
            (_, Key::Trait(_)) => Ordering::Greater,
            (Key::TraitKeyed(_, _), _) => Ordering::Less,
            (_, Key::TraitKeyed(_, _)) => Ordering::Greater,
        }
    }
}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
            Key::MultiTrait(name, idx) => {
                2u8.hash(state);
                name.hash(state);
                idx.hash(state);
            }
            Key::TypeKeyed(id, _, key) => {
                3u8.hash(state);
                id.hash(state);
                key.hash(state);
            }
            Key::TraitKeyed(name, key) => {
                4u8.hash(state);
                name.hash(state);
                key.hash(state);
            }
        }
    }
}

/// Helper for creating concrete type keys
#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Helper for creating trait keys
#[inline(always)]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}
