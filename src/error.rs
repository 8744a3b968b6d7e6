//! Failure taxonomy for registration and resolution.

use std::fmt;

use crate::lifetime::Lifetime;

/// The reason an interceptor type candidate was rejected at registration time.
///
/// Candidates are checked in a fixed order and the first failing check
/// determines the reason recorded for that candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The interceptor type has no registration in the collection, so it
    /// could not be constructed with its dependencies at resolution time.
    Unregistered,
    /// The interceptor type is registered Scoped while the owning service is
    /// a Singleton; the chain would capture a scoped instance for the
    /// lifetime of the provider.
    CaptiveScoped,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Unregistered => write!(f, "not registered"),
            ViolationKind::CaptiveScoped => {
                write!(f, "scoped interceptor under a singleton service")
            }
        }
    }
}

/// A single rejected interceptor type candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptorViolation {
    /// The offending interceptor type's name
    pub type_name: &'static str,
    /// Why the candidate was rejected
    pub kind: ViolationKind,
    /// The lifetime of the owning service being registered
    pub service_lifetime: Lifetime,
}

/// Everything that can go wrong while registering, planning interception
/// for, or resolving a service.
///
/// Errors are never wrapped or retried anywhere in the crate; whatever layer
/// they originate in, they surface unchanged at the call that triggered them.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(name)) => assert_eq!(name, "alloc::string::String"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// No registration under the requested key.
    NotFound(&'static str),
    /// A stored value failed to downcast to the requested type.
    TypeMismatch(&'static str),
    /// Re-entrant resolution of a key; carries the full path.
    Circular(Vec<&'static str>),
    /// Resolution at an invalid lifetime position, e.g. scoped from root.
    WrongLifetime(&'static str),
    /// One or more interceptor type candidates failed validation.
    ///
    /// All candidates in a batch are checked before this error is raised, so
    /// `violations` names every offending type at once. `parameter` is the
    /// stable identifier of the registration parameter that carried the
    /// candidates, letting callers attribute the fault.
    InvalidInterceptors {
        /// Stable name of the offending registration parameter
        parameter: &'static str,
        /// Every rejected candidate with its reason
        violations: Vec<InterceptorViolation>,
    },
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::WrongLifetime(msg) => write!(f, "Lifetime error: {}", msg),
            DiError::InvalidInterceptors { parameter, violations } => {
                write!(f, "Invalid interceptor types for `{}`:", parameter)?;
                for violation in violations {
                    write!(f, " {} ({});", violation.type_name, violation.kind)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout the crate.
pub type DiResult<T> = Result<T, DiError>;
