//! Registration-time validation of interceptor type candidates.
//!
//! Most of the capability checks a reflective container would perform here
//! are compile-time facts in Rust: a candidate named through
//! [`InterceptorTypes::with`](super::InterceptorTypes::with) is necessarily a
//! concrete type implementing the interception capability. What remains
//! checkable, and checked, at registration time is whether each candidate can
//! actually be constructed when the owning service's factory runs.

use crate::collection::ServiceCollection;
use crate::error::{DiError, DiResult, InterceptorViolation, ViolationKind};
use crate::key::Key;
use crate::lifetime::Lifetime;

use super::source::InterceptorTypeRef;

impl ServiceCollection {
    /// Validates a batch of interceptor type candidates for a service being
    /// registered with `service_lifetime`.
    ///
    /// Per candidate, checks in order (first failure recorded):
    /// 1. the type has a registration in this collection;
    /// 2. a scoped candidate is not captured by a singleton service.
    ///
    /// All candidates are checked before any error is raised, so the caller
    /// sees every offending type in one error and no registration side effect
    /// occurs on failure. An empty batch is valid.
    pub(crate) fn validate_interceptor_types(
        &self,
        service_lifetime: Lifetime,
        refs: &[InterceptorTypeRef],
    ) -> DiResult<()> {
        let mut violations = Vec::new();

        for type_ref in refs {
            let key = Key::Type(type_ref.type_id, type_ref.type_name);
            match self.registry.get(&key) {
                None => violations.push(InterceptorViolation {
                    type_name: type_ref.type_name,
                    kind: ViolationKind::Unregistered,
                    service_lifetime,
                }),
                Some(registration) => {
                    if service_lifetime == Lifetime::Singleton
                        && registration.lifetime == Lifetime::Scoped
                    {
                        violations.push(InterceptorViolation {
                            type_name: type_ref.type_name,
                            kind: ViolationKind::CaptiveScoped,
                            service_lifetime,
                        });
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DiError::InvalidInterceptors {
                parameter: "interceptors",
                violations,
            })
        }
    }
}
