//! Publishing planned factories to the container.
//!
//! The registrar is the last step of an intercepted registration: it takes
//! the composed factory (materialize chain, create instance, decide proxy)
//! and stores it in the registry under the requested lifetime and key, in
//! either add or try-add mode.

use crate::collection::ServiceCollection;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{Ctor, Registration};

/// Presence policy for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMode {
    /// Always publish; an existing registration under the same key is
    /// replaced (last registration wins for single-value resolution, which
    /// is the registry's own rule).
    Add,
    /// Publish only if no registration exists for the key. The presence
    /// check looks at the key alone, ignorant of whether the existing
    /// registration is itself intercepted, and a hit makes the call a
    /// no-op: the new factory, interceptor chain included, is discarded.
    TryAdd,
}

impl ServiceCollection {
    /// Stores `ctor` under `key` with the requested lifetime and mode.
    ///
    /// Returns whether a registration was published. Repeated `TryAdd` calls
    /// with the same key are idempotent.
    pub(crate) fn publish(
        &mut self,
        key: Key,
        lifetime: Lifetime,
        mode: RegistrationMode,
        intercepted: bool,
        ctor: Ctor,
    ) -> bool {
        if mode == RegistrationMode::TryAdd && self.registry.contains_key(&key) {
            return false;
        }

        let registration = if intercepted {
            Registration::intercepted(lifetime, ctor)
        } else {
            Registration::new(lifetime, ctor)
        };
        self.registry.insert(key, registration);
        true
    }
}
