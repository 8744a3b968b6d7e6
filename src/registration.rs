//! Stored registrations and the registry that holds them.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;

// Type-erased storage shape shared by every registration.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// A stored factory plus the caching state its lifetime needs.
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Whether this registration was planned with an interceptor source.
    /// Presence checks never look at this; it exists for introspection only.
    pub(crate) intercepted: bool,

    /// Singleton cache. `get_or_try_init` guarantees the constructor runs at
    /// most once per provider and a failed run does not poison the cell.
    pub(crate) single_cell: Option<OnceCell<AnyArc>>,

    /// Slot index into a scope's cell array, assigned at build time.
    pub(crate) scoped_slot: Option<usize>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor) -> Self {
        let single_cell = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };
        Self {
            lifetime,
            ctor,
            intercepted: false,
            single_cell,
            scoped_slot: None,
        }
    }

    pub(crate) fn intercepted(lifetime: Lifetime, ctor: Ctor) -> Self {
        let mut reg = Self::new(lifetime, ctor);
        reg.intercepted = true;
        reg
    }
}

/// All registrations of a collection, single- and multi-bound.
pub(crate) struct Registry {
    /// Linear-scan storage while the registration count is small.
    pub(crate) one_small: Vec<(Key, Registration)>,
    /// HashMap spillover once the small Vec fills up.
    pub(crate) one_large: HashMap<Key, Registration>,
    /// Append-only multi-binding lists, per trait name.
    pub(crate) many: HashMap<&'static str, Vec<Registration>>,
    /// How many scoped slots a scope's cell array needs.
    pub(crate) scoped_count: usize,
    /// Cutover point between the Vec and the HashMap.
    pub(crate) small_threshold: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            one_small: Vec::new(),
            one_large: HashMap::new(),
            many: HashMap::new(),
            scoped_count: 0,
            small_threshold: 16,
        }
    }

    /// Inserts a registration, replacing any existing one under the same key.
    /// Last registration wins for single-value resolution.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        if let Some(pos) = self.one_small.iter().position(|(k, _)| k == &key) {
            self.one_small[pos] = (key, registration);
        } else if self.one_small.len() < self.small_threshold && self.one_large.is_empty() {
            self.one_small.push((key, registration));
        } else {
            self.one_large.insert(key, registration);
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        for (k, reg) in &self.one_small {
            if k == key {
                return Some(reg);
            }
        }
        self.one_large.get(key)
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Iterator over all single-binding key-registration pairs
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.one_small
            .iter()
            .map(|(k, r)| (k, r))
            .chain(self.one_large.iter())
    }

    /// Finalizes the registry by assigning scoped slot indices and sorting the
    /// small Vec for better lookup locality.
    pub(crate) fn finalize(&mut self) {
        self.one_small.sort_by(|a, b| a.0.cmp(&b.0));

        let mut next_scoped_slot = 0;

        for (_, reg) in &mut self.one_small {
            if reg.lifetime == Lifetime::Scoped {
                reg.scoped_slot = Some(next_scoped_slot);
                next_scoped_slot += 1;
            }
        }

        for reg in self.one_large.values_mut() {
            if reg.lifetime == Lifetime::Scoped {
                reg.scoped_slot = Some(next_scoped_slot);
                next_scoped_slot += 1;
            }
        }

        for regs in self.many.values_mut() {
            for reg in regs.iter_mut() {
                if reg.lifetime == Lifetime::Scoped {
                    reg.scoped_slot = Some(next_scoped_slot);
                    next_scoped_slot += 1;
                }
            }
        }

        self.scoped_count = next_scoped_slot;
    }
}
