//! Hooks around resolution for structured tracing.
//!
//! An observer sees which services (intercepted or not) are resolved, how
//! long their factories ran, and which resolutions failed.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Receives resolution events from the provider.
///
/// Calls are made synchronously on the resolving thread; keep
/// implementations lightweight. All methods default to no-ops so an
/// observer only implements the events it cares about.
///
/// # Examples
///
/// ```rust
/// use intercept_di::{DiObserver, ServiceCollection, Key, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// struct CountingObserver {
///     resolutions: AtomicU64,
/// }
///
/// impl DiObserver for CountingObserver {
///     fn resolving(&self, _key: &Key) {
///         self.resolutions.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let observer = Arc::new(CountingObserver { resolutions: AtomicU64::new(0) });
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(42usize);
/// services.add_observer(observer.clone());
///
/// let provider = services.build();
/// let _ = provider.get_required::<usize>();
/// assert_eq!(observer.resolutions.load(Ordering::Relaxed), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a registration's factory is consulted.
    fn resolving(&self, key: &Key) {
        let _ = key;
    }

    /// Called after a resolution completed successfully.
    fn resolved(&self, key: &Key, duration: Duration) {
        let _ = (key, duration);
    }

    /// Called when a resolution failed.
    fn resolution_failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }
}

/// Built-in observer that prints resolution events to stderr.
pub struct LoggingObserver {
    prefix: &'static str,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self { prefix: "di" }
    }

    pub fn with_prefix(prefix: &'static str) -> Self {
        Self { prefix }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        eprintln!("[{}] resolving {}", self.prefix, key.display_name());
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        eprintln!(
            "[{}] resolved {} in {:.2}ms",
            self.prefix,
            key.display_name(),
            duration.as_secs_f64() * 1000.0
        );
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        eprintln!("[{}] failed {}: {}", self.prefix, key.display_name(), error);
    }
}

/// Internal fan-out over the registered observers.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn resolution_failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(key, error);
        }
    }
}
