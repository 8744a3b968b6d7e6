//! Interceptor capability and per-call invocation machinery.
//!
//! An interceptor implements a single operation receiving an [`Invocation`]
//! context. Calling [`Invocation::proceed`] continues to the next link in the
//! chain, or to the real member once the chain is exhausted. The first
//! interceptor in a chain runs outermost: its logic executes first, and the
//! invocation returns back through it last.

use std::any::Any;
use std::sync::Arc;

/// The interception capability.
///
/// Implementations run around every intercepted member call of the service
/// they are attached to. An interceptor that does not call
/// [`Invocation::proceed`] short-circuits the rest of the chain and the real
/// member; it must then supply a return value itself via
/// [`Invocation::set_return_value`].
///
/// # Examples
///
/// ```rust
/// use intercept_di::{Interceptor, Invocation};
/// use std::sync::Mutex;
///
/// struct CallLog {
///     entries: Mutex<Vec<String>>,
/// }
///
/// impl Interceptor for CallLog {
///     fn intercept(&self, invocation: &mut Invocation<'_>) {
///         self.entries.lock().unwrap().push(invocation.method().to_string());
///         invocation.proceed();
///     }
/// }
/// ```
pub trait Interceptor: Send + Sync {
    /// Runs interception logic around the invoked member.
    fn intercept(&self, invocation: &mut Invocation<'_>);
}

/// Per-call context handed to each interceptor in the chain.
///
/// Carries the target type and member names for diagnostics, drives the rest
/// of the chain through [`proceed`](Self::proceed), and transports the return
/// value back out to the caller.
pub struct Invocation<'a> {
    target_type: &'static str,
    method: &'static str,
    links: &'a [Arc<dyn Interceptor>],
    position: usize,
    terminal: &'a mut dyn FnMut() -> Box<dyn Any>,
    return_value: Option<Box<dyn Any>>,
}

impl<'a> Invocation<'a> {
    /// Name of the type whose member is being invoked.
    pub fn target_type(&self) -> &'static str {
        self.target_type
    }

    /// Name of the invoked member.
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Continues to the next interceptor in the chain, or to the real member
    /// once the chain is exhausted.
    ///
    /// # Panics
    ///
    /// Panics if the chain is driven past the real member a second time.
    pub fn proceed(&mut self) {
        let position = self.position;
        if position < self.links.len() {
            self.position = position + 1;
            let link = Arc::clone(&self.links[position]);
            link.intercept(self);
        } else {
            self.return_value = Some((self.terminal)());
        }
    }

    /// Replaces (or supplies) the return value observed by the caller.
    ///
    /// An interceptor that skips [`proceed`](Self::proceed) must call this;
    /// one that did proceed may call it to override the real member's result.
    pub fn set_return_value<R: 'static>(&mut self, value: R) {
        self.return_value = Some(Box::new(value));
    }

    /// The return value produced so far, if any.
    pub fn return_value<R: 'static>(&self) -> Option<&R> {
        self.return_value.as_ref()?.downcast_ref::<R>()
    }

    /// Whether a return value has been produced yet.
    pub fn has_return_value(&self) -> bool {
        self.return_value.is_some()
    }
}

/// Ordered sequence of interceptor instances.
///
/// Order is the application order: the first link runs outermost. A chain of
/// length zero means no interception at all, and [`invoke`](Self::invoke)
/// degenerates to a plain call of the terminal.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    links: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    /// Builds a chain from links in declared order.
    pub fn new(links: Vec<Arc<dyn Interceptor>>) -> Self {
        Self { links }
    }

    /// Number of links in the chain.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the chain has no links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Runs `terminal` wrapped by the chain and returns its value (or the
    /// value a short-circuiting interceptor supplied).
    ///
    /// `target_type` and `method` identify the invoked member to the
    /// interceptors; proxy wrappers pass the service and member names.
    ///
    /// # Panics
    ///
    /// Panics if the chain finishes without a return value (an interceptor
    /// neither proceeded nor set one), or if a supplied return value has the
    /// wrong type. Both are interceptor bugs, surfaced fail-fast.
    pub fn invoke<R: 'static>(
        &self,
        target_type: &'static str,
        method: &'static str,
        terminal: impl FnOnce() -> R,
    ) -> R {
        if self.links.is_empty() {
            return terminal();
        }

        let mut terminal = Some(terminal);
        let mut run_terminal = move || -> Box<dyn Any> {
            match terminal.take() {
                Some(f) => Box::new(f()),
                None => panic!(
                    "proceed() ran past the end of the interceptor chain twice for {}::{}",
                    target_type, method
                ),
            }
        };

        let mut invocation = Invocation {
            target_type,
            method,
            links: &self.links,
            position: 0,
            terminal: &mut run_terminal,
            return_value: None,
        };
        invocation.proceed();

        match invocation.return_value {
            Some(value) => match value.downcast::<R>() {
                Ok(value) => *value,
                Err(_) => panic!(
                    "interceptor supplied a return value of the wrong type for {}::{}",
                    target_type, method
                ),
            },
            None => panic!(
                "interceptor chain for {}::{} finished without a return value; \
                 an interceptor must call proceed() or set one",
                target_type, method
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Marker {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Interceptor for Marker {
        fn intercept(&self, invocation: &mut Invocation<'_>) {
            self.log.lock().unwrap().push(format!("before:{}", self.label));
            invocation.proceed();
            self.log.lock().unwrap().push(format!("after:{}", self.label));
        }
    }

    #[test]
    fn empty_chain_calls_terminal_directly() {
        let chain = InterceptorChain::default();
        let value = chain.invoke("Svc", "get", || 7usize);
        assert_eq!(value, 7);
    }

    #[test]
    fn links_wrap_stack_like() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::new(vec![
            Arc::new(Marker { label: "a", log: log.clone() }) as Arc<dyn Interceptor>,
            Arc::new(Marker { label: "b", log: log.clone() }),
        ]);

        let value = chain.invoke("Svc", "get", || {
            log.lock().unwrap().push("terminal".to_string());
            42usize
        });

        assert_eq!(value, 42);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["before:a", "before:b", "terminal", "after:b", "after:a"]
        );
    }

    #[test]
    fn short_circuit_supplies_return_value() {
        struct ShortCircuit;
        impl Interceptor for ShortCircuit {
            fn intercept(&self, invocation: &mut Invocation<'_>) {
                invocation.set_return_value(9usize);
            }
        }

        let chain =
            InterceptorChain::new(vec![Arc::new(ShortCircuit) as Arc<dyn Interceptor>]);
        let value: usize = chain.invoke("Svc", "get", || panic!("terminal must not run"));
        assert_eq!(value, 9usize);
    }

    #[test]
    fn interceptor_observes_member_names() {
        struct Observing {
            seen: Arc<Mutex<Vec<(String, String)>>>,
        }
        impl Interceptor for Observing {
            fn intercept(&self, invocation: &mut Invocation<'_>) {
                self.seen.lock().unwrap().push((
                    invocation.target_type().to_string(),
                    invocation.method().to_string(),
                ));
                invocation.proceed();
                assert!(invocation.has_return_value());
                assert_eq!(invocation.return_value::<&str>(), Some(&"done"));
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::new(vec![
            Arc::new(Observing { seen: seen.clone() }) as Arc<dyn Interceptor>
        ]);
        let value = chain.invoke("Ledger", "record", || "done");
        assert_eq!(value, "done");
        assert_eq!(*seen.lock().unwrap(), vec![("Ledger".to_string(), "record".to_string())]);
    }
}
