use intercept_di::{Interceptor, InterceptorChain, Invocation};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

struct Marker {
    index: usize,
    log: Arc<Mutex<Vec<(usize, &'static str)>>>,
}

impl Interceptor for Marker {
    fn intercept(&self, invocation: &mut Invocation<'_>) {
        self.log.lock().unwrap().push((self.index, "before"));
        invocation.proceed();
        self.log.lock().unwrap().push((self.index, "after"));
    }
}

proptest! {
    /// Before-effects appear in declared order; after-effects in reverse.
    #[test]
    fn chain_order_is_declared_order(len in 0usize..12) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let links: Vec<Arc<dyn Interceptor>> = (0..len)
            .map(|index| Arc::new(Marker { index, log: log.clone() }) as Arc<dyn Interceptor>)
            .collect();
        let chain = InterceptorChain::new(links);

        let value = chain.invoke("Svc", "call", || 7usize);
        prop_assert_eq!(value, 7);

        let log = log.lock().unwrap();
        prop_assert_eq!(log.len(), len * 2);

        let befores: Vec<usize> = log
            .iter()
            .filter(|(_, phase)| *phase == "before")
            .map(|(index, _)| *index)
            .collect();
        let afters: Vec<usize> = log
            .iter()
            .filter(|(_, phase)| *phase == "after")
            .map(|(index, _)| *index)
            .collect();

        let declared: Vec<usize> = (0..len).collect();
        let reversed: Vec<usize> = (0..len).rev().collect();
        prop_assert_eq!(befores, declared);
        prop_assert_eq!(afters, reversed);

        // Stack-like wrapping: every before precedes every after.
        if len > 0 {
            let first_after = log.iter().position(|(_, phase)| *phase == "after").unwrap();
            let last_before = log
                .iter()
                .rposition(|(_, phase)| *phase == "before")
                .unwrap();
            prop_assert!(last_before < first_after);
        }
    }

    /// The terminal's value always comes back unchanged through any chain of
    /// pass-through interceptors.
    #[test]
    fn chain_is_transparent_for_passthrough_links(len in 0usize..12, value in any::<u64>()) {
        struct Passthrough;
        impl Interceptor for Passthrough {
            fn intercept(&self, invocation: &mut Invocation<'_>) {
                invocation.proceed();
            }
        }

        let links: Vec<Arc<dyn Interceptor>> = (0..len)
            .map(|_| Arc::new(Passthrough) as Arc<dyn Interceptor>)
            .collect();
        let chain = InterceptorChain::new(links);

        prop_assert_eq!(chain.invoke("Svc", "call", move || value), value);
    }
}

mod try_add_sequences {
    use super::*;
    use intercept_di::{interface_proxy, Resolver, ServiceCollection};

    interface_proxy! {
        pub trait Sequenced {
            fn tag(&self) -> usize;
        }
    }

    struct Tagged {
        tag: usize,
    }

    impl Sequenced for Tagged {
        fn tag(&self) -> usize {
            self.tag
        }
    }

    proptest! {
        /// Any mix of add/try-add calls: the last plain add wins, and every
        /// try-add after the first registration is a no-op.
        #[test]
        fn try_add_never_overrides(ops in proptest::collection::vec(any::<bool>(), 1..8)) {
            let mut sc = ServiceCollection::new();
            let mut expected: Option<usize> = None;

            for (tag, is_try) in ops.iter().copied().enumerate() {
                if is_try {
                    let added = sc
                        .try_add_transient_intercepted_trait::<dyn Sequenced, _, _>(
                            move |_| Arc::new(Tagged { tag }),
                            (),
                        )
                        .unwrap();
                    prop_assert_eq!(added, expected.is_none());
                    if expected.is_none() {
                        expected = Some(tag);
                    }
                } else {
                    sc.add_transient_intercepted_trait::<dyn Sequenced, _, _>(
                        move |_| Arc::new(Tagged { tag }),
                        (),
                    )
                    .unwrap();
                    expected = Some(tag);
                }
            }

            let sp = sc.build();
            let resolved = sp.get_required_trait::<dyn Sequenced>();
            prop_assert_eq!(resolved.tag(), expected.unwrap());
        }
    }
}
