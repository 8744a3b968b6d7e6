use crossbeam_utils::thread;
use intercept_di::{
    interface_proxy, Interceptor, Invocation, Resolver, ServiceCollection,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

interface_proxy! {
    pub trait Counter {
        fn bump(&self) -> usize;
    }
}

struct SharedCounter {
    hits: AtomicUsize,
}

impl Counter for SharedCounter {
    fn bump(&self) -> usize {
        self.hits.fetch_add(1, Ordering::SeqCst) + 1
    }
}

struct Passthrough {
    invocations: Arc<AtomicUsize>,
}

impl Interceptor for Passthrough {
    fn intercept(&self, invocation: &mut Invocation<'_>) {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        invocation.proceed();
    }
}

#[test]
fn concurrent_resolution_of_one_stored_factory_is_independent() {
    // Each resolution constructs its own chain and proxy; nothing is shared
    // between concurrent invocations of the same stored transient factory.
    let invocations = Arc::new(AtomicUsize::new(0));
    let factories = Arc::new(AtomicUsize::new(0));
    let factories_clone = factories.clone();
    let invocations_clone = invocations.clone();

    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted_trait::<dyn Counter, _, _>(
        move |_| {
            factories_clone.fetch_add(1, Ordering::SeqCst);
            Arc::new(SharedCounter { hits: AtomicUsize::new(0) })
        },
        vec![Arc::new(Passthrough { invocations: invocations_clone }) as Arc<dyn Interceptor>],
    )
    .unwrap();

    let sp = sc.build();

    thread::scope(|s| {
        for _ in 0..8 {
            let sp = sp.clone();
            s.spawn(move |_| {
                let counter = sp.get_required_trait::<dyn Counter>();
                assert_eq!(counter.bump(), 1);
            });
        }
    })
    .unwrap();

    assert_eq!(factories.load(Ordering::SeqCst), 8);
    assert_eq!(invocations.load(Ordering::SeqCst), 8);
}

#[test]
fn concurrent_singleton_resolution_initializes_once() {
    let factories = Arc::new(AtomicUsize::new(0));
    let factories_clone = factories.clone();

    let mut sc = ServiceCollection::new();
    sc.add_singleton_intercepted_trait::<dyn Counter, _, _>(
        move |_| {
            factories_clone.fetch_add(1, Ordering::SeqCst);
            Arc::new(SharedCounter { hits: AtomicUsize::new(0) })
        },
        vec![Arc::new(Passthrough { invocations: Arc::new(AtomicUsize::new(0)) })
            as Arc<dyn Interceptor>],
    )
    .unwrap();

    let sp = sc.build();

    thread::scope(|s| {
        for _ in 0..8 {
            let sp = sp.clone();
            s.spawn(move |_| {
                let _ = sp.get_required_trait::<dyn Counter>();
            });
        }
    })
    .unwrap();

    // The singleton cell ran the stored factory at most once.
    assert_eq!(factories.load(Ordering::SeqCst), 1);

    let counter = sp.get_required_trait::<dyn Counter>();
    assert_eq!(counter.bump(), 1);
    assert_eq!(counter.bump(), 2);
}

#[test]
fn scopes_on_separate_threads_are_isolated() {
    let factories = Arc::new(AtomicUsize::new(0));
    let factories_clone = factories.clone();

    let mut sc = ServiceCollection::new();
    sc.add_scoped_intercepted_trait::<dyn Counter, _, _>(
        move |_| {
            factories_clone.fetch_add(1, Ordering::SeqCst);
            Arc::new(SharedCounter { hits: AtomicUsize::new(0) })
        },
        (),
    )
    .unwrap();

    let sp = sc.build();

    thread::scope(|s| {
        for _ in 0..4 {
            let sp = sp.clone();
            s.spawn(move |_| {
                let scope = sp.create_scope();
                let a = scope.get_required_trait::<dyn Counter>();
                let b = scope.get_required_trait::<dyn Counter>();
                assert!(Arc::ptr_eq(&a, &b));
            });
        }
    })
    .unwrap();

    assert_eq!(factories.load(Ordering::SeqCst), 4);
}
