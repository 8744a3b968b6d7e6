use intercept_di::{
    interface_proxy, ClassProxy, Interceptor, InterceptorChain, InterceptorSource, Invocation,
    Resolver, ServiceCollection,
};
use std::sync::{Arc, Mutex};

interface_proxy! {
    pub trait TestService {
        fn get_name(&self) -> String;
    }
}

struct DefaultTestService;

impl TestService for DefaultTestService {
    fn get_name(&self) -> String {
        "DefaultTestService".to_string()
    }
}

/// Records before/after markers around its call to proceed.
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

/// Records the invoked member name.
struct MemberRecorder {
    last: Arc<Mutex<Option<String>>>,
}

impl Interceptor for MemberRecorder {
    fn intercept(&self, invocation: &mut Invocation<'_>) {
        *self.last.lock().unwrap() = Some(invocation.method().to_string());
        invocation.proceed();
    }
}

#[test]
fn empty_chain_exposes_plain_instance() {
    // A pre-built instance registered with no interceptors must come back
    // unwrapped: the resolved Arc is pointer-equal to the registered one.
    let instance: Arc<dyn TestService> = Arc::new(DefaultTestService);

    let mut sc = ServiceCollection::new();
    sc.add_singleton_intercepted_trait_instance::<dyn TestService, _>(instance.clone(), ())
        .unwrap();

    let sp = sc.build();
    let resolved = sp.get_required_trait::<dyn TestService>();
    assert!(Arc::ptr_eq(&instance, &resolved));
}

#[test]
fn empty_chain_is_not_marked_intercepted() {
    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted_trait::<dyn TestService, _, _>(
        |_| Arc::new(DefaultTestService),
        InterceptorSource::none(),
    )
    .unwrap();

    let descriptors = sc.get_service_descriptors();
    assert_eq!(descriptors.len(), 1);
    assert!(!descriptors[0].intercepted);
}

#[test]
fn interceptor_runs_before_target_and_returns_target_value() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let marker = Arc::new(Marker { label: "a", log: log.clone() }) as Arc<dyn Interceptor>;

    struct Terminal {
        log: Arc<Mutex<Vec<String>>>,
    }
    impl TestService for Terminal {
        fn get_name(&self) -> String {
            self.log.lock().unwrap().push("target".to_string());
            "Terminal".to_string()
        }
    }

    let factory_log = log.clone();
    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted_trait::<dyn TestService, _, _>(
        move |_| Arc::new(Terminal { log: factory_log.clone() }),
        vec![marker],
    )
    .unwrap();

    let sp = sc.build();
    let service = sp.get_required_trait::<dyn TestService>();

    assert_eq!(service.get_name(), "Terminal");
    assert_eq!(
        *log.lock().unwrap(),
        vec!["before:a", "target", "after:a"]
    );
}

#[test]
fn chain_wraps_stack_like_in_declared_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = Arc::new(Marker { label: "a", log: log.clone() }) as Arc<dyn Interceptor>;
    let b = Arc::new(Marker { label: "b", log: log.clone() }) as Arc<dyn Interceptor>;

    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted_trait::<dyn TestService, _, _>(
        |_| Arc::new(DefaultTestService),
        vec![a, b],
    )
    .unwrap();

    let sp = sc.build();
    let service = sp.get_required_trait::<dyn TestService>();
    let _ = service.get_name();

    // First interceptor outermost: its before-effect first, after-effect last.
    assert_eq!(
        *log.lock().unwrap(),
        vec!["before:a", "before:b", "after:b", "after:a"]
    );
}

#[test]
fn transient_interface_scenario() {
    // Transient registration with one member-recording interceptor: two
    // resolutions yield distinct proxies, both behaving like the target.
    let last = Arc::new(Mutex::new(None));
    let recorder = Arc::new(MemberRecorder { last: last.clone() }) as Arc<dyn Interceptor>;

    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted_trait::<dyn TestService, _, _>(
        |_| Arc::new(DefaultTestService),
        vec![recorder],
    )
    .unwrap();

    let sp = sc.build();
    let first = sp.get_required_trait::<dyn TestService>();
    let second = sp.get_required_trait::<dyn TestService>();
    assert!(!Arc::ptr_eq(&first, &second));

    assert_eq!(first.get_name(), "DefaultTestService");
    assert_eq!(last.lock().unwrap().as_deref(), Some("get_name"));

    *last.lock().unwrap() = None;
    assert_eq!(second.get_name(), "DefaultTestService");
    assert_eq!(last.lock().unwrap().as_deref(), Some("get_name"));
}

#[test]
fn short_circuiting_interceptor_replaces_return_value() {
    struct ShortCircuit;
    impl Interceptor for ShortCircuit {
        fn intercept(&self, invocation: &mut Invocation<'_>) {
            invocation.set_return_value("intercepted".to_string());
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted_trait::<dyn TestService, _, _>(
        |_| Arc::new(DefaultTestService),
        vec![Arc::new(ShortCircuit) as Arc<dyn Interceptor>],
    )
    .unwrap();

    let sp = sc.build();
    let service = sp.get_required_trait::<dyn TestService>();
    assert_eq!(service.get_name(), "intercepted");
}

// ----- Concrete class services -----

struct Ledger {
    chain: InterceptorChain,
    entries: Mutex<Vec<String>>,
}

impl Ledger {
    fn new() -> Self {
        Self {
            chain: InterceptorChain::default(),
            entries: Mutex::new(Vec::new()),
        }
    }

    // Interceptable member: routed through the chain.
    fn record(&self, entry: &str) {
        self.chain.invoke("Ledger", "record", || {
            self.entries.lock().unwrap().push(entry.to_string());
        })
    }

    // Plain member: bypasses the chain entirely.
    fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl ClassProxy for Ledger {
    fn class_proxy(mut self, chain: InterceptorChain) -> Self {
        self.chain = chain;
        self
    }
}

#[test]
fn class_proxy_intercepts_routed_members_only() {
    let last = Arc::new(Mutex::new(None));
    let recorder = Arc::new(MemberRecorder { last: last.clone() }) as Arc<dyn Interceptor>;

    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted::<Ledger, _, _>(|_| Ledger::new(), vec![recorder])
        .unwrap();

    let sp = sc.build();
    let ledger = sp.get_required::<Ledger>();

    ledger.record("first");
    assert_eq!(last.lock().unwrap().as_deref(), Some("record"));

    // Non-routed member runs without touching the chain.
    *last.lock().unwrap() = None;
    assert_eq!(ledger.entry_count(), 1);
    assert!(last.lock().unwrap().is_none());
}

#[test]
fn class_proxy_empty_chain_bypasses() {
    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted::<Ledger, _, _>(|_| Ledger::new(), ())
        .unwrap();

    let sp = sc.build();
    let ledger = sp.get_required::<Ledger>();
    ledger.record("entry");
    assert_eq!(ledger.entry_count(), 1);
}

#[test]
fn singleton_class_scenario_interceptor_runs_per_call_not_per_resolution() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let marker = Arc::new(Marker { label: "audit", log: log.clone() }) as Arc<dyn Interceptor>;

    let mut sc = ServiceCollection::new();
    sc.add_singleton_intercepted::<Ledger, _, _>(|_| Ledger::new(), vec![marker])
        .unwrap();

    let sp = sc.build();
    let first = sp.get_required::<Ledger>();
    let second = sp.get_required::<Ledger>();
    assert!(Arc::ptr_eq(&first, &second));

    // Resolutions alone never drive the chain.
    assert!(log.lock().unwrap().is_empty());

    first.record("a");
    second.record("b");
    assert_eq!(log.lock().unwrap().len(), 4); // two before/after pairs
    assert_eq!(first.entry_count(), 2);
}

#[test]
fn class_instance_registration_installs_chain_on_first_resolution() {
    let last = Arc::new(Mutex::new(None));
    let recorder = Arc::new(MemberRecorder { last: last.clone() }) as Arc<dyn Interceptor>;

    let mut sc = ServiceCollection::new();
    sc.add_singleton_intercepted_instance(Ledger::new(), vec![recorder])
        .unwrap();

    let sp = sc.build();
    let first = sp.get_required::<Ledger>();
    let second = sp.get_required::<Ledger>();
    assert!(Arc::ptr_eq(&first, &second));

    first.record("entry");
    assert_eq!(last.lock().unwrap().as_deref(), Some("record"));
    assert_eq!(first.entry_count(), 1);
}

#[test]
fn registration_returns_collection_for_chaining() {
    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted::<Ledger, _, _>(|_| Ledger::new(), ())
        .unwrap()
        .add_transient_intercepted_trait::<dyn TestService, _, _>(
            |_| Arc::new(DefaultTestService),
            (),
        )
        .unwrap();

    let sp = sc.build();
    assert_eq!(sp.get_required_trait::<dyn TestService>().get_name(), "DefaultTestService");
    assert_eq!(sp.get_required::<Ledger>().entry_count(), 0);
}
