use intercept_di::{
    interface_proxy, DiError, Interceptor, InterceptorTypes, Invocation, Key, Resolver,
    ServiceCollection, ViolationKind,
};
use std::sync::Arc;

interface_proxy! {
    pub trait Billing {
        fn charge(&self) -> u32;
    }
}

struct FlatBilling;
impl Billing for FlatBilling {
    fn charge(&self) -> u32 {
        10
    }
}

struct First;
impl Interceptor for First {
    fn intercept(&self, invocation: &mut Invocation<'_>) {
        invocation.proceed();
    }
}

struct Second;
impl Interceptor for Second {
    fn intercept(&self, invocation: &mut Invocation<'_>) {
        invocation.proceed();
    }
}

struct Third;
impl Interceptor for Third {
    fn intercept(&self, invocation: &mut Invocation<'_>) {
        invocation.proceed();
    }
}

#[test]
fn batch_rejects_whole_request_and_names_the_offender() {
    let mut sc = ServiceCollection::new();
    // First and Third are registered; Second is not.
    sc.add_transient_factory::<First, _>(|_| First);
    sc.add_transient_factory::<Third, _>(|_| Third);

    let result = sc.add_transient_intercepted_trait::<dyn Billing, _, _>(
        |_| Arc::new(FlatBilling),
        InterceptorTypes::new().with::<First>().with::<Second>().with::<Third>(),
    );

    match result {
        Err(DiError::InvalidInterceptors { parameter, violations }) => {
            assert_eq!(parameter, "interceptors");
            assert_eq!(violations.len(), 1);
            assert!(violations[0].type_name.contains("Second"));
            assert_eq!(violations[0].kind, ViolationKind::Unregistered);
        }
        other => panic!("expected InvalidInterceptors, got {:?}", other.map(|_| ())),
    }

    // No registration side effect occurred.
    assert!(!sc.has_registration(&Key::Trait(std::any::type_name::<dyn Billing>())));
}

#[test]
fn batch_reports_every_offending_type_at_once() {
    let sc_empty = {
        let mut sc = ServiceCollection::new();
        let result = sc.add_transient_intercepted_trait::<dyn Billing, _, _>(
            |_| Arc::new(FlatBilling),
            InterceptorTypes::new().with::<First>().with::<Second>(),
        );
        match result {
            Err(DiError::InvalidInterceptors { violations, .. }) => {
                let names: Vec<_> = violations.iter().map(|v| v.type_name).collect();
                assert_eq!(violations.len(), 2);
                assert!(names[0].contains("First"));
                assert!(names[1].contains("Second"));
            }
            other => panic!("expected InvalidInterceptors, got {:?}", other.map(|_| ())),
        }
        sc
    };
    assert!(sc_empty.get_service_descriptors().is_empty());
}

#[test]
fn scoped_interceptor_under_singleton_service_is_rejected() {
    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<First, _>(|_| First);

    let result = sc.add_singleton_intercepted_trait::<dyn Billing, _, _>(
        |_| Arc::new(FlatBilling),
        InterceptorTypes::new().with::<First>(),
    );

    match result {
        Err(DiError::InvalidInterceptors { violations, .. }) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].kind, ViolationKind::CaptiveScoped);
        }
        other => panic!("expected InvalidInterceptors, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn scoped_interceptor_under_scoped_service_is_accepted() {
    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<First, _>(|_| First);

    sc.add_scoped_intercepted_trait::<dyn Billing, _, _>(
        |_| Arc::new(FlatBilling),
        InterceptorTypes::new().with::<First>(),
    )
    .unwrap();

    let sp = sc.build();
    let scope = sp.create_scope();
    assert_eq!(scope.get_required_trait::<dyn Billing>().charge(), 10);
}

#[test]
fn empty_type_list_is_valid_and_yields_plain_registration() {
    let mut sc = ServiceCollection::new();
    sc.add_transient_intercepted_trait::<dyn Billing, _, _>(
        |_| Arc::new(FlatBilling),
        InterceptorTypes::new(),
    )
    .unwrap();

    let descriptors = sc.get_service_descriptors();
    assert_eq!(descriptors.len(), 1);
    assert!(!descriptors[0].intercepted);

    let sp = sc.build();
    assert_eq!(sp.get_required_trait::<dyn Billing>().charge(), 10);
}

#[test]
fn registered_types_pass_validation_and_intercept() {
    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<First, _>(|_| First);
    sc.add_transient_factory::<Second, _>(|_| Second);

    sc.add_transient_intercepted_trait::<dyn Billing, _, _>(
        |_| Arc::new(FlatBilling),
        InterceptorTypes::new().with::<First>().with::<Second>(),
    )
    .unwrap();

    let descriptors = sc.get_service_descriptors();
    let billing = descriptors
        .iter()
        .find(|d| d.type_name().contains("Billing"))
        .unwrap();
    assert!(billing.intercepted);

    let sp = sc.build();
    assert_eq!(sp.get_required_trait::<dyn Billing>().charge(), 10);
}

#[test]
fn unresolvable_interceptor_surfaces_container_error_at_resolution_time() {
    // A scoped interceptor under a transient owner passes validation, but
    // materializing the chain from the root provider fails; the container's
    // error surfaces unchanged at the first resolution attempt.
    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<First, _>(|_| First);
    sc.add_transient_intercepted_trait::<dyn Billing, _, _>(
        |_| Arc::new(FlatBilling),
        InterceptorTypes::new().with::<First>(),
    )
    .unwrap();

    let sp = sc.build();
    match sp.get_trait::<dyn Billing>() {
        Err(DiError::WrongLifetime(_)) => {}
        other => panic!("expected WrongLifetime, got {:?}", other.map(|_| ())),
    }

    // The same registration works inside a scope.
    let scope = sp.create_scope();
    assert_eq!(scope.get_required_trait::<dyn Billing>().charge(), 10);
}
