use criterion::{black_box, criterion_group, criterion_main, Criterion};
use intercept_di::{
    interface_proxy, Interceptor, Invocation, Resolver, ServiceCollection,
};
use std::sync::Arc;

interface_proxy! {
    pub trait Echo {
        fn echo(&self, value: u64) -> u64;
    }
}

struct PlainEcho;

impl Echo for PlainEcho {
    fn echo(&self, value: u64) -> u64 {
        value
    }
}

struct Passthrough;

impl Interceptor for Passthrough {
    fn intercept(&self, invocation: &mut Invocation<'_>) {
        invocation.proceed();
    }
}

fn bench_resolution(c: &mut Criterion) {
    let plain = {
        let mut sc = ServiceCollection::new();
        sc.add_transient_intercepted_trait::<dyn Echo, _, _>(|_| Arc::new(PlainEcho), ())
            .unwrap();
        sc.build()
    };

    let intercepted = {
        let mut sc = ServiceCollection::new();
        sc.add_transient_intercepted_trait::<dyn Echo, _, _>(
            |_| Arc::new(PlainEcho),
            vec![Arc::new(Passthrough) as Arc<dyn Interceptor>],
        )
        .unwrap();
        sc.build()
    };

    let singleton = {
        let mut sc = ServiceCollection::new();
        sc.add_singleton_intercepted_trait::<dyn Echo, _, _>(
            |_| Arc::new(PlainEcho),
            vec![Arc::new(Passthrough) as Arc<dyn Interceptor>],
        )
        .unwrap();
        sc.build()
    };

    c.bench_function("resolve_transient_plain", |b| {
        b.iter(|| black_box(plain.get_required_trait::<dyn Echo>()))
    });

    c.bench_function("resolve_transient_intercepted", |b| {
        b.iter(|| black_box(intercepted.get_required_trait::<dyn Echo>()))
    });

    c.bench_function("resolve_singleton_intercepted", |b| {
        b.iter(|| black_box(singleton.get_required_trait::<dyn Echo>()))
    });

    let service = intercepted.get_required_trait::<dyn Echo>();
    c.bench_function("call_through_one_interceptor", |b| {
        b.iter(|| black_box(service.echo(black_box(7))))
    });
}

fn bench_invocation(c: &mut Criterion) {
    use intercept_di::InterceptorChain;

    let empty = InterceptorChain::default();
    let chain = InterceptorChain::new(vec![
        Arc::new(Passthrough) as Arc<dyn Interceptor>,
        Arc::new(Passthrough),
        Arc::new(Passthrough),
    ]);

    c.bench_function("invoke_empty_chain", |b| {
        b.iter(|| black_box(empty.invoke("Echo", "echo", || 7u64)))
    });

    c.bench_function("invoke_three_link_chain", |b| {
        b.iter(|| black_box(chain.invoke("Echo", "echo", || 7u64)))
    });
}

criterion_group!(benches, bench_resolution, bench_invocation);
criterion_main!(benches);
