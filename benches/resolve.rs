#![allow(dead_code)]

use std::{string::String, vec, vec::Vec};

use criterion::{criterion_group, criterion_main, Criterion};
use provisio::{Dependency, FactoryArgs, InstantiateErrorKind, Lifetime, Provider, ServiceCollection, Token};
use tokio::runtime::Builder;

struct Config(u8);
struct Pool(u8);
struct Handler(String);

fn build_provider() -> Provider {
    ServiceCollection::new()
        .add_factory(Token::of::<Config>(), Lifetime::Singleton, Vec::new(), |_args: FactoryArgs| async {
            Ok::<_, InstantiateErrorKind>(Config(1))
        })
        .add_factory(
            Token::of::<Pool>(),
            Lifetime::Scoped,
            vec![Dependency::single(Token::of::<Config>())],
            |args: FactoryArgs| async move {
                let config = args.one::<Config>(0)?;
                Ok::<_, InstantiateErrorKind>(Pool(config.0))
            },
        )
        .add_factory(
            Token::of::<Handler>(),
            Lifetime::Transient,
            vec![Dependency::single(Token::of::<Pool>())],
            |args: FactoryArgs| async move {
                let pool = args.one::<Pool>(0)?;
                Ok::<_, InstantiateErrorKind>(Handler(format!("pool {}", pool.0)))
            },
        )
        .build_provider()
}

fn provider_benchmark(c: &mut Criterion) {
    c.bench_function("provider_new", |b| b.iter(build_provider))
        .bench_function("provider_scope_chain", |b| {
            let provider = build_provider();
            b.iter(|| provider.create_scope().create_scope().create_scope())
        })
        .bench_function("get_singleton_cached", |b| {
            let provider = build_provider();
            b.to_async(Builder::new_current_thread().build().unwrap()).iter(|| {
                let provider = provider.clone();
                async move { provider.get(&Token::of::<Config>()).await.unwrap().unwrap() }
            })
        })
        .bench_function("get_transient_chain", |b| {
            let provider = build_provider();
            b.to_async(Builder::new_current_thread().build().unwrap()).iter(|| {
                let provider = provider.clone();
                async move { provider.get(&Token::of::<Handler>()).await.unwrap().unwrap() }
            })
        })
        .bench_function("get_transient_chain_fresh_scope", |b| {
            let provider = build_provider();
            b.to_async(Builder::new_current_thread().build().unwrap()).iter(|| {
                let scope = provider.create_scope();
                async move { scope.get(&Token::of::<Handler>()).await.unwrap().unwrap() }
            })
        });
}

criterion_group!(benches, provider_benchmark);
criterion_main!(benches);
