//! Benchmarks for the single-threaded cache store operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proxy_cache::config::CacheConfig;
use proxy_cache::store::CacheStore;
use std::sync::Arc;

const CACHE_CAPACITY: u64 = 10 * 1024 * 1024;
const OBJECT_MAX: u64 = 64 * 1024;
const NUM_OPERATIONS: usize = 10_000;

fn make_store() -> CacheStore {
    CacheStore::new(CacheConfig::new(CACHE_CAPACITY, OBJECT_MAX))
}

fn payload(n: usize) -> Arc<[u8]> {
    Arc::from(vec![0u8; n].into_boxed_slice())
}

fn bench_sequential_insert(c: &mut Criterion) {
    c.bench_function("insert_sequential_keys", |b| {
        b.iter(|| {
            let mut store = make_store();
            for i in 0..NUM_OPERATIONS {
                store
                    .insert(Arc::from(format!("http://example.com/{i}")), payload(512))
                    .unwrap();
            }
            black_box(store.used());
        });
    });
}

fn bench_lookup_hit(c: &mut Criterion) {
    let mut store = make_store();
    for i in 0..NUM_OPERATIONS {
        store
            .insert(Arc::from(format!("http://example.com/{i}")), payload(512))
            .unwrap();
    }

    c.bench_function("lookup_hit", |b| {
        b.iter(|| {
            for i in 0..NUM_OPERATIONS {
                black_box(store.lookup(&format!("http://example.com/{i}")));
            }
        });
    });
}

fn bench_eviction_pressure(c: &mut Criterion) {
    c.bench_function("insert_under_eviction_pressure", |b| {
        b.iter(|| {
            let mut store = CacheStore::new(CacheConfig::new(64 * 1024, OBJECT_MAX));
            for i in 0..NUM_OPERATIONS {
                store
                    .insert(Arc::from(format!("http://example.com/{i}")), payload(512))
                    .unwrap();
            }
            black_box(store.used());
        });
    });
}

criterion_group!(
    benches,
    bench_sequential_insert,
    bench_lookup_hit,
    bench_eviction_pressure
);
criterion_main!(benches);
