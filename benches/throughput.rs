//! Throughput Benchmark for EmberKV
//!
//! This benchmark measures the store on its own and the full
//! decode → dispatch → encode pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use emberkv::commands::CommandHandler;
use emberkv::protocol::{decode, encode_command};
use emberkv::storage::{Store, Value};
use std::sync::Arc;
use std::time::Duration;

/// Benchmark SET operations
fn bench_set(c: &mut Criterion) {
    let store = Arc::new(Store::new());

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_string", |b| {
        let mut i = 0u64;
        b.iter(|| {
            store.set(format!("key:{}", i), Value::from("small_value"));
            i += 1;
        });
    });

    group.bench_function("set_integer", |b| {
        let mut i = 0i64;
        b.iter(|| {
            store.set(format!("int:{}", i), Value::Integer(i));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let store = Arc::new(Store::new());

    // Pre-populate with data
    for i in 0..100_000 {
        store.set(format!("key:{}", i), Value::String(format!("value:{}", i)));
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i % 100_000);
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("missing:{}", i);
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark one request through decode, dispatch and reply encoding
fn bench_pipeline(c: &mut Criterion) {
    let handler = CommandHandler::new(Arc::new(Store::new()));
    let set_request = encode_command(&["SET", "user:101", "Ariz"]);
    let get_request = encode_command(&["GET", "user:101"]);

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1));

    group.bench_function("decode_set", |b| {
        b.iter(|| black_box(decode(black_box(&set_request))));
    });

    group.bench_function("set_then_get", |b| {
        b.iter(|| {
            for request in [&set_request, &get_request] {
                if let Ok(args) = decode(request) {
                    black_box(handler.execute(&args).serialize());
                }
            }
        });
    });

    group.finish();
}

/// Benchmark concurrent access
fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let mut group = c.benchmark_group("concurrent");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("4_threads_mixed", |b| {
        b.iter(|| {
            let store = Arc::new(Store::new());
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let store = Arc::clone(&store);
                    thread::spawn(move || {
                        for i in 0..10_000 {
                            let key = format!("key:{}:{}", t, i);
                            store.set(key.as_str(), Value::from("value"));
                            store.get(&key);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            black_box(store.len());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_get,
    bench_pipeline,
    bench_concurrent,
);

criterion_main!(benches);
