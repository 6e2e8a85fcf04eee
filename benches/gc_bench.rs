use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rplcore::runtime::{
    Runtime, RuntimeConfig,
    gc::GcHeap,
    tower::Value,
};

fn bench_store_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("gc/store_churn");

    for &heap_bytes in &[1_024, 16_384, 65_536] {
        group.throughput(Throughput::Elements(10_000));
        group.bench_with_input(
            BenchmarkId::from_parameter(heap_bytes),
            &heap_bytes,
            |b, &bytes| {
                b.iter(|| {
                    let mut heap = GcHeap::with_capacity(bytes);
                    let keep = heap.store(&Value::from_ratio(1.into(), 3.into())).unwrap();
                    for i in 0..10_000i64 {
                        black_box(heap.store(&Value::Integer(i)).unwrap());
                    }
                    black_box((keep, heap.total_collections()));
                });
            },
        );
    }

    group.finish();
}

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("gc/collect");

    for &live in &[10i64, 100, 1_000] {
        let mut heap = GcHeap::with_capacity(1 << 20);
        let held: Vec<_> = (0..live)
            .map(|i| heap.store(&Value::complex(Value::Integer(i), Value::Integer(1))).unwrap())
            .collect();

        group.throughput(Throughput::Elements(live as u64));
        group.bench_with_input(BenchmarkId::from_parameter(live), &live, |b, _| {
            b.iter(|| black_box(heap.collect()));
        });
        drop(held);
    }

    group.finish();
}

fn bench_bignum_doubling(c: &mut Criterion) {
    c.bench_function("runtime/bignum_doubling", |b| {
        let line = format!("1 {}", "DUP + ".repeat(500));
        b.iter(|| {
            let mut rt = Runtime::new(RuntimeConfig {
                heap_bytes: 4_096,
                ..RuntimeConfig::default()
            })
            .unwrap();
            rt.execute(&line).unwrap();
            black_box(rt.heap().total_collections());
        });
    });
}

criterion_group!(benches, bench_store_churn, bench_collect, bench_bignum_doubling);
criterion_main!(benches);
