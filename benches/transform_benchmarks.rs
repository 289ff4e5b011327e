use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use opentsdb_publisher::domain::PLUGIN_RUNNING_ON_TAG;
use opentsdb_publisher::{MetricRecord, Namespace, Transformer};
use std::hint::black_box;

fn create_records(count: usize) -> Vec<MetricRecord> {
    (0..count)
        .map(|i| {
            let namespace = Namespace::from_path("/intel/docker")
                .add_dynamic("container", format!("container-{}", i % 16))
                .add_fixed("cpu")
                .add_dynamic("cpu_id", format!("{}", i % 8))
                .add_fixed("usage");
            MetricRecord::new(namespace, i as f64 * 0.5, Utc::now())
                .with_tag(PLUGIN_RUNNING_ON_TAG, "node1")
                .with_tag("env", "bench")
        })
        .collect()
}

fn benchmark_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    let transformer = Transformer::new();

    for size in [100, 1_000, 10_000] {
        let records = create_records(size);
        group.bench_with_input(BenchmarkId::new("records", size), &records, |b, records| {
            b.iter(|| black_box(transformer.transform(black_box(records))));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_transform);
criterion_main!(benches);
