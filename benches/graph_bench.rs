use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rag_index::{GraphKey, ResourceAllocationGraph};
use std::time::Duration;

type Rag = ResourceAllocationGraph<u32, u64>;

// Process i waits on resource i % resources; resource i is held by process i.
fn build(processes: u32, resources: u32) -> Rag {
    let mut g = Rag::new();
    for i in 0..resources {
        g.insert(GraphKey::resource(i), None, None).unwrap();
    }
    for i in 0..processes {
        let wants = g.node_id(&GraphKey::resource(i % resources));
        g.insert(GraphKey::process(i), Some(i as u64), wants).unwrap();
    }
    for i in 0..resources.min(processes) {
        let holder = g.node_id(&GraphKey::process(i));
        g.insert(GraphKey::resource(i), None, holder).unwrap();
    }
    g
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("graph::build_50k_proc_10k_res", |b| {
        b.iter(|| black_box(build(50_000, 10_000)))
    });
}

fn bench_updates(c: &mut Criterion) {
    c.bench_function("graph::soft_insert_noop_50k", |b| {
        b.iter_batched(
            || build(50_000, 10_000),
            |mut g| {
                for i in 0..50_000u32 {
                    black_box(g.insert(GraphKey::process(i), Some(0), None).unwrap());
                }
                black_box(g)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("graph::hard_insert_data_50k", |b| {
        b.iter_batched(
            || build(50_000, 10_000),
            |mut g| {
                for i in 0..50_000u32 {
                    black_box(g.hard_insert(GraphKey::process(i), Some(1), None).unwrap());
                }
                black_box(g)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_convert(c: &mut Criterion) {
    c.bench_function("graph::convert_to_undirected_60k", |b| {
        b.iter_batched(
            || build(50_000, 10_000),
            |mut g| {
                g.convert_to_undirected();
                black_box(g)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_build, bench_updates, bench_convert
}
criterion_main!(benches);
