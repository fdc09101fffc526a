use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use lexbucket::prelude::*;
use rand::Rng;
use rayon::slice::ParallelSliceMut;
use std::hint::black_box;
use std::time::Duration;

fn bench_1m_suffixes(c: &mut Criterion) {
    let mut group = c.benchmark_group("1M Suffixes");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(90));

    let mut rng = rand::rng();
    let text: Vec<u8> = (0..1_000_000)
        .map(|_| b'a' + rng.random_range(0..26u8))
        .collect();
    group.throughput(Throughput::Elements(text.len() as u64));

    group.bench_function("BucketIndex::add_suffixes + sort", |b| {
        b.iter(|| {
            let config = IndexConfig::new(text.len()).with_arena_sizing(ArenaSizing::Exact);
            let mut index = BucketIndex::with_config(config).unwrap();
            index.add_suffixes(black_box(&text)).unwrap();
            index.sort();
            black_box(index.len())
        })
    });

    group.bench_function("BucketIndex::add (single) + sort", |b| {
        b.iter(|| {
            let mut index = BucketIndex::new(text.len()).unwrap();
            for i in 0..text.len() {
                index.add(&text[i..]).unwrap();
            }
            index.sort();
            black_box(index.len())
        })
    });

    group.bench_function("rayon par_sort_unstable", |b| {
        b.iter_batched(
            || (0..text.len()).map(|i| &text[i..]).collect::<Vec<&[u8]>>(),
            |mut data| data.par_sort_unstable(),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_1m_suffixes);
criterion_main!(benches);
