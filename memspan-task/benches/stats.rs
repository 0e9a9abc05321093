use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use memspan_task::stats::summarize;

fn bench_summarize(c: &mut Criterion) {
    let times: Vec<f64> = (0..1_000).map(|i| ((i * 37) % 400) as f64 / 100.0).collect();
    c.bench_function("summarize_1k_latencies", |b| {
        b.iter(|| summarize(black_box(&times)).unwrap())
    });
}

criterion_group!(benches, bench_summarize);
criterion_main!(benches);
