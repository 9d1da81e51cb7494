use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stochlab::stats::*;

// Helper to generate sample data
fn generate_sample_data(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 * 0.01).sin()).collect()
}

fn bench_online_vs_batch(c: &mut Criterion) {
    for &size in &[100, 1000, 10000] {
        let data = generate_sample_data(size);
        let mut group = c.benchmark_group(format!("moments_{}", size));

        group.bench_function("online", |b| {
            b.iter(|| black_box(online_moments(black_box(&data)).unwrap()))
        });

        group.bench_function("batch", |b| {
            b.iter(|| black_box(batch_moments(black_box(&data)).unwrap()))
        });

        group.bench_function("power_sum", |b| {
            b.iter(|| black_box(power_sum_moments(black_box(&data)).unwrap()))
        });

        group.finish();
    }
}

fn bench_accumulator_update(c: &mut Criterion) {
    c.bench_function("accumulator_update", |b| {
        let mut acc = MomentAccumulator::default();
        let mut x = 0.0;
        b.iter(|| {
            x += 0.001;
            acc.update(black_box(x));
        });
        black_box(acc.summary());
    });
}

fn bench_descriptive(c: &mut Criterion) {
    let mut data = generate_sample_data(10000);
    data.sort_by(|a, b| a.total_cmp(b));
    c.bench_function("descriptive_sorted_10000", |b| {
        b.iter(|| black_box(Descriptive::from_sorted(black_box(&data)).unwrap()))
    });
}

criterion_group!(benches, bench_online_vs_batch, bench_accumulator_update, bench_descriptive);
criterion_main!(benches);
