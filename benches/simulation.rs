use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stochlab::prelude::*;

fn bench_counting_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("counting_process");
    group.sample_size(20);

    for &steps in &[100usize, 1000, 5000] {
        let params = CountingParams {
            steps,
            paths: 200,
            ..CountingParams::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(steps), &params, |b, params| {
            let mut rng = MonteCarloEngine::new(Some(42)).rng();
            b.iter(|| black_box(simulate_counting_process(black_box(params), &mut rng).unwrap()))
        });
    }
    group.finish();
}

fn bench_sde(c: &mut Criterion) {
    let mut group = c.benchmark_group("sde");
    group.sample_size(20);

    let params = SdeParams {
        paths: 200,
        ..SdeParams::default()
    };
    let gbm = CoefficientSde::geometric(0.05, 0.2);
    group.bench_function("geometric_1000_steps", |b| {
        let mut rng = MonteCarloEngine::new(Some(42)).rng();
        b.iter(|| black_box(simulate_sde(&params, &gbm, &mut rng).unwrap()))
    });

    let wiener = WienerParams {
        paths: 200,
        ..WienerParams::default()
    };
    group.bench_function("wiener_1000_steps", |b| {
        let mut rng = MonteCarloEngine::new(Some(42)).rng();
        b.iter(|| black_box(simulate_wiener(&wiener, &mut rng).unwrap()))
    });
    group.finish();
}

fn bench_random_walk(c: &mut Criterion) {
    let params = WalkParams {
        paths: 1000,
        ..WalkParams::default()
    };
    c.bench_function("random_walk_100_steps", |b| {
        let mut rng = MonteCarloEngine::new(Some(42)).rng();
        b.iter(|| black_box(simulate_random_walk(&params, &mut rng).unwrap()))
    });
}

fn bench_key_search(c: &mut Criterion) {
    let plain = "It was the best of times, it was the worst of times, it was the age of wisdom";
    let reference = ReferenceDistribution::language(Language::English);
    let caesar_cipher = stochlab::crypto::caesar::encrypt(plain, 11);
    c.bench_function("caesar_search", |b| {
        b.iter(|| black_box(best_caesar_shift(black_box(&caesar_cipher), &reference).unwrap()))
    });

    let keys = RsaKeys::generate(61, 53, Some(17)).unwrap();
    let rsa_cipher = stochlab::crypto::rsa::encrypt(plain, keys.e, keys.n);
    c.bench_function("rsa_search_3233", |b| {
        b.iter(|| {
            black_box(best_rsa_key(black_box(&rsa_cipher), keys.e, keys.phi, keys.n, &reference).unwrap())
        })
    });
}

criterion_group!(benches, bench_counting_process, bench_sde, bench_random_walk, bench_key_search);
criterion_main!(benches);
