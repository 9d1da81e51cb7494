use stochlab::prelude::*;

#[test]
fn test_integration_smoke() {
    // Streaming moments
    let mut acc = MomentAccumulator::default();
    for x in [1.0, 2.0, 3.0] {
        acc.update(x);
    }
    assert!((acc.mean() - 2.0).abs() < 1e-12);
    assert!((acc.variance() - 1.0).abs() < 1e-12);

    // A tiny simulation of each kind
    let mut rng = MonteCarloEngine::new(Some(0)).rng();
    let counting = simulate_counting_process(
        &CountingParams { steps: 100, paths: 10, ..CountingParams::default() },
        &mut rng,
    )
    .unwrap();
    assert_eq!(counting.final_values.len(), 10);

    let walk = simulate_random_walk(&WalkParams { steps: 5, paths: 10, ..WalkParams::default() }, &mut rng).unwrap();
    assert!(walk.final_values.iter().all(|s| s.abs() <= 5));

    let report = Scenario::Moments { data: vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] }
        .run(&mut rng)
        .unwrap();
    assert!(report.to_string().contains("online"));
}
