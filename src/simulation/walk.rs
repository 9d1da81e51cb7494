//! ±1 random walk
//!
//! Each step is −1 with probability `p` and +1 otherwise. After `n` steps
//! with `K` down-steps the walk sits at `n − 2K`, and `K ~ Binomial(n, p)`,
//! so the final position has mean `n(1 − 2p)` and variance `4np(1 − p)`
//! exactly.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_count, Result};
use crate::fit::{DiscreteFit, FrequencyTable};
use crate::probability::{Bernoulli, DiscreteDistribution, UniformSource, WalkEndpoint};
use crate::simulation::{run_paths, sorted_copy, FinalSummary, ProgressHook};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkParams {
    /// Steps `n`.
    pub steps: usize,
    /// Trajectories `m`.
    pub paths: usize,
    /// Probability of a −1 step.
    pub p_down: f64,
    pub display_count: usize,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            steps: 100,
            paths: 1000,
            p_down: 0.3,
            display_count: 20,
        }
    }
}

impl WalkParams {
    pub fn validate(&self) -> Result<()> {
        ensure_count("steps", self.steps)?;
        ensure_count("paths", self.paths)?;
        Bernoulli::new("p_down", self.p_down)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkEnsemble {
    pub params: WalkParams,
    /// Positions `S_0 = 0, S_1, …, S_n` for the first `display_count` paths.
    pub trajectories: Vec<Vec<i64>>,
    pub final_values: Vec<i64>,
    pub summary: FinalSummary,
    pub frequencies: FrequencyTable<i64>,
    /// Fit of the final positions against the exact endpoint law.
    pub fit: DiscreteFit,
}

impl WalkEnsemble {
    /// Distance of the ensemble mean from `n(1 − 2p)` in standard errors.
    pub fn mean_z_score(&self) -> f64 {
        let se = self.summary.standard_error();
        if se == 0.0 {
            0.0
        } else {
            (self.summary.moments.mean - self.summary.theoretical_mean) / se
        }
    }
}

pub fn simulate_random_walk<R: UniformSource + ?Sized>(
    params: &WalkParams,
    rng: &mut R,
) -> Result<WalkEnsemble> {
    simulate_random_walk_with_progress(params, rng, &mut ProgressHook::none())
}

pub fn simulate_random_walk_with_progress<R: UniformSource + ?Sized>(
    params: &WalkParams,
    rng: &mut R,
    progress: &mut ProgressHook<'_>,
) -> Result<WalkEnsemble> {
    params.validate()?;
    let down = Bernoulli::new("p_down", params.p_down)?;

    tracing::debug!(
        steps = params.steps,
        paths = params.paths,
        p_down = params.p_down,
        "simulating random walk"
    );

    let paths = run_paths(params.paths, params.display_count, progress, |keep| {
        let mut path = keep.then(|| {
            let mut path = Vec::with_capacity(params.steps + 1);
            path.push(0i64);
            path
        });
        let mut position = 0i64;
        for _ in 0..params.steps {
            position += if down.trial(rng) { -1 } else { 1 };
            if let Some(path) = path.as_mut() {
                path.push(position);
            }
        }
        (path, position)
    })?;

    let final_values = paths.outcomes;
    let endpoint = WalkEndpoint::new(params.steps as u64, params.p_down)?;
    let finals: Vec<f64> = final_values.iter().map(|&s| s as f64).collect();
    let summary =
        FinalSummary::from_sorted(&sorted_copy(&finals), endpoint.mean(), endpoint.variance())?;
    let frequencies: FrequencyTable<i64> = final_values.iter().copied().collect();
    let fit = DiscreteFit::evaluate(&frequencies, &endpoint);

    tracing::debug!(
        mean = summary.moments.mean,
        theoretical_mean = summary.theoretical_mean,
        ks = fit.ks,
        "random walk done"
    );

    Ok(WalkEnsemble {
        params: *params,
        trajectories: paths.trajectories,
        final_values,
        summary,
        frequencies,
        fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probability::{FnSource, MonteCarloEngine};

    #[test]
    fn test_steps_are_unit() {
        let mut rng = MonteCarloEngine::new(Some(3)).rng();
        let params = WalkParams { steps: 50, paths: 10, display_count: 10, ..WalkParams::default() };
        let ens = simulate_random_walk(&params, &mut rng).unwrap();
        for path in &ens.trajectories {
            assert_eq!(path.len(), 51);
            assert_eq!(path[0], 0);
            assert!(path.windows(2).all(|w| (w[1] - w[0]).abs() == 1));
        }
    }

    #[test]
    fn test_parity_of_final_positions() {
        let mut rng = MonteCarloEngine::new(Some(4)).rng();
        let params = WalkParams { steps: 21, paths: 200, ..WalkParams::default() };
        let ens = simulate_random_walk(&params, &mut rng).unwrap();
        assert!(ens.final_values.iter().all(|s| s.rem_euclid(2) == 1 && s.abs() <= 21));
    }

    #[test]
    fn test_degenerate_probabilities() {
        let params = WalkParams { steps: 10, paths: 5, p_down: 1.0, display_count: 0 };
        let ens = simulate_random_walk(&params, &mut FnSource(|| 0.5)).unwrap();
        assert!(ens.final_values.iter().all(|&s| s == -10));
        assert_eq!(ens.summary.moments.variance, 0.0);
        assert_eq!(ens.mean_z_score(), 0.0);
        assert!(ens.fit.ks.abs() < 1e-12);

        let params = WalkParams { p_down: 0.0, ..params };
        let ens = simulate_random_walk(&params, &mut FnSource(|| 0.5)).unwrap();
        assert!(ens.final_values.iter().all(|&s| s == 10));
    }

    #[test]
    fn test_mean_within_three_standard_errors() {
        let mut rng = MonteCarloEngine::new(Some(17)).rng();
        let params = WalkParams { steps: 50, paths: 20_000, p_down: 0.3, display_count: 0 };
        let ens = simulate_random_walk(&params, &mut rng).unwrap();
        assert_eq!(ens.summary.theoretical_mean, 20.0);
        assert!((ens.summary.theoretical_variance - 42.0).abs() < 1e-12);
        assert!(ens.mean_z_score().abs() < 3.0, "z = {}", ens.mean_z_score());
        assert!(ens.fit.ks < 0.02, "ks {}", ens.fit.ks);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut rng = MonteCarloEngine::new(Some(1)).rng();
        let params = WalkParams { p_down: 1.2, ..WalkParams::default() };
        assert!(simulate_random_walk(&params, &mut rng).is_err());
    }
}
