//! Law of large numbers: running relative frequency of a Bernoulli event
//!
//! Each trajectory records `f(k) = successes_k / k` for `k = 1..n`, starting
//! from `f(0) = 0`. At the final step the spread of `f(n)` across paths is
//! compared with the theoretical `sqrt(p(1 − p)/n)`.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_count, Result};
use crate::probability::{Bernoulli, UniformSource};
use crate::simulation::{run_paths, ProgressHook};
use crate::stats::{MomentAccumulator, MomentSummary};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyParams {
    /// Trials per trajectory `n`.
    pub trials: usize,
    /// Trajectories `m`.
    pub paths: usize,
    /// Success probability.
    pub p: f64,
    pub display_count: usize,
}

impl Default for FrequencyParams {
    fn default() -> Self {
        Self::fair_coin()
    }
}

impl FrequencyParams {
    /// Heads on a fair coin.
    pub fn fair_coin() -> Self {
        Self {
            trials: 1000,
            paths: 20,
            p: 0.5,
            display_count: 20,
        }
    }

    /// A six on a fair die.
    pub fn die_six() -> Self {
        Self {
            p: 1.0 / 6.0,
            ..Self::fair_coin()
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_count("trials", self.trials)?;
        ensure_count("paths", self.paths)?;
        Bernoulli::new("p", self.p)?;
        Ok(())
    }

    /// `sqrt(p(1 − p)/n)`
    pub fn theoretical_std(&self) -> f64 {
        (self.p * (1.0 - self.p) / self.trials as f64).sqrt()
    }
}

/// How closely the final frequencies sit on `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    Excellent,
    Good,
    Moderate,
}

impl Convergence {
    pub fn from_mean_abs_error(err: f64) -> Self {
        if err < 0.03 {
            Convergence::Excellent
        } else if err < 0.08 {
            Convergence::Good
        } else {
            Convergence::Moderate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEnsemble {
    pub params: FrequencyParams,
    /// `f(0..=n)` for the first `display_count` paths.
    pub trajectories: Vec<Vec<f64>>,
    pub final_frequencies: Vec<f64>,
    pub moments: MomentSummary,
    pub theoretical_std: f64,
    /// Mean of `|f(n) − p|` over paths.
    pub mean_abs_error: f64,
    pub convergence: Convergence,
}

pub fn simulate_relative_frequency<R: UniformSource + ?Sized>(
    params: &FrequencyParams,
    rng: &mut R,
) -> Result<FrequencyEnsemble> {
    simulate_relative_frequency_with_progress(params, rng, &mut ProgressHook::none())
}

pub fn simulate_relative_frequency_with_progress<R: UniformSource + ?Sized>(
    params: &FrequencyParams,
    rng: &mut R,
    progress: &mut ProgressHook<'_>,
) -> Result<FrequencyEnsemble> {
    params.validate()?;
    let event = Bernoulli::new("p", params.p)?;

    tracing::debug!(trials = params.trials, paths = params.paths, p = params.p, "simulating relative frequency");

    let paths = run_paths(params.paths, params.display_count, progress, |keep| {
        let mut path = keep.then(|| {
            let mut path = Vec::with_capacity(params.trials + 1);
            path.push(0.0);
            path
        });
        let mut successes = 0u64;
        for k in 1..=params.trials {
            if event.trial(rng) {
                successes += 1;
            }
            if let Some(path) = path.as_mut() {
                path.push(successes as f64 / k as f64);
            }
        }
        (path, successes as f64 / params.trials as f64)
    })?;

    let final_frequencies = paths.outcomes;
    let moments = final_frequencies.iter().copied().collect::<MomentAccumulator>().summary();
    let mean_abs_error = final_frequencies.iter().map(|f| (f - params.p).abs()).sum::<f64>()
        / final_frequencies.len() as f64;

    Ok(FrequencyEnsemble {
        params: *params,
        trajectories: paths.trajectories,
        final_frequencies,
        moments,
        theoretical_std: params.theoretical_std(),
        mean_abs_error,
        convergence: Convergence::from_mean_abs_error(mean_abs_error),
    })
}
