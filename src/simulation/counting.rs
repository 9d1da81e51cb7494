//! Discretized Poisson counting process
//!
//! `[0, T]` is split into `n` substeps of width `Δt = T/n`. In each substep
//! one Bernoulli trial with `p = λ·Δt` decides whether an event occurs, so
//! the count at `T` is `Binomial(n, λT/n)`, which tends to `Poisson(λT)` as
//! `n` grows.
//!
//! Each trajectory also records its first-event time: `(i + 1)·Δt` for the
//! first successful substep `i`, or `T` when no event occurs. Its mean is
//! compared against the Exponential(λ) mean `1/λ`.
//!
//! `λ·Δt > 1` is not a probability and is rejected.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_count, ensure_positive, Result, SimError};
use crate::fit::{DiscreteFit, FrequencyTable};
use crate::probability::{Bernoulli, DiscreteDistribution, Exponential, Poisson, UniformSource};
use crate::simulation::{run_paths, sorted_copy, time_grid, FinalSummary, ProgressHook};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountingParams {
    /// Horizon `T`.
    pub horizon: f64,
    /// Event rate `λ`.
    pub rate: f64,
    /// Substeps `n`.
    pub steps: usize,
    /// Trajectories `m`.
    pub paths: usize,
    pub display_count: usize,
}

impl Default for CountingParams {
    fn default() -> Self {
        Self {
            horizon: 1.0,
            rate: 5.0,
            steps: 1000,
            paths: 1000,
            display_count: 50,
        }
    }
}

impl CountingParams {
    #[inline]
    pub fn dt(&self) -> f64 {
        self.horizon / self.steps as f64
    }

    /// Per-substep event probability `λ·Δt`.
    #[inline]
    pub fn step_probability(&self) -> f64 {
        self.rate * self.dt()
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("horizon", self.horizon)?;
        ensure_positive("rate", self.rate)?;
        ensure_count("steps", self.steps)?;
        ensure_count("paths", self.paths)?;
        let p = self.step_probability();
        if p > 1.0 {
            return Err(SimError::StepProbabilityTooLarge {
                rate: self.rate,
                dt: self.dt(),
                p,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountingEnsemble {
    pub params: CountingParams,
    pub dt: f64,
    pub step_probability: f64,
    pub time_grid: Vec<f64>,
    /// Counts `N(t_i)`, one per grid point, for the first `display_count` paths.
    pub trajectories: Vec<Vec<u64>>,
    pub final_values: Vec<u64>,
    pub first_event_times: Vec<f64>,
    pub summary: FinalSummary,
    pub frequencies: FrequencyTable<i64>,
    /// Fit of the final counts against `Poisson(λT)`.
    pub fit: DiscreteFit,
    pub mean_first_event_time: f64,
    pub theoretical_mean_first_event_time: f64,
}

impl CountingEnsemble {
    /// Empirical mean over variance; near one for Poisson counts.
    pub fn dispersion_index(&self) -> f64 {
        self.summary.moments.mean / self.summary.moments.variance
    }
}

pub fn simulate_counting_process<R: UniformSource + ?Sized>(
    params: &CountingParams,
    rng: &mut R,
) -> Result<CountingEnsemble> {
    simulate_counting_process_with_progress(params, rng, &mut ProgressHook::none())
}

pub fn simulate_counting_process_with_progress<R: UniformSource + ?Sized>(
    params: &CountingParams,
    rng: &mut R,
    progress: &mut ProgressHook<'_>,
) -> Result<CountingEnsemble> {
    params.validate()?;
    let dt = params.dt();
    let event = Bernoulli::new("step_probability", params.step_probability())?;
    let expected = params.rate * params.horizon;

    tracing::debug!(
        horizon = params.horizon,
        rate = params.rate,
        steps = params.steps,
        paths = params.paths,
        p = event.p(),
        "simulating counting process"
    );

    let paths = run_paths(params.paths, params.display_count, progress, |keep| {
        let mut path = keep.then(|| {
            let mut path = Vec::with_capacity(params.steps + 1);
            path.push(0u64);
            path
        });
        let mut count = 0u64;
        let mut first_event = None;
        for i in 0..params.steps {
            if event.trial(rng) {
                count += 1;
                if first_event.is_none() {
                    first_event = Some((i + 1) as f64 * dt);
                }
            }
            if let Some(path) = path.as_mut() {
                path.push(count);
            }
        }
        (path, (count, first_event.unwrap_or(params.horizon)))
    })?;

    let (final_values, first_event_times): (Vec<u64>, Vec<f64>) =
        paths.outcomes.into_iter().unzip();

    let poisson = Poisson::new(expected)?;
    let finals: Vec<f64> = final_values.iter().map(|&c| c as f64).collect();
    let summary = FinalSummary::from_sorted(&sorted_copy(&finals), poisson.mean(), poisson.variance())?;
    let frequencies: FrequencyTable<i64> = final_values.iter().map(|&c| c as i64).collect();
    let fit = DiscreteFit::evaluate(&frequencies, &poisson);

    let mean_first_event_time =
        first_event_times.iter().sum::<f64>() / first_event_times.len() as f64;
    let theoretical_mean_first_event_time = Exponential::new(params.rate)?.mean();

    tracing::debug!(
        mean = summary.moments.mean,
        variance = summary.moments.variance,
        ks = fit.ks,
        chi_square = fit.chi_square,
        "counting process done"
    );

    Ok(CountingEnsemble {
        params: *params,
        dt,
        step_probability: event.p(),
        time_grid: time_grid(params.horizon, params.steps),
        trajectories: paths.trajectories,
        final_values,
        first_event_times,
        summary,
        frequencies,
        fit,
        mean_first_event_time,
        theoretical_mean_first_event_time,
    })
}
