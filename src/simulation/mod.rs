//! Monte Carlo path simulators
//!
//! Every simulator follows the same contract:
//!
//! - a plain parameter struct with public fields and `validate()`
//! - an injected [`UniformSource`](crate::probability::UniformSource)
//! - `m` independent trajectories of `n` steps over `[0, T]`
//! - only the first `display_count` trajectories are kept in full; the rest
//!   contribute their final value and are dropped
//!
//! # Simulators
//!
//! - [`counting`]: Bernoulli-per-substep approximation of a Poisson process
//! - [`sde`]: Euler–Maruyama stepper; the Wiener process is its
//!   constant-coefficient case
//! - [`walk`]: ±1 random walk with a Binomial endpoint law
//! - [`lln`]: running relative frequency of a Bernoulli event
//! - [`convergence`]: discretization sweeps over the step count
//!
//! # Progress and cancellation
//!
//! Each simulator has a `*_with_progress` variant taking a [`ProgressHook`].
//! The hook runs every `every` trajectories and may return
//! `ControlFlow::Break(())`; the run is then discarded and
//! [`SimError::Cancelled`] is returned. Partial ensembles are never returned.
//!
//! ```
//! use std::ops::ControlFlow;
//! use stochlab::probability::MonteCarloEngine;
//! use stochlab::simulation::{counting::{simulate_counting_process_with_progress, CountingParams}, ProgressHook};
//!
//! let params = CountingParams { paths: 100, ..CountingParams::default() };
//! let mut rng = MonteCarloEngine::new(Some(1)).rng();
//! let mut hook = ProgressHook::new(10, |done, _| {
//!     if done >= 30 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
//! });
//! assert!(simulate_counting_process_with_progress(&params, &mut rng, &mut hook).is_err());
//! ```

pub mod convergence;
pub mod counting;
pub mod lln;
pub mod sde;
pub mod walk;

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::stats::{Descriptive, MomentAccumulator, MomentSummary};

pub use convergence::{counting_convergence, walk_convergence, ConvergencePoint};
pub use counting::{simulate_counting_process, CountingEnsemble, CountingParams};
pub use lln::{simulate_relative_frequency, FrequencyEnsemble, FrequencyParams};
pub use sde::{
    simulate_sde, simulate_wiener, Coefficient, CoefficientSde, ContinuousEnsemble, EulerMaruyama,
    ExactMoments, FnSde, NormalFit, Sde, SdeParams, WienerParams,
};
pub use walk::{simulate_random_walk, WalkEnsemble, WalkParams};

/// Progress callback invoked every `every` completed trajectories.
///
/// The callback receives `(completed, requested)`.
pub struct ProgressHook<'a> {
    every: usize,
    callback: Box<dyn FnMut(usize, usize) -> ControlFlow<()> + 'a>,
}

impl<'a> ProgressHook<'a> {
    /// `every` is clamped to at least one trajectory.
    pub fn new<F>(every: usize, callback: F) -> Self
    where
        F: FnMut(usize, usize) -> ControlFlow<()> + 'a,
    {
        Self {
            every: every.max(1),
            callback: Box::new(callback),
        }
    }

    /// A hook that never fires.
    pub fn none() -> Self {
        Self::new(usize::MAX, |_, _| ControlFlow::Continue(()))
    }

    fn check(&mut self, completed: usize, requested: usize) -> Result<()> {
        if completed % self.every != 0 {
            return Ok(());
        }
        match (self.callback)(completed, requested) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => {
                tracing::debug!(completed, requested, "simulation cancelled by progress hook");
                Err(SimError::Cancelled { completed, requested })
            }
        }
    }
}

impl std::fmt::Debug for ProgressHook<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressHook").field("every", &self.every).finish_non_exhaustive()
    }
}

/// Raw output of an ensemble run before any statistics are attached.
pub(crate) struct Paths<T, O> {
    pub trajectories: Vec<Vec<T>>,
    pub outcomes: Vec<O>,
}

/// Runs `paths` trajectories.
///
/// `one_path(keep)` simulates a single trajectory and returns the full path
/// only when `keep` is set, together with its per-path outcome.
pub(crate) fn run_paths<T, O, F>(
    paths: usize,
    display_count: usize,
    progress: &mut ProgressHook<'_>,
    mut one_path: F,
) -> Result<Paths<T, O>>
where
    F: FnMut(bool) -> (Option<Vec<T>>, O),
{
    let mut trajectories = Vec::with_capacity(display_count.min(paths));
    let mut outcomes = Vec::with_capacity(paths);

    for i in 0..paths {
        let (path, outcome) = one_path(i < display_count);
        if let Some(path) = path {
            trajectories.push(path);
        }
        outcomes.push(outcome);
        progress.check(i + 1, paths)?;
    }

    Ok(Paths { trajectories, outcomes })
}

/// `t_i = i·T/n` for `i = 0..=n`.
pub fn time_grid(horizon: f64, steps: usize) -> Vec<f64> {
    (0..=steps).map(|i| i as f64 / steps as f64 * horizon).collect()
}

/// Empirical vs theoretical summary of an ensemble's final values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalSummary {
    pub moments: MomentSummary,
    pub descriptive: Descriptive,
    pub theoretical_mean: f64,
    pub theoretical_variance: f64,
}

impl FinalSummary {
    pub(crate) fn from_sorted(
        sorted: &[f64],
        theoretical_mean: f64,
        theoretical_variance: f64,
    ) -> Result<Self> {
        let moments = sorted.iter().copied().collect::<MomentAccumulator>().summary();
        if moments.n > 1 && moments.variance == 0.0 {
            tracing::warn!(mean = moments.mean, "final values have zero variance");
        }
        Ok(Self {
            moments,
            descriptive: Descriptive::from_sorted(sorted)?,
            theoretical_mean,
            theoretical_variance,
        })
    }

    /// `|mean − E| / |E|` in percent; `None` when `E = 0`.
    pub fn mean_error_pct(&self) -> Option<f64> {
        relative_error_pct(self.moments.mean, self.theoretical_mean)
    }

    /// `|var − Var| / Var` in percent; `None` when `Var = 0`.
    pub fn variance_error_pct(&self) -> Option<f64> {
        relative_error_pct(self.moments.variance, self.theoretical_variance)
    }

    /// Standard error of the ensemble mean under the theoretical variance.
    pub fn standard_error(&self) -> f64 {
        (self.theoretical_variance / self.moments.n as f64).sqrt()
    }
}

fn relative_error_pct(empirical: f64, theoretical: f64) -> Option<f64> {
    if theoretical == 0.0 {
        None
    } else {
        Some((empirical - theoretical).abs() / theoretical.abs() * 100.0)
    }
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}
