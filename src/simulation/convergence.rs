//! Discretization sweeps
//!
//! Re-run a simulator for increasing step counts and report how far the
//! ensemble sits from the closed form at each one.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::probability::UniformSource;
use crate::simulation::{
    simulate_counting_process, simulate_random_walk, CountingParams, FinalSummary, WalkParams,
};

/// Default step counts for the counting-process sweep.
pub const COUNTING_STEP_COUNTS: [usize; 6] = [100, 250, 500, 1000, 2500, 5000];
/// Default trajectories per point of the counting-process sweep.
pub const COUNTING_SWEEP_PATHS: usize = 300;

/// Default step counts for the random-walk sweep.
pub const WALK_STEP_COUNTS: [usize; 6] = [10, 20, 50, 100, 200, 500];
pub const WALK_SWEEP_PATHS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub steps: usize,
    pub mean: f64,
    pub theoretical_mean: f64,
    /// `None` when the theoretical mean is zero.
    pub mean_error_pct: Option<f64>,
    pub variance_error_pct: Option<f64>,
    pub ks: f64,
}

impl ConvergencePoint {
    fn new(steps: usize, summary: &FinalSummary, ks: f64) -> Self {
        Self {
            steps,
            mean: summary.moments.mean,
            theoretical_mean: summary.theoretical_mean,
            mean_error_pct: summary.mean_error_pct(),
            variance_error_pct: summary.variance_error_pct(),
            ks,
        }
    }
}

/// Counting process at each step count; other parameters come from `base`.
pub fn counting_convergence<R: UniformSource + ?Sized>(
    base: &CountingParams,
    step_counts: &[usize],
    rng: &mut R,
) -> Result<Vec<ConvergencePoint>> {
    step_counts
        .iter()
        .map(|&steps| {
            let params = CountingParams {
                steps,
                display_count: 0,
                ..*base
            };
            let ens = simulate_counting_process(&params, rng)?;
            tracing::debug!(steps, ks = ens.fit.ks, "counting sweep point");
            Ok(ConvergencePoint::new(steps, &ens.summary, ens.fit.ks))
        })
        .collect()
}

/// Random walk at each step count; other parameters come from `base`.
pub fn walk_convergence<R: UniformSource + ?Sized>(
    base: &WalkParams,
    step_counts: &[usize],
    rng: &mut R,
) -> Result<Vec<ConvergencePoint>> {
    step_counts
        .iter()
        .map(|&steps| {
            let params = WalkParams {
                steps,
                display_count: 0,
                ..*base
            };
            let ens = simulate_random_walk(&params, rng)?;
            tracing::debug!(steps, ks = ens.fit.ks, "walk sweep point");
            Ok(ConvergencePoint::new(steps, &ens.summary, ens.fit.ks))
        })
        .collect()
}
