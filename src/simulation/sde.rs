//! Itô SDEs via Euler–Maruyama, and the Wiener process with drift
//!
//! ```text
//! dX = a(X, t) dt + b(X, t) dW
//! X_{i+1} = X_i + a(X_i, t_i)·Δt + b(X_i, t_i)·√Δt·Z_i,   Z_i ~ N(0, 1)
//! ```
//!
//! Coefficients are injected through the [`Sde`] trait: plain closures via
//! [`FnSde`], or the serializable [`Coefficient`] forms via
//! [`CoefficientSde`]. The Wiener process with drift `μ` and volatility `σ`
//! is the constant-coefficient case and goes through the same stepper.
//!
//! # Closed forms
//!
//! [`CoefficientSde`] knows the exact law of `X_T` for:
//!
//! | drift     | diffusion | process                  | `X_T`     |
//! |-----------|-----------|--------------------------|-----------|
//! | `c`       | `c`       | Brownian motion w/ drift | normal    |
//! | `c·x`     | `c`       | Ornstein–Uhlenbeck type  | normal    |
//! | `c·x`     | `c·x`     | geometric Brownian       | lognormal |
//!
//! Gaussian endpoints are also scored with a continuous KS statistic.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_count, ensure_finite, ensure_positive, Result};
use crate::fit::{ks_statistic_continuous, FitQuality};
use crate::probability::{uniform_to_normal, Normal, UniformSource};
use crate::simulation::{run_paths, sorted_copy, time_grid, ProgressHook};
use crate::stats::{Descriptive, MomentAccumulator, MomentSummary};

/// Drift and diffusion of an Itô SDE.
pub trait Sde {
    /// `a(x, t)`
    fn drift(&self, x: f64, t: f64) -> f64;

    /// `b(x, t)`
    fn diffusion(&self, x: f64, t: f64) -> f64;

    /// Exact mean and variance of `X_T` from `x0`, when known.
    fn exact_moments(&self, _x0: f64, _horizon: f64) -> Option<ExactMoments> {
        None
    }

    /// Checked once before stepping; closures cannot be inspected and pass.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// An SDE from two closures `(x, t) -> f64`.
///
/// ```
/// use stochlab::simulation::{FnSde, Sde};
///
/// // Mean-reverting towards 1
/// let sde = FnSde::new(|x, _t| 2.0 * (1.0 - x), |_x, _t| 0.3);
/// assert_eq!(sde.drift(0.0, 0.0), 2.0);
/// ```
#[derive(Clone, Copy)]
pub struct FnSde<A, B> {
    pub drift: A,
    pub diffusion: B,
}

impl<A, B> FnSde<A, B>
where
    A: Fn(f64, f64) -> f64,
    B: Fn(f64, f64) -> f64,
{
    pub fn new(drift: A, diffusion: B) -> Self {
        Self { drift, diffusion }
    }
}

impl<A, B> Sde for FnSde<A, B>
where
    A: Fn(f64, f64) -> f64,
    B: Fn(f64, f64) -> f64,
{
    #[inline]
    fn drift(&self, x: f64, t: f64) -> f64 {
        (self.drift)(x, t)
    }

    #[inline]
    fn diffusion(&self, x: f64, t: f64) -> f64 {
        (self.diffusion)(x, t)
    }
}

/// A time-homogeneous coefficient form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", content = "c", rename_all = "snake_case")]
pub enum Coefficient {
    /// `c`
    Constant(f64),
    /// `c·x`
    Linear(f64),
}

impl Coefficient {
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        match *self {
            Coefficient::Constant(c) => c,
            Coefficient::Linear(c) => c * x,
        }
    }

    pub fn validate(&self, name: &'static str) -> Result<()> {
        match *self {
            Coefficient::Constant(c) | Coefficient::Linear(c) => ensure_finite(name, c).map(drop),
        }
    }
}

/// SDE built from serializable coefficient forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSde {
    pub drift: Coefficient,
    pub diffusion: Coefficient,
}

impl CoefficientSde {
    /// Brownian motion with drift `mu` and volatility `sigma`.
    pub fn wiener(mu: f64, sigma: f64) -> Self {
        Self {
            drift: Coefficient::Constant(mu),
            diffusion: Coefficient::Constant(sigma),
        }
    }

    /// Geometric Brownian motion `dX = mu·X dt + sigma·X dW`.
    pub fn geometric(mu: f64, sigma: f64) -> Self {
        Self {
            drift: Coefficient::Linear(mu),
            diffusion: Coefficient::Linear(sigma),
        }
    }

}

impl Sde for CoefficientSde {
    fn validate(&self) -> Result<()> {
        self.drift.validate("drift")?;
        self.diffusion.validate("diffusion")
    }

    #[inline]
    fn drift(&self, x: f64, _t: f64) -> f64 {
        self.drift.eval(x)
    }

    #[inline]
    fn diffusion(&self, x: f64, _t: f64) -> f64 {
        self.diffusion.eval(x)
    }

    fn exact_moments(&self, x0: f64, horizon: f64) -> Option<ExactMoments> {
        use Coefficient::{Constant, Linear};

        match (self.drift, self.diffusion) {
            (Constant(a), Constant(b)) => Some(ExactMoments {
                mean: x0 + a * horizon,
                variance: b * b * horizon,
                gaussian: true,
            }),
            (Linear(a), Constant(b)) => {
                let growth = (a * horizon).exp();
                let variance = if a == 0.0 {
                    b * b * horizon
                } else {
                    b * b * ((2.0 * a * horizon).exp() - 1.0) / (2.0 * a)
                };
                Some(ExactMoments {
                    mean: x0 * growth,
                    variance,
                    gaussian: true,
                })
            }
            (Linear(a), Linear(b)) => {
                let mean = x0 * (a * horizon).exp();
                Some(ExactMoments {
                    mean,
                    variance: mean * mean * ((b * b * horizon).exp() - 1.0),
                    gaussian: false,
                })
            }
            (Constant(_), Linear(_)) => None,
        }
    }
}

/// Closed-form mean and variance of `X_T`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExactMoments {
    pub mean: f64,
    pub variance: f64,
    /// `X_T` is normally distributed.
    pub gaussian: bool,
}

/// One Euler–Maruyama step of width `dt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerMaruyama {
    dt: f64,
    sqrt_dt: f64,
}

impl EulerMaruyama {
    pub fn new(dt: f64) -> Self {
        Self { dt, sqrt_dt: dt.sqrt() }
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[inline]
    pub fn step<S: Sde + ?Sized>(&self, sde: &S, x: f64, t: f64, z: f64) -> f64 {
        x + sde.drift(x, t) * self.dt + sde.diffusion(x, t) * self.sqrt_dt * z
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdeParams {
    pub horizon: f64,
    pub steps: usize,
    pub paths: usize,
    /// Initial value `X_0`.
    pub x0: f64,
    pub display_count: usize,
}

impl Default for SdeParams {
    fn default() -> Self {
        Self {
            horizon: 1.0,
            steps: 1000,
            paths: 500,
            x0: 1.0,
            display_count: 50,
        }
    }
}

impl SdeParams {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("horizon", self.horizon)?;
        ensure_count("steps", self.steps)?;
        ensure_count("paths", self.paths)?;
        ensure_finite("x0", self.x0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WienerParams {
    pub horizon: f64,
    pub steps: usize,
    pub paths: usize,
    /// Drift `μ`.
    pub drift: f64,
    /// Volatility `σ`.
    pub volatility: f64,
    pub display_count: usize,
}

impl Default for WienerParams {
    fn default() -> Self {
        Self {
            horizon: 1.0,
            steps: 1000,
            paths: 500,
            drift: 0.0,
            volatility: 1.0,
            display_count: 50,
        }
    }
}

impl WienerParams {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("horizon", self.horizon)?;
        ensure_count("steps", self.steps)?;
        ensure_count("paths", self.paths)?;
        ensure_finite("drift", self.drift)?;
        ensure_positive("volatility", self.volatility)?;
        Ok(())
    }

    fn sde_params(&self) -> SdeParams {
        SdeParams {
            horizon: self.horizon,
            steps: self.steps,
            paths: self.paths,
            x0: 0.0,
            display_count: self.display_count,
        }
    }
}

/// KS fit of the final values against the exact normal law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalFit {
    pub reference: Normal,
    pub ks: f64,
    pub quality: FitQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousEnsemble {
    pub params: SdeParams,
    pub dt: f64,
    pub time_grid: Vec<f64>,
    pub trajectories: Vec<Vec<f64>>,
    pub final_values: Vec<f64>,
    pub moments: MomentSummary,
    pub descriptive: Descriptive,
    pub theoretical: Option<ExactMoments>,
    pub normal_fit: Option<NormalFit>,
    /// Share of final values strictly above zero.
    pub prob_positive: f64,
    /// Share of final values strictly below zero.
    pub prob_negative: f64,
}

/// Wiener process with drift: `X_{i+1} = X_i + μΔt + σ√Δt·Z_i` from zero.
pub fn simulate_wiener<R: UniformSource + ?Sized>(
    params: &WienerParams,
    rng: &mut R,
) -> Result<ContinuousEnsemble> {
    simulate_wiener_with_progress(params, rng, &mut ProgressHook::none())
}

pub fn simulate_wiener_with_progress<R: UniformSource + ?Sized>(
    params: &WienerParams,
    rng: &mut R,
    progress: &mut ProgressHook<'_>,
) -> Result<ContinuousEnsemble> {
    params.validate()?;
    let sde = CoefficientSde::wiener(params.drift, params.volatility);
    simulate_sde_with_progress(&params.sde_params(), &sde, rng, progress)
}

pub fn simulate_sde<S, R>(params: &SdeParams, sde: &S, rng: &mut R) -> Result<ContinuousEnsemble>
where
    S: Sde + ?Sized,
    R: UniformSource + ?Sized,
{
    simulate_sde_with_progress(params, sde, rng, &mut ProgressHook::none())
}

pub fn simulate_sde_with_progress<S, R>(
    params: &SdeParams,
    sde: &S,
    rng: &mut R,
    progress: &mut ProgressHook<'_>,
) -> Result<ContinuousEnsemble>
where
    S: Sde + ?Sized,
    R: UniformSource + ?Sized,
{
    params.validate()?;
    sde.validate()?;
    let stepper = EulerMaruyama::new(params.horizon / params.steps as f64);
    let dt = stepper.dt();

    tracing::debug!(
        horizon = params.horizon,
        steps = params.steps,
        paths = params.paths,
        x0 = params.x0,
        "simulating sde"
    );

    let paths = run_paths(params.paths, params.display_count, progress, |keep| {
        let mut path = keep.then(|| {
            let mut path = Vec::with_capacity(params.steps + 1);
            path.push(params.x0);
            path
        });
        let mut x = params.x0;
        for i in 0..params.steps {
            let z = uniform_to_normal(rng);
            x = stepper.step(sde, x, i as f64 * dt, z);
            if let Some(path) = path.as_mut() {
                path.push(x);
            }
        }
        (path, x)
    })?;

    let final_values = paths.outcomes;
    let sorted = sorted_copy(&final_values);
    let moments = final_values.iter().copied().collect::<MomentAccumulator>().summary();
    let descriptive = Descriptive::from_sorted(&sorted)?;
    let m = final_values.len() as f64;
    let prob_positive = final_values.iter().filter(|&&x| x > 0.0).count() as f64 / m;
    let prob_negative = final_values.iter().filter(|&&x| x < 0.0).count() as f64 / m;

    let theoretical = sde.exact_moments(params.x0, params.horizon);
    let normal_fit = match theoretical {
        Some(exact) if exact.gaussian && exact.variance > 0.0 => {
            let reference = Normal::new(exact.mean, exact.variance.sqrt())?;
            let ks = ks_statistic_continuous(&sorted, &reference);
            Some(NormalFit {
                reference,
                ks,
                quality: FitQuality::from_ks(ks),
            })
        }
        _ => None,
    };

    if moments.n > 1 && moments.variance == 0.0 {
        tracing::warn!(mean = moments.mean, "final values have zero variance");
    }
    tracing::debug!(
        mean = moments.mean,
        variance = moments.variance,
        ks = ?normal_fit.map(|f| f.ks),
        "sde done"
    );

    Ok(ContinuousEnsemble {
        params: *params,
        dt,
        time_grid: time_grid(params.horizon, params.steps),
        trajectories: paths.trajectories,
        final_values,
        moments,
        descriptive,
        theoretical,
        normal_fit,
        prob_positive,
        prob_negative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::probability::{FnSource, MonteCarloEngine};

    #[test]
    fn test_euler_step_formula() {
        let stepper = EulerMaruyama::new(0.04);
        let sde = CoefficientSde::wiener(1.0, 2.0);
        // x + 1·0.04 + 2·0.2·0.5
        let x = stepper.step(&sde, 3.0, 0.0, 0.5);
        assert!((x - 3.24).abs() < 1e-12);
    }

    #[test]
    fn test_closure_sde_matches_coefficients() {
        let closures = FnSde::new(|x, _| 0.1 * x, |x, _| 0.2 * x);
        let presets = CoefficientSde::geometric(0.1, 0.2);
        let params = SdeParams { steps: 50, paths: 20, ..SdeParams::default() };
        let engine = MonteCarloEngine::new(Some(4));
        let a = simulate_sde(&params, &closures, &mut engine.rng()).unwrap();
        let b = simulate_sde(&params, &presets, &mut engine.rng()).unwrap();
        assert_eq!(a.final_values, b.final_values);
        assert!(a.theoretical.is_none());
        assert!(b.theoretical.is_some());
    }

    #[test]
    fn test_wiener_moments_and_fit() {
        let mut rng = MonteCarloEngine::new(Some(21)).rng();
        let params = WienerParams {
            horizon: 2.0,
            steps: 200,
            paths: 4000,
            drift: 0.5,
            volatility: 1.5,
            display_count: 10,
        };
        let ens = simulate_wiener(&params, &mut rng).unwrap();
        let exact = ens.theoretical.unwrap();
        assert_eq!(exact.mean, 1.0);
        assert!((exact.variance - 4.5).abs() < 1e-12);

        // SE of the mean is sqrt(4.5 / 4000) ≈ 0.034
        assert!((ens.moments.mean - 1.0).abs() < 0.12, "mean {}", ens.moments.mean);
        assert!((ens.moments.variance - 4.5).abs() < 0.45, "variance {}", ens.moments.variance);

        let fit = ens.normal_fit.unwrap();
        assert!(fit.ks < 0.05, "ks {}", fit.ks);
        assert_eq!(fit.quality, FitQuality::Excellent);
        assert!((ens.prob_positive + ens.prob_negative - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wiener_shapes() {
        let mut rng = MonteCarloEngine::new(Some(8)).rng();
        let params = WienerParams { steps: 100, paths: 30, display_count: 5, ..WienerParams::default() };
        let ens = simulate_wiener(&params, &mut rng).unwrap();
        assert_eq!(ens.trajectories.len(), 5);
        assert!(ens.trajectories.iter().all(|t| t.len() == 101 && t[0] == 0.0));
        assert_eq!(ens.time_grid.first(), Some(&0.0));
        assert_eq!(ens.time_grid.last(), Some(&1.0));
        assert_eq!(ens.final_values.len(), 30);
        assert_eq!(ens.trajectories[0].last(), ens.final_values.first());
    }

    #[test]
    fn test_zero_noise_is_deterministic_drift() {
        // z = 0 whenever u2 = 0.25: cos(π/2) ≈ 6e-17
        let mut draws = [0.5, 0.25].into_iter().cycle();
        let mut source = FnSource(move || draws.next().unwrap_or(0.5));
        let params = SdeParams { horizon: 1.0, steps: 10, paths: 3, x0: 2.0, display_count: 0 };
        let sde = CoefficientSde::wiener(3.0, 1.0);
        let ens = simulate_sde(&params, &sde, &mut source).unwrap();
        for x in &ens.final_values {
            assert!((x - 5.0).abs() < 1e-9, "x = {}", x);
        }
    }

    #[test]
    fn test_exact_moment_table() {
        let ou = CoefficientSde {
            drift: Coefficient::Linear(-1.0),
            diffusion: Coefficient::Constant(1.0),
        };
        let m = ou.exact_moments(2.0, 1.0).unwrap();
        assert!((m.mean - 2.0 * (-1.0f64).exp()).abs() < 1e-12);
        assert!((m.variance - (1.0 - (-2.0f64).exp()) / 2.0).abs() < 1e-12);
        assert!(m.gaussian);

        let gbm = CoefficientSde::geometric(0.0, 0.0).exact_moments(3.0, 1.0).unwrap();
        assert_eq!(gbm.mean, 3.0);
        assert_eq!(gbm.variance, 0.0);

        let mixed = CoefficientSde {
            drift: Coefficient::Constant(1.0),
            diffusion: Coefficient::Linear(1.0),
        };
        assert!(mixed.exact_moments(1.0, 1.0).is_none());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let mut rng = MonteCarloEngine::new(Some(1)).rng();
        let bad = WienerParams { volatility: 0.0, ..WienerParams::default() };
        assert!(simulate_wiener(&bad, &mut rng).is_err());
        let bad = SdeParams { x0: f64::NAN, ..SdeParams::default() };
        assert!(simulate_sde(&bad, &CoefficientSde::wiener(0.0, 1.0), &mut rng).is_err());
        assert!(Coefficient::Linear(f64::INFINITY).validate("drift").is_err());
    }

    #[test]
    fn test_non_finite_coefficients_fail_before_stepping() {
        let mut rng = MonteCarloEngine::new(Some(1)).rng();
        let params = SdeParams { steps: 10, paths: 5, ..SdeParams::default() };
        let nan_drift = CoefficientSde {
            drift: Coefficient::Constant(f64::NAN),
            diffusion: Coefficient::Constant(1.0),
        };
        let err = simulate_sde(&params, &nan_drift, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "drift", .. }), "{:?}", err);

        let inf_diffusion = CoefficientSde::geometric(0.1, f64::INFINITY);
        assert!(simulate_sde(&params, &inf_diffusion, &mut rng).is_err());
        assert!(simulate_wiener(&WienerParams { drift: f64::NAN, ..WienerParams::default() }, &mut rng).is_err());
    }
}
