//! Numerical-stability comparison of the moment calculators
//!
//! A small base dataset with an exactly known variance is moved to an
//! extreme magnitude. The online, batch and power-sum calculators run on the
//! moved data and each is scored by its relative error against the
//! analytically moved variance.
//!
//! - [`Transform::Scale`]: `x ↦ k·x`, true variance `k²·var(base)`
//! - [`Transform::Shift`]: `x ↦ x + c`, true variance `var(base)`
//!
//! Scaling keeps the ratio of spread to magnitude fixed: for
//! [`DEFAULT_BASE`] × 1e10 all three calculators land within a few ulps.
//! A large shift is what cancels the raw power sums; the deviation-based
//! batch and the online update both keep about eight digits at `+1e8`.
//!
//! ```
//! use stochlab::stats::stability::{compare_stability, Transform, DEFAULT_BASE};
//!
//! let scaled = compare_stability(&DEFAULT_BASE, Transform::Scale(1e10)).unwrap();
//! assert!(scaled.batch_relative_error < 1e-15);
//!
//! let shifted = compare_stability(&DEFAULT_BASE, Transform::Shift(1e8)).unwrap();
//! assert!(shifted.power_sum_relative_error > 10.0 * shifted.online_relative_error);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, Result, SimError};
use crate::stats::{batch_moments, online_moments, power_sum_moments, MomentMethod, MomentSummary};

/// Base dataset used by the reference stability test.
pub const DEFAULT_BASE: [f64; 5] = [1.0, 1.1, 1.2, 1.3, 1.4];

/// How the base dataset is moved to an extreme magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "by", rename_all = "snake_case")]
pub enum Transform {
    Scale(f64),
    Shift(f64),
}

impl Default for Transform {
    fn default() -> Self {
        Transform::Scale(1e10)
    }
}

impl Transform {
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Transform::Scale(k) => x * k,
            Transform::Shift(c) => x + c,
        }
    }

    /// Variance of the transformed data given the base variance.
    #[inline]
    pub fn variance(&self, base_variance: f64) -> f64 {
        match *self {
            Transform::Scale(k) => base_variance * k * k,
            Transform::Shift(_) => base_variance,
        }
    }

    fn amount(&self) -> f64 {
        match *self {
            Transform::Scale(k) | Transform::Shift(k) => k,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    pub transform: Transform,
    pub data: Vec<f64>,
    pub true_variance: f64,
    pub online: MomentSummary,
    pub batch: MomentSummary,
    pub power_sum: MomentSummary,
    pub online_relative_error: f64,
    pub batch_relative_error: f64,
    pub power_sum_relative_error: f64,
}

impl StabilityReport {
    pub fn relative_errors(&self) -> [(MomentMethod, f64); 3] {
        [
            (MomentMethod::Online, self.online_relative_error),
            (MomentMethod::Batch, self.batch_relative_error),
            (MomentMethod::PowerSum, self.power_sum_relative_error),
        ]
    }

    /// The method with the strictly smallest relative error; `None` on a tie.
    pub fn more_accurate(&self) -> Option<MomentMethod> {
        let errors = self.relative_errors();
        let (best, best_error) = errors
            .iter()
            .copied()
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        let tied = errors.iter().filter(|(_, e)| *e == best_error).count();
        (tied == 1).then_some(best)
    }
}

/// Run the three calculators on `base` moved by `transform`.
///
/// The base variance is computed with deviations about the mean, so it is
/// exact to rounding for small well-conditioned inputs.
pub fn compare_stability(base: &[f64], transform: Transform) -> Result<StabilityReport> {
    if base.len() < 2 {
        return Err(SimError::invalid(
            "base",
            base.len() as f64,
            "needs at least two values",
        ));
    }
    ensure_finite("transform", transform.amount())?;
    if matches!(transform, Transform::Scale(k) if k == 0.0) {
        return Err(SimError::invalid("transform", 0.0, "scale factor must be non-zero"));
    }

    let n = base.len() as f64;
    let base_mean = base.iter().sum::<f64>() / n;
    let base_variance = base.iter().map(|x| (x - base_mean).powi(2)).sum::<f64>() / (n - 1.0);
    let true_variance = transform.variance(base_variance);
    if true_variance <= 0.0 {
        return Err(SimError::invalid("base", base_variance, "has zero variance"));
    }

    let data: Vec<f64> = base.iter().map(|&x| transform.apply(x)).collect();
    let online = online_moments(&data)?;
    let batch = batch_moments(&data)?;
    let power_sum = power_sum_moments(&data)?;

    let relative_error = |s: &MomentSummary| (s.variance - true_variance).abs() / true_variance;
    let online_relative_error = relative_error(&online);
    let batch_relative_error = relative_error(&batch);
    let power_sum_relative_error = relative_error(&power_sum);

    tracing::debug!(
        ?transform,
        true_variance,
        online_relative_error,
        batch_relative_error,
        power_sum_relative_error,
        "stability comparison"
    );

    Ok(StabilityReport {
        transform,
        data,
        true_variance,
        online,
        batch,
        power_sum,
        online_relative_error,
        batch_relative_error,
        power_sum_relative_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_base_keeps_every_method_exact() {
        let report = compare_stability(&DEFAULT_BASE, Transform::Scale(1e10)).unwrap();
        for (method, error) in report.relative_errors() {
            assert!(error < 1e-15, "{:?}: {}", method, error);
        }
        // every method rounds to the same variance, hence the tie
        assert_eq!(report.online.variance, report.batch.variance);
        assert_eq!(report.batch.variance, report.power_sum.variance);
        assert_eq!(report.more_accurate(), None);
    }

    #[test]
    fn test_scaling_keeps_all_accurate() {
        for k in [1e-10, 1.0, 1e6, 1e10] {
            let report = compare_stability(&DEFAULT_BASE, Transform::Scale(k)).unwrap();
            for (method, error) in report.relative_errors() {
                assert!(error < 1e-13, "scale {} {:?}: {}", k, method, error);
            }
        }
    }

    #[test]
    fn test_shift_cancels_power_sums() {
        for offset in [1e6, 1e8, 1e10] {
            let report = compare_stability(&DEFAULT_BASE, Transform::Shift(offset)).unwrap();
            assert!(
                report.power_sum_relative_error > 10.0 * report.online_relative_error,
                "offset {}: power sums {} vs online {}",
                offset,
                report.power_sum_relative_error,
                report.online_relative_error
            );
            assert!(report.batch_relative_error < 1e-5, "offset {}", offset);
            assert!(report.online_relative_error < 1e-5, "offset {}", offset);
            assert!(report.batch.variance > 0.0);
        }
    }

    #[test]
    fn test_deviation_batch_wins_at_moderate_shift() {
        let report = compare_stability(&DEFAULT_BASE, Transform::Shift(1e8)).unwrap();
        assert!(report.batch_relative_error < 1e-7);
        assert!(report.power_sum_relative_error > 1.0);
        assert_eq!(report.more_accurate(), Some(MomentMethod::Batch));
    }

    #[test]
    fn test_default_transform_is_scale() {
        assert_eq!(Transform::default(), Transform::Scale(1e10));
    }

    #[test]
    fn test_is_deterministic() {
        let a = compare_stability(&DEFAULT_BASE, Transform::Shift(1e9)).unwrap();
        let b = compare_stability(&DEFAULT_BASE, Transform::Shift(1e9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        assert!(compare_stability(&[1.0], Transform::Scale(2.0)).is_err());
        assert!(compare_stability(&[1.0, 1.0], Transform::Scale(2.0)).is_err());
        assert!(compare_stability(&DEFAULT_BASE, Transform::Scale(0.0)).is_err());
        assert!(compare_stability(&DEFAULT_BASE, Transform::Shift(f64::NAN)).is_err());
    }
}
