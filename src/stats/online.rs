//! Single-pass (Welford) central moments
//!
//! The accumulator keeps `{ n, mean, M2, M3, M4 }` and folds in one
//! observation at a time, so an ensemble's final values never need to be
//! stored to get their moments.
//!
//! ```text
//! δ  = x − mean
//! mean' = mean + δ/n'
//! δ₂ = x − mean'
//! M4' = M4 + δ·δ₂³·(n'² − 3n' + 3) + 6·δ₂²·M2 − 4·δ₂·M3
//! M3' = M3 + δ·δ₂²·(n' − 2) − 3·δ₂·M2
//! M2' = M2 + δ·δ₂
//! ```
//!
//! M4 is updated before M3, and M3 before M2: each update reads the
//! previous values of the lower moments.
//!
//! # Example
//!
//! ```
//! use stochlab::stats::MomentAccumulator;
//!
//! let mut acc = MomentAccumulator::new();
//! for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
//!     acc.update(x);
//! }
//! assert!((acc.mean() - 5.0).abs() < 1e-12);
//! assert!((acc.variance() - 32.0 / 7.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::stats::{MomentMethod, MomentSummary};

/// Streaming moment state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentAccumulator {
    n: u64,
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
    min: f64,
    max: f64,
}

impl Default for MomentAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MomentAccumulator {
    pub const fn new() -> Self {
        Self {
            n: 0,
            mean: 0.0,
            m2: 0.0,
            m3: 0.0,
            m4: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Fold one observation into the running moments.
    #[inline]
    pub fn update(&mut self, x: f64) {
        self.n += 1;
        let n = self.n as f64;

        let delta = x - self.mean;
        self.mean += delta / n;
        let delta2 = x - self.mean;

        self.m4 += delta * delta2 * delta2 * delta2 * (n * n - 3.0 * n + 3.0)
            + 6.0 * delta2 * delta2 * self.m2
            - 4.0 * delta2 * self.m3;
        self.m3 += delta * delta2 * delta2 * (n - 2.0) - 3.0 * delta2 * self.m2;
        self.m2 += delta * delta2;

        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.n
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance `M2/(n−1)`; zero for fewer than two observations.
    #[inline]
    pub fn variance(&self) -> f64 {
        if self.n > 1 {
            self.m2 / (self.n - 1) as f64
        } else {
            0.0
        }
    }

    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// `M3 / M2^1.5`, zero when `M2 = 0`.
    pub fn skewness(&self) -> f64 {
        if self.m2 > 0.0 {
            self.m3 / self.m2.powf(1.5)
        } else {
            0.0
        }
    }

    /// Excess kurtosis `M4 / M2² − 3`, zero when `M2 = 0`.
    pub fn kurtosis(&self) -> f64 {
        if self.m2 > 0.0 {
            self.m4 / (self.m2 * self.m2) - 3.0
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MomentSummary {
        MomentSummary {
            method: MomentMethod::Online,
            n: self.n,
            mean: self.mean,
            variance: self.variance(),
            std_dev: self.std_dev(),
            m2: self.m2,
            m3: self.m3,
            m4: self.m4,
            skewness: self.skewness(),
            kurtosis: self.kurtosis(),
            min: self.min,
            max: self.max,
        }
    }
}

impl Extend<f64> for MomentAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.update(x);
        }
    }
}

impl FromIterator<f64> for MomentAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

/// Moments of `values` in one streaming pass.
pub fn online_moments(values: &[f64]) -> Result<MomentSummary> {
    if values.is_empty() {
        return Err(SimError::EmptyData);
    }
    let acc: MomentAccumulator = values.iter().copied().collect();
    Ok(acc.summary())
}
