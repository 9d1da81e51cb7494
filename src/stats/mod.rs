//! Moment estimation and descriptive statistics
//!
//! Three calculators produce the same [`MomentSummary`]:
//!
//! - [`MomentAccumulator`] / [`online_moments`]: streaming Welford updates,
//!   numerically stable at any magnitude
//! - [`batch_moments`]: two passes, deviations from the mean
//! - [`power_sum_moments`]: two passes, raw power sums expanded about the
//!   mean (the calculator formula, prone to cancellation)
//!
//! [`stability`] runs them against a dataset with a known variance.
//!
//! # Examples
//!
//! ```
//! use stochlab::stats::{batch_moments, online_moments};
//!
//! let data = [10.0, 12.0, 23.0, 23.0, 16.0, 23.0, 21.0, 16.0];
//! let online = online_moments(&data).unwrap();
//! let batch = batch_moments(&data).unwrap();
//! assert!((online.variance - batch.variance).abs() < 1e-9);
//! ```

pub mod batch;
pub mod core;
pub mod online;
pub mod stability;

use serde::{Deserialize, Serialize};

pub use self::batch::{batch_moments, power_sum_moments};
pub use self::core::{median_sorted, quantile_floor_sorted, Descriptive};
pub use self::online::{online_moments, MomentAccumulator};
pub use self::stability::{compare_stability, StabilityReport, Transform};

/// Which calculator produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentMethod {
    Online,
    Batch,
    PowerSum,
}

/// Moments of a sample.
///
/// `m2..m4` are sums of central powers (not divided by `n`). `variance` is
/// the sample variance. The skewness and kurtosis conventions differ by
/// method and are documented on each calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentSummary {
    pub method: MomentMethod,
    pub n: u64,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub m2: f64,
    pub m3: f64,
    pub m4: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
}

impl MomentSummary {
    #[inline]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}
