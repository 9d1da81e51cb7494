//! Batch moments over a stored array
//!
//! Both calculators here make two passes: `mean = Σx / n` first, then the
//! central sums `M2..M4`. They differ in how pass two forms those sums.
//!
//! [`batch_moments`] sums powers of deviations from the mean:
//!
//! ```text
//! M2 = Σ(x − mean)²    M3 = Σ(x − mean)³    M4 = Σ(x − mean)⁴
//! ```
//!
//! [`power_sum_moments`] is the calculator-style variant. It accumulates raw
//! power sums `Σx², Σx³, Σx⁴` and expands them about the mean:
//!
//! ```text
//! M2 = Σx² − n·mean²
//! M3 = Σx³ − 3·mean·Σx² + 2n·mean³
//! M4 = Σx⁴ − 4·mean·Σx³ + 6·mean²·Σx² − 3n·mean⁴
//! ```
//!
//! When the data sit far from zero relative to their spread those
//! subtractions cancel catastrophically and the variance can come out
//! negative; [`super::stability`] measures that against the other two.

use crate::error::{Result, SimError};
use crate::stats::{MomentMethod, MomentSummary};

/// Moments of `values` via deviations from the two-pass mean.
pub fn batch_moments(values: &[f64]) -> Result<MomentSummary> {
    let (n, mean) = first_pass(values)?;

    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &x in values {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
        min = min.min(x);
        max = max.max(x);
    }

    Ok(finish(MomentMethod::Batch, n, mean, [m2, m3, m4], min, max))
}

/// Moments of `values` via raw power sums expanded about the mean.
pub fn power_sum_moments(values: &[f64]) -> Result<MomentSummary> {
    let (n, mean) = first_pass(values)?;

    let (mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &x in values {
        let x2 = x * x;
        s2 += x2;
        s3 += x2 * x;
        s4 += x2 * x2;
        min = min.min(x);
        max = max.max(x);
    }

    let nf = n as f64;
    let mean2 = mean * mean;
    let m2 = s2 - nf * mean2;
    let m3 = s3 - 3.0 * mean * s2 + 2.0 * nf * mean2 * mean;
    let m4 = s4 - 4.0 * mean * s3 + 6.0 * mean2 * s2 - 3.0 * nf * mean2 * mean2;

    Ok(finish(MomentMethod::PowerSum, n, mean, [m2, m3, m4], min, max))
}

fn first_pass(values: &[f64]) -> Result<(u64, f64)> {
    if values.is_empty() {
        return Err(SimError::EmptyData);
    }
    let mut sum = 0.0;
    for &x in values {
        sum += x;
    }
    Ok((values.len() as u64, sum / values.len() as f64))
}

/// Sample variance, `skew = M3 / (n·s³)`, excess `kurt = M4 / (n·s⁴) − 3`.
fn finish(
    method: MomentMethod,
    n: u64,
    mean: f64,
    [m2, m3, m4]: [f64; 3],
    min: f64,
    max: f64,
) -> MomentSummary {
    let nf = n as f64;
    let variance = if n > 1 { m2 / (nf - 1.0) } else { 0.0 };
    // Power sums can cancel below zero
    let std_dev = variance.max(0.0).sqrt();
    let (skewness, kurtosis) = if std_dev > 0.0 {
        (m3 / (nf * std_dev.powi(3)), m4 / (nf * variance * variance) - 3.0)
    } else {
        (0.0, 0.0)
    };

    MomentSummary {
        method,
        n,
        mean,
        variance,
        std_dev,
        m2,
        m3,
        m4,
        skewness,
        kurtosis,
        min,
        max,
    }
}
