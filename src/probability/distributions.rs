//! Closed-form probability distributions
//!
//! These are the theoretical references that simulated ensembles are
//! compared against.
//!
//! # Distributions
//!
//! - **Normal**: final value of a Wiener process, `N(μT, σ²T)`
//! - **Exponential**: first-event time of a Poisson process
//! - **Poisson**: event count of a Poisson process over `[0, T]`
//! - **Binomial**: successes in `n` independent Bernoulli trials
//! - **WalkEndpoint**: final position of a ±1 random walk (an affine image of
//!   a Binomial)
//!
//! # Example
//!
//! ```
//! use stochlab::probability::{DiscreteDistribution, Poisson};
//!
//! // Counting process with λ = 5 over T = 1
//! let counts = Poisson::new(5.0).unwrap();
//! let p5 = counts.pmf(5);
//! assert!((p5 - 0.17546736976785).abs() < 1e-9);
//! assert_eq!(counts.mean(), 5.0);
//! ```
//!
//! # Distribution traits
//!
//! - [`Distribution`]: continuous, `pdf(x)` and `cdf(x)`
//! - [`DiscreteDistribution`]: integer support, `pmf(k)` plus moments

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_positive, ensure_probability, Result};

/// Continuous probability distribution
pub trait Distribution {
    /// Probability density at `x`.
    fn pdf(&self, x: f64) -> f64;

    /// P(X ≤ x).
    fn cdf(&self, x: f64) -> f64;
}

/// Probability distribution on the integers
pub trait DiscreteDistribution {
    /// P(X = k). Zero outside the support.
    fn pmf(&self, k: i64) -> f64;

    fn mean(&self) -> f64;

    fn variance(&self) -> f64;
}

// ===========================================================
// Normal Distribution
// ===========================================================

/// Normal (Gaussian) distribution
///
/// ```
/// use stochlab::probability::{Distribution, Normal};
///
/// let std_normal = Normal::new(0.0, 1.0).unwrap();
/// assert!((std_normal.cdf(0.0) - 0.5).abs() < 1e-7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normal {
    /// Mean (μ)
    pub mean: f64,
    /// Standard deviation (σ)
    pub std: f64,
}

impl Normal {
    pub fn new(mean: f64, std: f64) -> Result<Self> {
        Ok(Self {
            mean: ensure_finite("mean", mean)?,
            std: ensure_positive("std", std)?,
        })
    }

    /// Law of `X_T` for `dX = μ dt + σ dW`, `X_0 = 0`.
    pub fn wiener_endpoint(mu: f64, sigma: f64, horizon: f64) -> Result<Self> {
        let horizon = ensure_positive("horizon", horizon)?;
        Self::new(mu * horizon, sigma.abs() * horizon.sqrt())
    }

    #[inline]
    pub fn z(&self, x: f64) -> f64 {
        (x - self.mean) / self.std
    }
}

impl Distribution for Normal {
    fn pdf(&self, x: f64) -> f64 {
        let z = self.z(x);
        (1.0 / (self.std * (2.0 * PI).sqrt())) * (-0.5 * z.powi(2)).exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        0.5 * (1.0 + erf(self.z(x) / (2.0f64).sqrt()))
    }
}

// ===========================================================
// Exponential Distribution
// ===========================================================

/// Waiting time until the first event of a rate-λ Poisson process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exponential {
    pub rate: f64,
}

impl Exponential {
    pub fn new(rate: f64) -> Result<Self> {
        Ok(Self { rate: ensure_positive("rate", rate)? })
    }

    pub fn mean(&self) -> f64 {
        1.0 / self.rate
    }
}

impl Distribution for Exponential {
    fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.rate * (-self.rate * x).exp()
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            1.0 - (-self.rate * x).exp()
        }
    }
}

// ===========================================================
// Poisson Distribution
// ===========================================================

/// Poisson distribution: P(X = k) = λ^k e^{−λ} / k!
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Poisson {
    pub lambda: f64,
}

impl Poisson {
    pub fn new(lambda: f64) -> Result<Self> {
        Ok(Self { lambda: ensure_positive("lambda", lambda)? })
    }
}

impl DiscreteDistribution for Poisson {
    fn pmf(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        let kf = k as f64;
        (kf * self.lambda.ln() - self.lambda - ln_factorial(k as u64)).exp()
    }

    fn mean(&self) -> f64 {
        self.lambda
    }

    fn variance(&self) -> f64 {
        self.lambda
    }
}

// ===========================================================
// Binomial Distribution
// ===========================================================

/// Binomial distribution: successes in `n` trials with success probability `p`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binomial {
    pub n: u64,
    pub p: f64,
}

impl Binomial {
    pub fn new(n: u64, p: f64) -> Result<Self> {
        Ok(Self { n, p: ensure_probability("p", p)? })
    }
}

impl DiscreteDistribution for Binomial {
    fn pmf(&self, k: i64) -> f64 {
        if k < 0 || k as u64 > self.n {
            return 0.0;
        }
        let k = k as u64;
        // Degenerate endpoints: 0 * ln(0) would poison the log form
        if self.p == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if self.p == 1.0 {
            return if k == self.n { 1.0 } else { 0.0 };
        }
        let ln_pmf = ln_choose(self.n, k)
            + k as f64 * self.p.ln()
            + (self.n - k) as f64 * (1.0 - self.p).ln();
        ln_pmf.exp()
    }

    fn mean(&self) -> f64 {
        self.n as f64 * self.p
    }

    fn variance(&self) -> f64 {
        self.n as f64 * self.p * (1.0 - self.p)
    }
}

// ===========================================================
// Random Walk Endpoint
// ===========================================================

/// Final position of an `n`-step ±1 walk that steps down with probability `p`.
///
/// With `K` down-steps, `S = n − 2K` and `K ~ Binomial(n, p)`, so the law is
/// exact rather than a large-`n` approximation. Positions with the wrong
/// parity or beyond `±n` have probability zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkEndpoint {
    down_steps: Binomial,
}

impl WalkEndpoint {
    pub fn new(steps: u64, p_down: f64) -> Result<Self> {
        Ok(Self { down_steps: Binomial::new(steps, p_down)? })
    }

    pub fn steps(&self) -> u64 {
        self.down_steps.n
    }
}

impl DiscreteDistribution for WalkEndpoint {
    fn pmf(&self, s: i64) -> f64 {
        let n = self.down_steps.n as i64;
        if s.abs() > n || (n - s) % 2 != 0 {
            return 0.0;
        }
        self.down_steps.pmf((n - s) / 2)
    }

    fn mean(&self) -> f64 {
        let p = self.down_steps.p;
        self.down_steps.n as f64 * (1.0 - 2.0 * p)
    }

    fn variance(&self) -> f64 {
        4.0 * self.down_steps.variance()
    }
}

// ===========================================================
// Common Utilities
// ===========================================================

/// Error function (Abramowitz and Stegun 7.1.26), max error 1.5e-7.
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

/// Standard normal CDF.
#[inline]
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Log gamma function using Lanczos approximation
pub fn ln_gamma(x: f64) -> f64 {
    let coefficients = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.001208650973866179,
        -0.000005395239384953,
    ];

    let mut y = x;
    let mut tmp = x + 5.5;
    tmp -= (x + 0.5) * tmp.ln();
    let mut ser = 1.000000000190015;
    for &coef in coefficients.iter() {
        y += 1.0;
        ser += coef / y;
    }

    -tmp + (2.5066282746310005 * ser / x).ln()
}

/// ln(k!), summed exactly for small k.
pub fn ln_factorial(k: u64) -> f64 {
    if k < 32 {
        (2..=k).map(|i| (i as f64).ln()).sum()
    } else {
        ln_gamma(k as f64 + 1.0)
    }
}

/// ln C(n, k).
pub fn ln_choose(n: u64, k: u64) -> f64 {
    debug_assert!(k <= n);
    ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_cdf_and_pdf() {
        let n = Normal::new(0.0, 1.0).unwrap();
        assert_relative_eq!(n.pdf(0.0), 0.3989422804014327, epsilon = 1e-12);
        assert!((n.cdf(1.0) - 0.8413447460685429).abs() < 1e-6);
        assert!((n.cdf(-1.5) + n.cdf(1.5) - 1.0).abs() < 1e-7);
    }

    #[test]
    fn test_normal_rejects_bad_std() {
        assert!(Normal::new(0.0, 0.0).is_err());
        assert!(Normal::new(0.0, -1.0).is_err());
        assert!(Normal::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_wiener_endpoint() {
        let n = Normal::wiener_endpoint(0.5, 2.0, 4.0).unwrap();
        assert_relative_eq!(n.mean, 2.0);
        assert_relative_eq!(n.std, 4.0);
    }

    #[test]
    fn test_exponential() {
        let e = Exponential::new(5.0).unwrap();
        assert_relative_eq!(e.mean(), 0.2);
        assert_relative_eq!(e.cdf(0.2), 1.0 - (-1.0f64).exp(), epsilon = 1e-12);
        assert_eq!(e.cdf(-1.0), 0.0);
    }

    #[test]
    fn test_poisson_pmf_sums_to_one() {
        let p = Poisson::new(5.0).unwrap();
        let total: f64 = (0..60).map(|k| p.pmf(k)).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
        assert_relative_eq!(p.pmf(0), (-5.0f64).exp(), epsilon = 1e-14);
        assert_eq!(p.pmf(-1), 0.0);
    }

    #[test]
    fn test_binomial_pmf() {
        let b = Binomial::new(10, 0.3).unwrap();
        let total: f64 = (0..=10).map(|k| b.pmf(k)).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
        // C(10,3) 0.3^3 0.7^7
        assert_relative_eq!(b.pmf(3), 120.0 * 0.027 * 0.7f64.powi(7), epsilon = 1e-9);
        assert_eq!(b.pmf(11), 0.0);

        let sure = Binomial::new(4, 1.0).unwrap();
        assert_eq!(sure.pmf(4), 1.0);
        assert_eq!(sure.pmf(3), 0.0);
    }

    #[test]
    fn test_walk_endpoint_parity_and_moments() {
        let w = WalkEndpoint::new(10, 0.3).unwrap();
        assert_eq!(w.pmf(3), 0.0); // odd position after even steps
        assert_eq!(w.pmf(12), 0.0);
        let b = Binomial::new(10, 0.3).unwrap();
        assert_relative_eq!(w.pmf(4), b.pmf(3), epsilon = 1e-15);
        assert_relative_eq!(w.mean(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(w.variance(), 8.4, epsilon = 1e-12);
        let total: f64 = (-10..=10).map(|s| w.pmf(s)).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ln_factorial_matches_gamma() {
        assert_eq!(ln_factorial(0), 0.0);
        assert_relative_eq!(ln_factorial(5), 120f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(ln_factorial(40), ln_gamma(41.0), epsilon = 1e-8);
    }

    #[test]
    fn test_erf() {
        assert!(erf(0.0).abs() < 1e-7);
        assert!((erf(1.0) + erf(-1.0)).abs() < 1e-7);
        assert!((erf(5.0) - 1.0).abs() < 1e-6);
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-7);
    }
}
