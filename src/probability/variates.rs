//! Random variate generators
//!
//! Two primitives sit under every path simulator:
//!
//! - [`uniform_to_normal`]: Box–Muller transform, one standard normal per call
//! - [`Bernoulli`]: a validated success probability and its trial
//!
//! # Box–Muller
//!
//! ```text
//! Z = √(-2 ln U₁) · cos(2π U₂)
//! ```
//!
//! Only the cosine branch is used. The paired sine variate is discarded, which
//! costs one extra uniform per normal draw.

use std::f64::consts::TAU;

use crate::error::{ensure_probability, Result};
use crate::probability::montecarlo::UniformSource;

/// Attempts at drawing a strictly positive `U₁` before clamping.
const MAX_ZERO_RESAMPLES: usize = 64;

/// One standard normal variate from two uniform draws.
///
/// `U₁ = 0` would make `ln U₁` infinite, so zero draws are resampled. A
/// source that keeps returning zero is clamped to the smallest positive
/// double instead of looping forever.
///
/// # Examples
///
/// ```
/// use stochlab::probability::montecarlo::MonteCarloEngine;
/// use stochlab::probability::variates::uniform_to_normal;
///
/// let mut rng = MonteCarloEngine::new(Some(1)).rng();
/// let z = uniform_to_normal(&mut rng);
/// assert!(z.is_finite());
/// ```
#[inline]
pub fn uniform_to_normal<R: UniformSource + ?Sized>(rng: &mut R) -> f64 {
    let mut u1 = rng.next_uniform();
    let mut attempts = 0;
    while u1 <= 0.0 {
        attempts += 1;
        if attempts >= MAX_ZERO_RESAMPLES {
            u1 = f64::MIN_POSITIVE;
            break;
        }
        u1 = rng.next_uniform();
    }
    let u2 = rng.next_uniform();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Bernoulli trial with a validated success probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    /// Requires `0 <= p <= 1`; `name` identifies the parameter in errors.
    pub fn new(name: &'static str, p: f64) -> Result<Self> {
        Ok(Self { p: ensure_probability(name, p)? })
    }

    #[inline]
    pub fn p(&self) -> f64 {
        self.p
    }

    /// `true` with probability `p`.
    #[inline]
    pub fn trial<R: UniformSource + ?Sized>(&self, rng: &mut R) -> bool {
        rng.next_uniform() < self.p
    }
}
