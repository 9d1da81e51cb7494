//! Random sources for Monte Carlo simulation
//!
//! Every simulator in this crate draws its randomness through the
//! [`UniformSource`] trait instead of a global generator, so runs are
//! reproducible whenever the caller supplies a seeded source.
//!
//! # Sources
//!
//! - Any `rand` generator (`StdRng`, `ThreadRng`, ...) is a [`UniformSource`].
//! - [`FnSource`] wraps a plain closure returning uniform(0, 1) doubles.
//! - [`MonteCarloEngine`] hands out seeded or entropy-backed `StdRng`s.
//!
//! # Example
//!
//! ```
//! use stochlab::probability::montecarlo::{MonteCarloEngine, UniformSource};
//!
//! // Fixed seed for reproducible runs
//! let engine = MonteCarloEngine::new(Some(42));
//! let mut a = engine.rng();
//! let mut b = engine.rng();
//! assert_eq!(a.next_uniform(), b.next_uniform());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// A stream of uniform draws on `[0, 1)`.
pub trait UniformSource {
    /// Next uniform draw on `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

impl<R: RngCore> UniformSource for R {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Adapts a closure into a [`UniformSource`].
///
/// ```
/// use stochlab::probability::montecarlo::{FnSource, UniformSource};
///
/// let mut values = [0.25, 0.75].into_iter().cycle();
/// let mut source = FnSource(move || values.next().unwrap_or(0.5));
/// assert_eq!(source.next_uniform(), 0.25);
/// assert_eq!(source.next_uniform(), 0.75);
/// ```
pub struct FnSource<F>(pub F);

impl<F: FnMut() -> f64> UniformSource for FnSource<F> {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        (self.0)()
    }
}

/// Monte Carlo random source factory
///
/// # Fields
///
/// - `seed`: Optional seed for reproducible simulations (useful for testing)
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloEngine {
    pub seed: Option<u64>,
}

impl MonteCarloEngine {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Fresh generator: deterministic when seeded, entropy-backed otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        }
    }
}
