//! Randomness and closed-form reference distributions
//!
//! - [`montecarlo`]: injectable uniform sources and the seeded engine
//! - [`variates`]: Box–Muller normals and Bernoulli trials
//! - [`distributions`]: Normal, Exponential, Poisson, Binomial, random-walk endpoint

pub mod distributions;
pub mod montecarlo;
pub mod variates;

pub use distributions::{
    erf, standard_normal_cdf, Binomial, DiscreteDistribution, Distribution, Exponential, Normal,
    Poisson, WalkEndpoint,
};
pub use montecarlo::{FnSource, MonteCarloEngine, UniformSource};
pub use variates::{uniform_to_normal, Bernoulli};
