//! # stochlab
//!
//! Monte Carlo path simulation with closed-form validation, streaming and
//! batch moments, goodness-of-fit, and frequency cryptanalysis of toy
//! ciphers.
//!
//! ## Modules
//!
//! - `probability`: injectable uniform sources, Box–Muller, reference distributions
//! - `stats`: online (Welford) and two-pass moments, order statistics, stability comparison
//! - `fit`: frequency tables, Kolmogorov–Smirnov and chi-squared statistics
//! - `simulation`: counting process, Wiener/SDE, random walk, relative frequency, sweeps
//! - `crypto`: Caesar and letter-wise RSA with chi-squared key search
//! - `config`, `report`, `cli`: scenario files, results, and the command line
//!
//! ## Determinism
//!
//! Every simulator takes its randomness as a parameter. The same seed and
//! parameters reproduce the same ensemble bit for bit.
//!
//! ## Example
//!
//! ```rust
//! use stochlab::prelude::*;
//!
//! let mut rng = MonteCarloEngine::new(Some(42)).rng();
//! let params = CountingParams { paths: 2000, ..CountingParams::default() };
//! let ensemble = simulate_counting_process(&params, &mut rng).unwrap();
//!
//! // N(1) ~ Poisson(5)
//! assert!((ensemble.summary.moments.mean - 5.0).abs() < 0.3);
//! assert!(ensemble.fit.ks < 0.1);
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod fit;
pub mod probability;
pub mod report;
pub mod simulation;
pub mod stats;

/// Common imports
pub mod prelude {
    pub use crate::error::{Result, SimError};

    // Randomness and reference laws
    pub use crate::probability::{
        Binomial, DiscreteDistribution, Distribution, Exponential, MonteCarloEngine, Normal,
        Poisson, UniformSource, WalkEndpoint,
    };

    // Moments
    pub use crate::stats::{
        batch_moments, compare_stability, online_moments, power_sum_moments, MomentAccumulator,
        MomentSummary, Transform,
    };

    // Fit
    pub use crate::fit::{DiscreteFit, FitQuality, FrequencyTable};

    // Simulators
    pub use crate::simulation::{
        simulate_counting_process, simulate_random_walk, simulate_relative_frequency,
        simulate_sde, simulate_wiener, CoefficientSde, CountingParams, FrequencyParams,
        ProgressHook, Sde, SdeParams, WalkParams, WienerParams,
    };

    // Cryptanalysis
    pub use crate::crypto::{
        best_caesar_shift, best_rsa_key, Language, ReferenceDistribution, RsaKeys,
    };

    pub use crate::config::{Scenario, ScenarioConfig};
    pub use crate::report::Report;
}
