//! Scenario files
//!
//! A scenario file describes one run: an optional seed and a `[scenario]`
//! table whose `kind` selects the simulator or analysis. Omitted parameters
//! take their defaults.
//!
//! # Example
//!
//! ```toml
//! seed = 42
//!
//! [scenario]
//! kind = "counting"
//! rate = 5.0
//! steps = 5000
//! paths = 5000
//! ```
//!
//! ```toml
//! [scenario]
//! kind = "sde"
//! params = { x0 = 1.0, horizon = 1.0 }
//! sde = { drift = { form = "linear", c = 0.05 }, diffusion = { form = "linear", c = 0.2 } }
//! ```

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::crypto::{self, Language, ReferenceDistribution, RsaKeys};
use crate::error::{Result, SimError};
use crate::probability::MonteCarloEngine;
use crate::report::Report;
use crate::simulation::convergence::{
    COUNTING_STEP_COUNTS, COUNTING_SWEEP_PATHS, WALK_STEP_COUNTS, WALK_SWEEP_PATHS,
};
use crate::simulation::{
    counting_convergence, simulate_counting_process, simulate_random_walk,
    simulate_relative_frequency, simulate_sde, simulate_wiener, walk_convergence, CoefficientSde,
    CountingParams, FrequencyParams, SdeParams, WalkParams, WienerParams,
};
use crate::stats::stability::{compare_stability, Transform, DEFAULT_BASE};
use crate::stats::{batch_moments, online_moments};

/// Root of a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Fixed seed; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    pub scenario: Scenario,
}

impl ScenarioConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SimError::Config(e.to_string()))
    }

    pub fn run(&self) -> Result<Report> {
        self.scenario.run(&mut MonteCarloEngine::new(self.seed).rng())
    }
}

/// One simulation or analysis with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scenario {
    Counting(CountingParams),
    Wiener(WienerParams),
    Sde {
        #[serde(default)]
        params: SdeParams,
        sde: CoefficientSde,
    },
    Walk(WalkParams),
    Frequency(FrequencyParams),
    CountingConvergence {
        #[serde(default = "default_counting_sweep_base")]
        base: CountingParams,
        #[serde(default = "default_counting_steps")]
        steps: Vec<usize>,
    },
    WalkConvergence {
        #[serde(default = "default_walk_sweep_base")]
        base: WalkParams,
        #[serde(default = "default_walk_steps")]
        steps: Vec<usize>,
    },
    Moments {
        data: Vec<f64>,
    },
    Stability {
        #[serde(default = "default_stability_base")]
        base: Vec<f64>,
        #[serde(default)]
        transform: Transform,
    },
    /// Attack a Caesar ciphertext, first encrypting `text` by `shift`.
    Caesar {
        text: String,
        #[serde(default)]
        shift: u8,
        #[serde(default = "default_language")]
        language: Language,
        #[serde(default = "default_top_k")]
        top_k: usize,
    },
    /// Encrypt `plaintext` letter-wise and search for `d`.
    ///
    /// Without `language` the plaintext's own letter distribution is the
    /// reference.
    Rsa {
        p: u64,
        q: u64,
        #[serde(default)]
        e: Option<u64>,
        plaintext: String,
        #[serde(default)]
        language: Option<Language>,
        #[serde(default = "default_top_k")]
        top_k: usize,
    },
}

fn default_counting_sweep_base() -> CountingParams {
    CountingParams {
        paths: COUNTING_SWEEP_PATHS,
        ..CountingParams::default()
    }
}

fn default_counting_steps() -> Vec<usize> {
    COUNTING_STEP_COUNTS.to_vec()
}

fn default_walk_sweep_base() -> WalkParams {
    WalkParams {
        paths: WALK_SWEEP_PATHS,
        ..WalkParams::default()
    }
}

fn default_walk_steps() -> Vec<usize> {
    WALK_STEP_COUNTS.to_vec()
}

fn default_stability_base() -> Vec<f64> {
    DEFAULT_BASE.to_vec()
}

fn default_language() -> Language {
    Language::English
}

fn default_top_k() -> usize {
    3
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Counting(_) => "counting",
            Scenario::Wiener(_) => "wiener",
            Scenario::Sde { .. } => "sde",
            Scenario::Walk(_) => "walk",
            Scenario::Frequency(_) => "frequency",
            Scenario::CountingConvergence { .. } => "counting_convergence",
            Scenario::WalkConvergence { .. } => "walk_convergence",
            Scenario::Moments { .. } => "moments",
            Scenario::Stability { .. } => "stability",
            Scenario::Caesar { .. } => "caesar",
            Scenario::Rsa { .. } => "rsa",
        }
    }

    pub fn run(&self, rng: &mut StdRng) -> Result<Report> {
        tracing::debug!(scenario = self.name(), "running scenario");
        let report = match self {
            Scenario::Counting(params) => Report::Counting(simulate_counting_process(params, rng)?),
            Scenario::Wiener(params) => Report::Wiener(simulate_wiener(params, rng)?),
            Scenario::Sde { params, sde } => Report::Sde(simulate_sde(params, sde, rng)?),
            Scenario::Walk(params) => Report::Walk(simulate_random_walk(params, rng)?),
            Scenario::Frequency(params) => {
                Report::Frequency(simulate_relative_frequency(params, rng)?)
            }
            Scenario::CountingConvergence { base, steps } => Report::Convergence {
                process: "counting".into(),
                points: counting_convergence(base, steps, rng)?,
            },
            Scenario::WalkConvergence { base, steps } => Report::Convergence {
                process: "walk".into(),
                points: walk_convergence(base, steps, rng)?,
            },
            Scenario::Moments { data } => Report::Moments {
                online: online_moments(data)?,
                batch: batch_moments(data)?,
            },
            Scenario::Stability { base, transform } => {
                Report::Stability(compare_stability(base, *transform)?)
            }
            Scenario::Caesar {
                text,
                shift,
                language,
                top_k,
            } => {
                let ciphertext = crypto::caesar::encrypt(text, *shift);
                let reference = ReferenceDistribution::language(*language);
                let candidates = crypto::rank_caesar_shifts(&ciphertext, &reference, *top_k)?;
                Report::Caesar {
                    ciphertext,
                    candidates,
                }
            }
            Scenario::Rsa {
                p,
                q,
                e,
                plaintext,
                language,
                top_k,
            } => {
                let keys = RsaKeys::generate(*p, *q, *e)?;
                let ciphertext = crypto::rsa::encrypt(plaintext, keys.e, keys.n);
                let reference = match language {
                    Some(language) => ReferenceDistribution::language(*language),
                    None => ReferenceDistribution::from_text(plaintext)?,
                };
                let candidates = crypto::rank_rsa_keys(
                    &ciphertext,
                    keys.e,
                    keys.phi,
                    keys.n,
                    &reference,
                    *top_k,
                )?;
                Report::Rsa {
                    keys,
                    ciphertext,
                    candidates,
                }
            }
        };
        Ok(report)
    }
}
