//! CLI argument parsing for stochlab

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{Scenario, ScenarioConfig};
use crate::crypto::Language;
use crate::error::{Result, SimError};
use crate::simulation::convergence::{
    COUNTING_STEP_COUNTS, COUNTING_SWEEP_PATHS, WALK_STEP_COUNTS, WALK_SWEEP_PATHS,
};
use crate::simulation::{
    Coefficient, CoefficientSde, CountingParams, FrequencyParams, SdeParams, WalkParams,
    WienerParams,
};
use crate::stats::Transform;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary (default)
    Text,
    /// Full report as JSON, trajectories included
    Json,
}

/// Shape of an SDE coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Form {
    /// `c`
    Constant,
    /// `c·x`
    Linear,
}

impl Form {
    fn with(self, c: f64) -> Coefficient {
        match self {
            Form::Constant => Coefficient::Constant(c),
            Form::Linear => Coefficient::Linear(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransformKind {
    /// x ↦ x · by
    Scale,
    /// x ↦ x + by
    Shift,
}

#[derive(Parser, Debug)]
#[command(name = "stochlab")]
#[command(version)]
#[command(
    about = "Monte Carlo path simulation, streaming moments and frequency cryptanalysis",
    long_about = None
)]
pub struct Cli {
    /// Seed for reproducible runs (overrides a scenario file's seed)
    #[arg(long, global = true, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Print trace-level diagnostics to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bernoulli-substep approximation of a Poisson process
    Counting {
        #[arg(long, default_value = "5.0")]
        rate: f64,
        #[arg(long, default_value = "1.0")]
        horizon: f64,
        #[arg(long, default_value = "1000")]
        steps: usize,
        /// Trajectories (default 1000, or 300 per point with --sweep)
        #[arg(long)]
        paths: Option<usize>,
        #[arg(long = "display", default_value = "50")]
        display_count: usize,
        /// Sweep the step count instead of a single run
        #[arg(long)]
        sweep: bool,
    },

    /// Wiener process with drift
    Wiener {
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        drift: f64,
        #[arg(long, default_value = "1.0")]
        volatility: f64,
        #[arg(long, default_value = "1.0")]
        horizon: f64,
        #[arg(long, default_value = "1000")]
        steps: usize,
        #[arg(long, default_value = "500")]
        paths: usize,
        #[arg(long = "display", default_value = "50")]
        display_count: usize,
    },

    /// Euler–Maruyama integration of dX = a(X) dt + b(X) dW
    Sde {
        #[arg(long, default_value = "0.05", allow_hyphen_values = true)]
        drift: f64,
        #[arg(long, value_enum, default_value = "linear")]
        drift_form: Form,
        #[arg(long, default_value = "0.2", allow_hyphen_values = true)]
        diffusion: f64,
        #[arg(long, value_enum, default_value = "linear")]
        diffusion_form: Form,
        #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
        x0: f64,
        #[arg(long, default_value = "1.0")]
        horizon: f64,
        #[arg(long, default_value = "1000")]
        steps: usize,
        #[arg(long, default_value = "500")]
        paths: usize,
        #[arg(long = "display", default_value = "50")]
        display_count: usize,
    },

    /// ±1 random walk
    Walk {
        #[arg(long, default_value = "100")]
        steps: usize,
        /// Trajectories (default 1000, or 500 per point with --sweep)
        #[arg(long)]
        paths: Option<usize>,
        /// Probability of a −1 step
        #[arg(long, default_value = "0.3")]
        p_down: f64,
        #[arg(long = "display", default_value = "20")]
        display_count: usize,
        /// Sweep the step count instead of a single run
        #[arg(long)]
        sweep: bool,
    },

    /// Running relative frequency of a Bernoulli event
    Lln {
        #[arg(long, default_value = "0.5")]
        p: f64,
        #[arg(long, default_value = "1000")]
        trials: usize,
        #[arg(long, default_value = "20")]
        paths: usize,
        #[arg(long = "display", default_value = "20")]
        display_count: usize,
    },

    /// Online and batch moments of the given values
    Moments {
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<f64>,
    },

    /// Compare online, batch and power-sum variance on data moved to an extreme magnitude
    Stability {
        #[arg(long, value_enum, default_value = "scale")]
        transform: TransformKind,
        #[arg(long, default_value = "1e10", allow_hyphen_values = true)]
        by: f64,
        /// Base dataset (default 1.0 1.1 1.2 1.3 1.4)
        #[arg(allow_hyphen_values = true)]
        base: Vec<f64>,
    },

    /// Encrypt with a Caesar shift and recover it by frequency analysis
    Caesar {
        text: String,
        #[arg(long, default_value = "0")]
        shift: u8,
        #[arg(long, default_value = "english")]
        language: Language,
        #[arg(long, default_value = "3")]
        top_k: usize,
    },

    /// Letter-wise RSA encryption and private-exponent search
    Rsa {
        plaintext: String,
        #[arg(long, default_value = "61")]
        p: u64,
        #[arg(long, default_value = "53")]
        q: u64,
        /// Public exponent (first coprime candidate when omitted)
        #[arg(long)]
        e: Option<u64>,
        /// Reference language (the plaintext's own letters when omitted)
        #[arg(long)]
        language: Option<Language>,
        #[arg(long, default_value = "3")]
        top_k: usize,
    },

    /// Run a TOML scenario file
    Run {
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },
}

impl Cli {
    /// Scenario and seed described by the command line.
    pub fn scenario_config(&self) -> Result<ScenarioConfig> {
        if let Command::Run { config } = &self.command {
            let mut loaded = ScenarioConfig::from_file(config)?;
            if self.seed.is_some() {
                loaded.seed = self.seed;
            }
            return Ok(loaded);
        }
        let scenario = self
            .command
            .scenario()
            .ok_or_else(|| SimError::Config("no scenario given".into()))?;
        Ok(ScenarioConfig {
            seed: self.seed,
            scenario,
        })
    }
}

impl Command {
    /// `None` for `run`, whose scenario lives in a file.
    fn scenario(&self) -> Option<Scenario> {
        let scenario = match *self {
            Command::Counting {
                rate,
                horizon,
                steps,
                paths,
                display_count,
                sweep,
            } => {
                let base = CountingParams {
                    horizon,
                    rate,
                    steps,
                    paths: paths.unwrap_or(if sweep {
                        COUNTING_SWEEP_PATHS
                    } else {
                        CountingParams::default().paths
                    }),
                    display_count,
                };
                if sweep {
                    Scenario::CountingConvergence {
                        base,
                        steps: COUNTING_STEP_COUNTS.to_vec(),
                    }
                } else {
                    Scenario::Counting(base)
                }
            }
            Command::Wiener {
                drift,
                volatility,
                horizon,
                steps,
                paths,
                display_count,
            } => Scenario::Wiener(WienerParams {
                horizon,
                steps,
                paths,
                drift,
                volatility,
                display_count,
            }),
            Command::Sde {
                drift,
                drift_form,
                diffusion,
                diffusion_form,
                x0,
                horizon,
                steps,
                paths,
                display_count,
            } => Scenario::Sde {
                params: SdeParams {
                    horizon,
                    steps,
                    paths,
                    x0,
                    display_count,
                },
                sde: CoefficientSde {
                    drift: drift_form.with(drift),
                    diffusion: diffusion_form.with(diffusion),
                },
            },
            Command::Walk {
                steps,
                paths,
                p_down,
                display_count,
                sweep,
            } => {
                let base = WalkParams {
                    steps,
                    paths: paths.unwrap_or(if sweep {
                        WALK_SWEEP_PATHS
                    } else {
                        WalkParams::default().paths
                    }),
                    p_down,
                    display_count,
                };
                if sweep {
                    Scenario::WalkConvergence {
                        base,
                        steps: WALK_STEP_COUNTS.to_vec(),
                    }
                } else {
                    Scenario::Walk(base)
                }
            }
            Command::Lln {
                p,
                trials,
                paths,
                display_count,
            } => Scenario::Frequency(FrequencyParams {
                trials,
                paths,
                p,
                display_count,
            }),
            Command::Moments { ref values } => Scenario::Moments {
                data: values.clone(),
            },
            Command::Stability {
                transform,
                by,
                ref base,
            } => Scenario::Stability {
                base: if base.is_empty() {
                    crate::stats::stability::DEFAULT_BASE.to_vec()
                } else {
                    base.clone()
                },
                transform: match transform {
                    TransformKind::Shift => Transform::Shift(by),
                    TransformKind::Scale => Transform::Scale(by),
                },
            },
            Command::Caesar {
                ref text,
                shift,
                language,
                top_k,
            } => Scenario::Caesar {
                text: text.clone(),
                shift,
                language,
                top_k,
            },
            Command::Rsa {
                ref plaintext,
                p,
                q,
                e,
                language,
                top_k,
            } => Scenario::Rsa {
                p,
                q,
                e,
                plaintext: plaintext.clone(),
                language,
                top_k,
            },
            Command::Run { .. } => return None,
        };
        Some(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(args: &[&str]) -> ScenarioConfig {
        Cli::parse_from(args.iter().copied()).scenario_config().unwrap()
    }

    #[test]
    fn test_cli_counting_defaults() {
        let config = scenario(&["stochlab", "counting"]);
        assert_eq!(config.seed, None);
        assert_eq!(config.scenario, Scenario::Counting(CountingParams::default()));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["stochlab", "walk", "--seed", "9", "--format", "json", "-d"]);
        assert_eq!(cli.seed, Some(9));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_sweep_uses_sweep_paths() {
        match scenario(&["stochlab", "counting", "--sweep"]).scenario {
            Scenario::CountingConvergence { base, steps } => {
                assert_eq!(base.paths, COUNTING_SWEEP_PATHS);
                assert_eq!(steps, COUNTING_STEP_COUNTS.to_vec());
            }
            other => panic!("unexpected scenario {:?}", other),
        }
        match scenario(&["stochlab", "walk", "--sweep", "--paths", "40"]).scenario {
            Scenario::WalkConvergence { base, .. } => assert_eq!(base.paths, 40),
            other => panic!("unexpected scenario {:?}", other),
        }
    }

    #[test]
    fn test_cli_sde_forms() {
        let config = scenario(&[
            "stochlab", "sde", "--drift", "-0.5", "--drift-form", "constant", "--x0", "-1",
        ]);
        match config.scenario {
            Scenario::Sde { params, sde } => {
                assert_eq!(params.x0, -1.0);
                assert_eq!(sde.drift, Coefficient::Constant(-0.5));
                assert_eq!(sde.diffusion, Coefficient::Linear(0.2));
            }
            other => panic!("unexpected scenario {:?}", other),
        }
    }

    #[test]
    fn test_cli_crypto_commands() {
        let config = scenario(&["stochlab", "caesar", "hello world", "--shift", "3", "--language", "italian"]);
        assert_eq!(
            config.scenario,
            Scenario::Caesar {
                text: "hello world".into(),
                shift: 3,
                language: Language::Italian,
                top_k: 3
            }
        );

        let config = scenario(&["stochlab", "rsa", "attack", "--e", "17"]);
        assert_eq!(
            config.scenario,
            Scenario::Rsa {
                p: 61,
                q: 53,
                e: Some(17),
                plaintext: "attack".into(),
                language: None,
                top_k: 3
            }
        );
    }

    #[test]
    fn test_cli_stability_defaults() {
        let config = scenario(&["stochlab", "stability"]);
        assert_eq!(
            config.scenario,
            Scenario::Stability {
                base: crate::stats::stability::DEFAULT_BASE.to_vec(),
                transform: Transform::Scale(1e10)
            }
        );

        let config = scenario(&["stochlab", "stability", "--transform", "shift", "--by", "1e8", "1", "2"]);
        assert_eq!(
            config.scenario,
            Scenario::Stability { base: vec![1.0, 2.0], transform: Transform::Shift(1e8) }
        );
    }

    #[test]
    fn test_cli_rejects_unknown_language() {
        assert!(Cli::try_parse_from(["stochlab", "caesar", "abc", "--language", "klingon"]).is_err());
    }
}
