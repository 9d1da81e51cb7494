//! Run results
//!
//! A [`Report`] wraps the result of one scenario. It serializes to JSON for
//! machine consumption and its `Display` impl prints a short text summary.

use std::fmt;

use serde::Serialize;

use crate::crypto::{CipherSymbol, RsaKeys, ScoredCandidate};
use crate::simulation::{
    ContinuousEnsemble, ConvergencePoint, CountingEnsemble, FinalSummary, FrequencyEnsemble,
    WalkEnsemble,
};
use crate::stats::{MomentSummary, StabilityReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Counting(CountingEnsemble),
    Wiener(ContinuousEnsemble),
    Sde(ContinuousEnsemble),
    Walk(WalkEnsemble),
    Frequency(FrequencyEnsemble),
    Convergence {
        process: String,
        points: Vec<ConvergencePoint>,
    },
    Moments {
        online: MomentSummary,
        batch: MomentSummary,
    },
    Stability(StabilityReport),
    Caesar {
        ciphertext: String,
        candidates: Vec<ScoredCandidate<u8>>,
    },
    Rsa {
        keys: RsaKeys,
        ciphertext: Vec<CipherSymbol>,
        candidates: Vec<ScoredCandidate<u64>>,
    },
}

fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => "n/a".to_string(),
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, summary: &FinalSummary) -> fmt::Result {
    let m = &summary.moments;
    writeln!(
        f,
        "  mean      {:>12.6}  (theory {:.6}, error {})",
        m.mean,
        summary.theoretical_mean,
        pct(summary.mean_error_pct())
    )?;
    writeln!(
        f,
        "  variance  {:>12.6}  (theory {:.6}, error {})",
        m.variance,
        summary.theoretical_variance,
        pct(summary.variance_error_pct())
    )?;
    writeln!(
        f,
        "  quartiles {:.4} / {:.4} / {:.4}",
        summary.descriptive.q25, summary.descriptive.median, summary.descriptive.q75
    )
}

fn write_moments(f: &mut fmt::Formatter<'_>, label: &str, m: &MomentSummary) -> fmt::Result {
    writeln!(
        f,
        "  {:<7} n={} mean={:.6} var={:.6} std={:.6} skew={:.6} kurt={:.6}",
        label, m.n, m.mean, m.variance, m.std_dev, m.skewness, m.kurtosis
    )
}

fn write_candidates<K: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    candidates: &[ScoredCandidate<K>],
) -> fmt::Result {
    for (rank, c) in candidates.iter().enumerate() {
        writeln!(f, "  #{} key={} chi2={:.3}  {}", rank + 1, c.key, c.score, c.plaintext)?;
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Counting(e) => {
                writeln!(
                    f,
                    "Counting process: λ={} T={} n={} m={} (λΔt={:.4})",
                    e.params.rate, e.params.horizon, e.params.steps, e.params.paths, e.step_probability
                )?;
                write_summary(f, &e.summary)?;
                writeln!(f, "  dispersion {:.4}", e.dispersion_index())?;
                writeln!(
                    f,
                    "  first event {:.4} (theory {:.4})",
                    e.mean_first_event_time, e.theoretical_mean_first_event_time
                )?;
                writeln!(
                    f,
                    "  fit KS={:.4} chi2={:.3} df={} {:?}",
                    e.fit.ks, e.fit.chi_square, e.fit.degrees_of_freedom, e.fit.quality
                )
            }
            Report::Wiener(e) | Report::Sde(e) => {
                let label = if matches!(self, Report::Wiener(_)) { "Wiener process" } else { "SDE" };
                writeln!(
                    f,
                    "{}: X0={} T={} n={} m={}",
                    label, e.params.x0, e.params.horizon, e.params.steps, e.params.paths
                )?;
                write_moments(f, "final", &e.moments)?;
                if let Some(t) = e.theoretical {
                    writeln!(f, "  theory  mean={:.6} var={:.6}", t.mean, t.variance)?;
                }
                if let Some(fit) = e.normal_fit {
                    writeln!(f, "  normal fit KS={:.4} {:?}", fit.ks, fit.quality)?;
                }
                writeln!(f, "  P(X>0)={:.4} P(X<0)={:.4}", e.prob_positive, e.prob_negative)
            }
            Report::Walk(e) => {
                writeln!(
                    f,
                    "Random walk: n={} m={} p_down={}",
                    e.params.steps, e.params.paths, e.params.p_down
                )?;
                write_summary(f, &e.summary)?;
                writeln!(f, "  z-score {:.3}", e.mean_z_score())?;
                writeln!(
                    f,
                    "  fit KS={:.4} chi2={:.3} df={} {:?}",
                    e.fit.ks, e.fit.chi_square, e.fit.degrees_of_freedom, e.fit.quality
                )
            }
            Report::Frequency(e) => {
                writeln!(
                    f,
                    "Relative frequency: p={} trials={} paths={}",
                    e.params.p, e.params.trials, e.params.paths
                )?;
                write_moments(f, "final", &e.moments)?;
                writeln!(
                    f,
                    "  theory std={:.6} mean |f-p|={:.6} {:?}",
                    e.theoretical_std, e.mean_abs_error, e.convergence
                )
            }
            Report::Convergence { process, points } => {
                writeln!(f, "Convergence sweep ({})", process)?;
                writeln!(f, "  {:>6} {:>12} {:>12} {:>10} {:>10} {:>8}", "steps", "mean", "theory", "mean err", "var err", "KS")?;
                for p in points {
                    writeln!(
                        f,
                        "  {:>6} {:>12.6} {:>12.6} {:>10} {:>10} {:>8.4}",
                        p.steps,
                        p.mean,
                        p.theoretical_mean,
                        pct(p.mean_error_pct),
                        pct(p.variance_error_pct),
                        p.ks
                    )?;
                }
                Ok(())
            }
            Report::Moments { online, batch } => {
                writeln!(f, "Moments")?;
                write_moments(f, "online", online)?;
                write_moments(f, "batch", batch)
            }
            Report::Stability(r) => {
                writeln!(f, "Stability: {:?}, true variance {:e}", r.transform, r.true_variance)?;
                for (summary, error) in [
                    (&r.online, r.online_relative_error),
                    (&r.batch, r.batch_relative_error),
                    (&r.power_sum, r.power_sum_relative_error),
                ] {
                    writeln!(
                        f,
                        "  {:<9} variance {:e} (relative error {:e})",
                        format!("{:?}", summary.method),
                        summary.variance,
                        error
                    )?;
                }
                match r.more_accurate() {
                    Some(method) => writeln!(f, "  most accurate: {:?}", method),
                    None => writeln!(f, "  no single most accurate method"),
                }
            }
            Report::Caesar { ciphertext, candidates } => {
                writeln!(f, "Caesar attack on: {}", ciphertext)?;
                write_candidates(f, candidates)
            }
            Report::Rsa { keys, ciphertext, candidates } => {
                writeln!(
                    f,
                    "RSA attack: p={} q={} n={} phi={} e={} (true d={})",
                    keys.p, keys.q, keys.n, keys.phi, keys.e, keys.d
                )?;
                let preview: Vec<String> = ciphertext.iter().take(16).map(|s| s.to_string()).collect();
                writeln!(f, "  ciphertext [{}{}]", preview.join(", "), if ciphertext.len() > 16 { ", ..." } else { "" })?;
                write_candidates(f, candidates)
            }
        }
    }
}
