//! Goodness-of-fit: empirical frequencies vs a theoretical distribution
//!
//! # Statistics
//!
//! - **Kolmogorov–Smirnov**: largest gap between the empirical and
//!   theoretical CDFs over the observed outcomes
//! - **Pearson chi-squared**: `Σ (observed − expected)² / expected`
//!
//! The theoretical side is always a parameter: either a precomputed
//! outcome → probability map or any [`DiscreteDistribution`], so the same
//! code scores Poisson, Binomial and random-walk ensembles. Continuous
//! samples use [`ks_statistic_continuous`] against any [`Distribution`].
//!
//! # Zero expectations
//!
//! Terms whose expected count is exactly zero are skipped in the chi-squared
//! sum. They are not padded with an epsilon.
//!
//! # Example
//!
//! ```
//! use stochlab::fit::{chi_square_statistic, ks_statistic, tabulate, FrequencyTable};
//! use stochlab::probability::Binomial;
//!
//! let observed: FrequencyTable<i64> = [0, 1, 1, 2].into_iter().collect();
//! let theory = tabulate(&Binomial::new(2, 0.5).unwrap(), observed.outcomes());
//!
//! let ks = ks_statistic(&observed.outcomes(), &observed, &theory, observed.total());
//! let chi2 = chi_square_statistic(&observed.outcomes(), &observed, &theory, observed.total());
//! assert!(ks.abs() < 1e-12);
//! assert!(chi2.abs() < 1e-12);
//! ```

mod frequency;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::probability::{DiscreteDistribution, Distribution};

pub use frequency::{tabulate, FrequencyTable};

/// KS statistic over sorted distinct `outcomes`.
///
/// The empirical CDF accumulates `count / total`; the theoretical CDF at `k`
/// is the sum of every theoretical entry whose outcome is `≤ k`, including
/// entries for outcomes that were never observed.
pub fn ks_statistic<K: Ord + Copy>(
    outcomes: &[K],
    empirical: &FrequencyTable<K>,
    theoretical: &BTreeMap<K, f64>,
    total: u64,
) -> f64 {
    debug_assert!(outcomes.windows(2).all(|w| w[0] < w[1]), "outcomes must be sorted");
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;

    let mut theory = theoretical.iter().peekable();
    let mut theoretical_cdf = 0.0;
    let mut empirical_cdf = 0.0;
    let mut max_diff: f64 = 0.0;

    for &k in outcomes {
        empirical_cdf += empirical.count(k) as f64 / total;
        while let Some((&key, &p)) = theory.peek() {
            if key > k {
                break;
            }
            theoretical_cdf += p;
            theory.next();
        }
        max_diff = max_diff.max((empirical_cdf - theoretical_cdf).abs());
    }

    max_diff
}

/// Pearson chi-squared over `(observed, expected)` count pairs.
///
/// Pairs with `expected == 0` contribute nothing.
pub fn pearson_chi_square<I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    pairs
        .into_iter()
        .filter(|&(_, expected)| expected > 0.0)
        .map(|(observed, expected)| (observed - expected).powi(2) / expected)
        .sum()
}

/// Per-outcome chi-squared terms; outcomes with zero expectation are omitted.
pub fn chi_square_contributions<K: Ord + Copy>(
    outcomes: &[K],
    empirical: &FrequencyTable<K>,
    theoretical: &BTreeMap<K, f64>,
    total: u64,
) -> Vec<(K, f64)> {
    outcomes
        .iter()
        .filter_map(|&k| {
            let expected = theoretical.get(&k).copied().unwrap_or(0.0) * total as f64;
            if expected > 0.0 {
                let observed = empirical.count(k) as f64;
                Some((k, (observed - expected).powi(2) / expected))
            } else {
                None
            }
        })
        .collect()
}

/// Chi-squared statistic with `expected = p(k) · total`.
pub fn chi_square_statistic<K: Ord + Copy>(
    outcomes: &[K],
    empirical: &FrequencyTable<K>,
    theoretical: &BTreeMap<K, f64>,
    total: u64,
) -> f64 {
    pearson_chi_square(outcomes.iter().map(|&k| {
        let expected = theoretical.get(&k).copied().unwrap_or(0.0) * total as f64;
        (empirical.count(k) as f64, expected)
    }))
}

/// Two-sided KS statistic of a sorted continuous sample against `dist`.
pub fn ks_statistic_continuous<D: Distribution + ?Sized>(sorted: &[f64], dist: &D) -> f64 {
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = dist.cdf(x);
            let above = (i + 1) as f64 / n - f;
            let below = f - i as f64 / n;
            above.max(below)
        })
        .fold(0.0, f64::max)
}

/// Qualitative fit grade from a KS statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitQuality {
    Excellent,
    Good,
    Moderate,
}

impl FitQuality {
    pub fn from_ks(ks: f64) -> Self {
        if ks < 0.05 {
            FitQuality::Excellent
        } else if ks < 0.15 {
            FitQuality::Good
        } else {
            FitQuality::Moderate
        }
    }
}

/// Fit of an integer-valued sample against a discrete distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteFit {
    /// Theoretical probability of each observed outcome.
    pub theoretical: BTreeMap<i64, f64>,
    pub ks: f64,
    pub chi_square: f64,
    /// Observed outcomes minus one.
    pub degrees_of_freedom: usize,
    pub quality: FitQuality,
}

impl DiscreteFit {
    pub fn evaluate<D: DiscreteDistribution + ?Sized>(
        observed: &FrequencyTable<i64>,
        dist: &D,
    ) -> Self {
        let outcomes = observed.outcomes();
        let theoretical = tabulate(dist, outcomes.iter().copied());
        let total = observed.total();
        let ks = ks_statistic(&outcomes, observed, &theoretical, total);
        let chi_square = chi_square_statistic(&outcomes, observed, &theoretical, total);
        Self {
            theoretical,
            ks,
            chi_square,
            degrees_of_freedom: outcomes.len().saturating_sub(1),
            quality: FitQuality::from_ks(ks),
        }
    }
}
