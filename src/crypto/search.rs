//! Chi-squared key search
//!
//! Every candidate key decrypts the ciphertext; the decryption's letter
//! counts are compared with a reference distribution by Pearson's
//! chi-squared, and candidates are ranked ascending by that score. Ties keep
//! the candidates' original order, so the lowest key wins.

use serde::{Deserialize, Serialize};

use crate::crypto::letters::{LetterFrequency, ReferenceDistribution};
use crate::error::{Result, SimError};
use crate::fit::pearson_chi_square;

/// A candidate key with its decryption and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate<K> {
    pub key: K,
    pub plaintext: String,
    pub frequencies: LetterFrequency,
    /// Chi-squared distance to the reference; lower is better.
    pub score: f64,
}

/// Chi-squared of observed letter counts against `letters` draws from `reference`.
///
/// Letters the reference gives zero probability contribute nothing.
pub fn chi_square_score(
    observed: &LetterFrequency,
    reference: &ReferenceDistribution,
    letters: u64,
) -> f64 {
    let n = letters as f64;
    pearson_chi_square(
        observed
            .counts()
            .iter()
            .zip(reference.probabilities())
            .map(|(&count, &p)| (count as f64, p * n)),
    )
}

/// Scores every candidate and returns them ranked ascending.
///
/// `letters` is the number of letter symbols in the ciphertext. An empty
/// candidate space is [`SimError::NoValidKey`].
pub(crate) fn rank_candidates<K, I, F>(
    candidates: I,
    mut decrypt: F,
    reference: &ReferenceDistribution,
    letters: u64,
) -> Result<Vec<ScoredCandidate<K>>>
where
    K: Copy + std::fmt::Debug,
    I: IntoIterator<Item = K>,
    F: FnMut(K) -> String,
{
    let mut scored: Vec<ScoredCandidate<K>> = candidates
        .into_iter()
        .map(|key| {
            let plaintext = decrypt(key);
            let frequencies = LetterFrequency::from_text(&plaintext);
            let score = chi_square_score(&frequencies, reference, letters);
            tracing::trace!(?key, score, "scored candidate");
            ScoredCandidate {
                key,
                plaintext,
                frequencies,
                score,
            }
        })
        .collect();

    if scored.is_empty() {
        return Err(SimError::NoValidKey);
    }
    // sort_by is stable: equal scores stay in candidate order
    scored.sort_by(|a, b| a.score.total_cmp(&b.score));
    Ok(scored)
}

/// Keeps the best `top_k` of a ranking, at least one.
pub(crate) fn top_k<K>(mut ranked: Vec<ScoredCandidate<K>>, top_k: usize) -> Vec<ScoredCandidate<K>> {
    ranked.truncate(top_k.max(1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::letters::Language;

    #[test]
    fn test_score_is_zero_for_exact_counts() {
        let reference = ReferenceDistribution::from_text("aabb").unwrap();
        let observed = LetterFrequency::from_text("abab");
        assert_eq!(chi_square_score(&observed, &reference, 4), 0.0);
    }

    #[test]
    fn test_zero_reference_letters_are_skipped() {
        // Italian gives J, K, W, X and Y zero probability
        let reference = ReferenceDistribution::language(Language::Italian);
        let observed = LetterFrequency::from_text("jkwxy");
        let score = chi_square_score(&observed, &reference, 5);
        assert!(score.is_finite());
        // Every other letter is expected and unobserved: Σ p·n = n (1 − 0)
        assert!((score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_is_stable_and_ascending() {
        let reference = ReferenceDistribution::from_text("aaaa").unwrap();
        let texts = ["bbbb", "aaaa", "aaaa", "abab"];
        let ranked = rank_candidates(0..4usize, |k| texts[k].to_string(), &reference, 4).unwrap();
        let keys: Vec<usize> = ranked.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec![1, 2, 3, 0]);
        assert!(ranked.windows(2).all(|w| w[0].score <= w[1].score));
        assert_eq!(top_k(ranked, 0).len(), 1);
    }

    #[test]
    fn test_empty_candidate_space() {
        let reference = ReferenceDistribution::language(Language::English);
        let err = rank_candidates(std::iter::empty::<u64>(), |_| String::new(), &reference, 10);
        assert_eq!(err, Err(SimError::NoValidKey));
    }
}
