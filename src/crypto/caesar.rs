//! Caesar cipher and its frequency attack
//!
//! Letters are rotated within their case; every other character passes
//! through unchanged. The attack tries all 26 shifts.
//!
//! ```
//! use stochlab::crypto::{caesar, Language, ReferenceDistribution};
//!
//! let plain = "It was the best of times, it was the worst of times, it was the age of \
//!              wisdom, it was the age of foolishness, it was the epoch of belief, it was \
//!              the epoch of incredulity, it was the season of light";
//! let cipher = caesar::encrypt(plain, 11);
//! let best = caesar::best_caesar_shift(&cipher, &ReferenceDistribution::language(Language::English)).unwrap();
//! assert_eq!(best.key, 11);
//! assert_eq!(best.plaintext, plain);
//! ```

use crate::crypto::letters::{LetterFrequency, ReferenceDistribution, ALPHABET_LEN};
use crate::crypto::search::{rank_candidates, top_k, ScoredCandidate};
use crate::error::{Result, SimError};

#[inline]
fn rotate(c: char, shift: u8) -> char {
    let base = if c.is_ascii_uppercase() {
        b'A'
    } else if c.is_ascii_lowercase() {
        b'a'
    } else {
        return c;
    };
    let offset = (c as u8 - base + shift % ALPHABET_LEN as u8) % ALPHABET_LEN as u8;
    (base + offset) as char
}

/// Rotates every letter forward by `shift`.
pub fn encrypt(plaintext: &str, shift: u8) -> String {
    plaintext.chars().map(|c| rotate(c, shift)).collect()
}

/// Rotates every letter back by `shift`.
pub fn decrypt(ciphertext: &str, shift: u8) -> String {
    let back = (ALPHABET_LEN as u8 - shift % ALPHABET_LEN as u8) % ALPHABET_LEN as u8;
    encrypt(ciphertext, back)
}

/// Every shift, best first.
///
/// A ciphertext without letters carries no frequency signal and is
/// [`SimError::EmptyData`].
pub fn rank_caesar_shifts(
    ciphertext: &str,
    reference: &ReferenceDistribution,
    k: usize,
) -> Result<Vec<ScoredCandidate<u8>>> {
    let letters = LetterFrequency::from_text(ciphertext).total();
    if letters == 0 {
        return Err(SimError::EmptyData);
    }
    let ranked = rank_candidates(
        0..ALPHABET_LEN as u8,
        |shift| decrypt(ciphertext, shift),
        reference,
        letters,
    )?;
    tracing::debug!(letters, best = ranked[0].key, score = ranked[0].score, "caesar search");
    Ok(top_k(ranked, k))
}

/// The shift whose decryption is closest to `reference`.
pub fn best_caesar_shift(
    ciphertext: &str,
    reference: &ReferenceDistribution,
) -> Result<ScoredCandidate<u8>> {
    rank_caesar_shifts(ciphertext, reference, 1)?
        .into_iter()
        .next()
        .ok_or(SimError::NoValidKey)
}
