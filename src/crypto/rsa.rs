//! Letter-wise textbook RSA and its frequency attack
//!
//! Each letter `A = 0 .. Z = 25` is encrypted on its own as `c = m^e mod n`;
//! non-letters are carried through untouched. Decrypting with a wrong
//! exponent can produce values `≥ 26`, which become [`NON_LETTER`].
//!
//! This is a teaching cipher: with only 26 distinct plaintext symbols it is a
//! substitution cipher. Every `d ∈ [1, φ)` with `e·d ≡ 1 (mod φ)` is a
//! candidate key; since `φ` is known, the extended Euclidean algorithm yields
//! that set directly (it has at most one member) instead of a scan over `φ`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::letters::{index_letter, letter_index, ReferenceDistribution};
use crate::crypto::number_theory::{gcd, is_prime, mod_inverse, mod_pow};
use crate::crypto::search::{rank_candidates, top_k, ScoredCandidate};
use crate::error::{Result, SimError};

/// Public exponents tried in order when none is supplied.
pub const PUBLIC_EXPONENT_CANDIDATES: [u64; 10] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31];

/// Stands in for a decrypted value outside `A..Z`.
pub const NON_LETTER: char = '?';

/// A textbook RSA key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaKeys {
    pub p: u64,
    pub q: u64,
    pub n: u64,
    pub phi: u64,
    pub e: u64,
    pub d: u64,
}

impl RsaKeys {
    /// Builds a key pair from two distinct primes.
    ///
    /// With `e = None` the first of [`PUBLIC_EXPONENT_CANDIDATES`] below `φ`
    /// and coprime to it is used. An explicit `e` must satisfy `1 < e < φ`
    /// and `gcd(e, φ) = 1`.
    ///
    /// ```
    /// use stochlab::crypto::RsaKeys;
    ///
    /// let keys = RsaKeys::generate(61, 53, Some(17)).unwrap();
    /// assert_eq!((keys.n, keys.phi, keys.d), (3233, 3120, 2753));
    /// ```
    pub fn generate(p: u64, q: u64, e: Option<u64>) -> Result<Self> {
        if !is_prime(p) {
            return Err(SimError::NotPrime { name: "p", value: p });
        }
        if !is_prime(q) {
            return Err(SimError::NotPrime { name: "q", value: q });
        }
        if p == q {
            return Err(SimError::EqualPrimes);
        }
        let n = p
            .checked_mul(q)
            .ok_or_else(|| SimError::invalid("q", q as f64, "p·q overflows u64"))?;
        let phi = (p - 1) * (q - 1);

        let e = match e {
            Some(e) => {
                if e <= 1 || e >= phi {
                    return Err(SimError::invalid("e", e as f64, "must satisfy 1 < e < phi"));
                }
                if gcd(e, phi) != 1 {
                    return Err(SimError::NotCoprime { e, phi });
                }
                e
            }
            None => PUBLIC_EXPONENT_CANDIDATES
                .into_iter()
                .find(|&c| c < phi && gcd(c, phi) == 1)
                .ok_or_else(|| {
                    SimError::invalid(
                        "phi",
                        phi as f64,
                        "no candidate public exponent is below phi and coprime to it",
                    )
                })?,
        };
        let d = mod_inverse(e, phi)?;

        tracing::debug!(p, q, n, phi, e, d, "rsa keys generated");
        Ok(Self { p, q, n, phi, e, d })
    }
}

/// One position of a letter-wise RSA ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CipherSymbol {
    Letter(u64),
    Other(char),
}

impl fmt::Display for CipherSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherSymbol::Letter(c) => write!(f, "{}", c),
            CipherSymbol::Other(ch) => write!(f, "{:?}", ch),
        }
    }
}

/// `c = m^e mod n` per letter; letters are case-folded to uppercase.
pub fn encrypt(plaintext: &str, e: u64, n: u64) -> Vec<CipherSymbol> {
    plaintext
        .chars()
        .map(|ch| match letter_index(ch) {
            Some(m) => CipherSymbol::Letter(mod_pow(m as u64, e, n)),
            None => CipherSymbol::Other(ch),
        })
        .collect()
}

/// `m = c^d mod n` per letter.
pub fn decrypt(ciphertext: &[CipherSymbol], d: u64, n: u64) -> String {
    ciphertext
        .iter()
        .map(|symbol| match *symbol {
            CipherSymbol::Letter(c) => {
                index_letter(mod_pow(c, d, n) as usize).unwrap_or(NON_LETTER)
            }
            CipherSymbol::Other(ch) => ch,
        })
        .collect()
}

/// Private exponents `d ∈ [1, φ)` with `e·d ≡ 1 (mod φ)`.
///
/// Empty when `e` has no inverse modulo `φ`.
pub fn private_exponent_candidates(e: u64, phi: u64) -> impl Iterator<Item = u64> {
    mod_inverse(e, phi).ok().filter(|&d| d >= 1).into_iter()
}

/// All valid private exponents, best first.
pub fn rank_rsa_keys(
    ciphertext: &[CipherSymbol],
    e: u64,
    phi: u64,
    n: u64,
    reference: &ReferenceDistribution,
    k: usize,
) -> Result<Vec<ScoredCandidate<u64>>> {
    let letters = ciphertext
        .iter()
        .filter(|s| matches!(s, CipherSymbol::Letter(_)))
        .count() as u64;
    let ranked = rank_candidates(
        private_exponent_candidates(e, phi),
        |d| decrypt(ciphertext, d, n),
        reference,
        letters,
    )?;
    tracing::debug!(letters, candidates = ranked.len(), best = ranked[0].key, "rsa search");
    Ok(top_k(ranked, k))
}

/// The private exponent whose decryption is closest to `reference`.
pub fn best_rsa_key(
    ciphertext: &[CipherSymbol],
    e: u64,
    phi: u64,
    n: u64,
    reference: &ReferenceDistribution,
) -> Result<ScoredCandidate<u64>> {
    rank_rsa_keys(ciphertext, e, phi, n, reference, 1)?
        .into_iter()
        .next()
        .ok_or(SimError::NoValidKey)
}
