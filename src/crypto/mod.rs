//! Frequency cryptanalysis
//!
//! Two toy ciphers and one attack:
//!
//! - [`caesar`]: rotate letters by a shift; 26 candidate keys
//! - [`rsa`]: letter-wise textbook RSA; candidate private exponents
//!   `d ∈ [1, φ)` with `e·d ≡ 1 (mod φ)`
//! - [`search`]: decrypt under every candidate, score the letter counts by
//!   chi-squared against a [`ReferenceDistribution`], rank ascending
//!
//! The reference is either a built-in [`Language`] table or the letter
//! distribution of a known plaintext.

pub mod caesar;
pub mod letters;
pub mod number_theory;
pub mod rsa;
pub mod search;

pub use caesar::{best_caesar_shift, rank_caesar_shifts};
pub use letters::{Language, LetterFrequency, ReferenceDistribution};
pub use number_theory::{gcd, is_prime, mod_inverse, mod_pow, small_primes};
pub use rsa::{best_rsa_key, rank_rsa_keys, CipherSymbol, RsaKeys};
pub use search::{chi_square_score, ScoredCandidate};
