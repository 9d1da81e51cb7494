//! Letter frequencies and reference distributions
//!
//! Only the 26 ASCII letters are counted, case-insensitively. Everything
//! else in a text is ignored by the statistics but preserved by the ciphers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

pub const ALPHABET_LEN: usize = 26;

/// Letter index `A = 0 .. Z = 25`, case-insensitive.
#[inline]
pub fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_alphabetic() {
        Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
    } else {
        None
    }
}

/// Uppercase letter for an index below 26.
#[inline]
pub fn index_letter(i: usize) -> Option<char> {
    (i < ALPHABET_LEN).then(|| (b'A' + i as u8) as char)
}

/// Letter counts of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LetterFrequency {
    counts: [u64; ALPHABET_LEN],
    total: u64,
}

impl LetterFrequency {
    pub fn from_text(text: &str) -> Self {
        text.chars().collect()
    }

    #[inline]
    pub fn record(&mut self, c: char) {
        if let Some(i) = letter_index(c) {
            self.counts[i] += 1;
            self.total += 1;
        }
    }

    pub fn counts(&self) -> &[u64; ALPHABET_LEN] {
        &self.counts
    }

    pub fn count(&self, c: char) -> u64 {
        letter_index(c).map_or(0, |i| self.counts[i])
    }

    /// Number of letters counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Share of each letter; all zero for a text without letters.
    pub fn proportions(&self) -> [f64; ALPHABET_LEN] {
        let mut out = [0.0; ALPHABET_LEN];
        if self.total > 0 {
            for (p, &c) in out.iter_mut().zip(&self.counts) {
                *p = c as f64 / self.total as f64;
            }
        }
        out
    }
}

impl FromIterator<char> for LetterFrequency {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut freq = Self::default();
        for c in iter {
            freq.record(c);
        }
        freq
    }
}

/// Languages with a built-in letter-frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Italian,
    Spanish,
    French,
    German,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Italian,
        Language::Spanish,
        Language::French,
        Language::German,
    ];

    /// Letter frequencies in percent, `A..Z`.
    pub fn percentages(&self) -> &'static [f64; ALPHABET_LEN] {
        match self {
            Language::English => &ENGLISH,
            Language::Italian => &ITALIAN,
            Language::Spanish => &SPANISH,
            Language::French => &FRENCH,
            Language::German => &GERMAN,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Italian => "italian",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::German => "german",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Language::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SimError::Config(format!("unknown language `{}`", s)))
    }
}

#[rustfmt::skip]
const ENGLISH: [f64; ALPHABET_LEN] = [
    8.17, 1.49, 2.78, 4.25, 12.70, 2.23, 2.02, 6.09, 6.97, 0.15,
    0.77, 4.03, 2.41, 6.75, 7.51, 1.93, 0.10, 5.99, 6.33, 9.06,
    2.76, 0.98, 2.36, 0.15, 1.97, 0.07,
];

#[rustfmt::skip]
const ITALIAN: [f64; ALPHABET_LEN] = [
    11.74, 0.92, 4.50, 3.73, 11.79, 0.95, 1.64, 1.54, 11.28, 0.00,
    0.00, 6.51, 2.51, 6.88, 9.83, 3.05, 0.51, 6.37, 4.98, 5.62,
    3.01, 2.10, 0.00, 0.00, 0.00, 0.49,
];

#[rustfmt::skip]
const SPANISH: [f64; ALPHABET_LEN] = [
    12.53, 1.42, 4.68, 5.86, 13.68, 0.69, 1.01, 0.70, 6.25, 0.44,
    0.00, 4.97, 3.15, 6.71, 8.68, 2.51, 0.88, 6.87, 7.98, 4.63,
    3.93, 0.90, 0.00, 0.22, 0.90, 0.52,
];

#[rustfmt::skip]
const FRENCH: [f64; ALPHABET_LEN] = [
    7.64, 0.90, 3.26, 3.67, 14.72, 1.06, 0.87, 0.74, 7.53, 0.61,
    0.00, 5.46, 2.97, 7.10, 5.38, 2.93, 1.36, 6.55, 7.95, 7.24,
    6.31, 1.83, 0.00, 0.43, 0.13, 0.21,
];

#[rustfmt::skip]
const GERMAN: [f64; ALPHABET_LEN] = [
    6.51, 1.89, 3.06, 5.08, 17.40, 1.66, 3.01, 4.76, 7.55, 0.27,
    1.21, 3.44, 2.53, 9.78, 2.51, 0.79, 0.02, 7.00, 7.27, 6.15,
    4.35, 0.67, 1.89, 0.03, 0.04, 1.13,
];

/// Probability of each letter in the language a plaintext is expected to follow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDistribution {
    probabilities: [f64; ALPHABET_LEN],
}

impl ReferenceDistribution {
    /// Normalizes a language table to sum to one.
    pub fn language(language: Language) -> Self {
        let table = language.percentages();
        let sum: f64 = table.iter().sum();
        let mut probabilities = [0.0; ALPHABET_LEN];
        for (p, &pct) in probabilities.iter_mut().zip(table) {
            *p = pct / sum;
        }
        Self { probabilities }
    }

    /// The letter distribution of a known text.
    pub fn from_text(text: &str) -> Result<Self> {
        let freq = LetterFrequency::from_text(text);
        if freq.total() == 0 {
            return Err(SimError::EmptyData);
        }
        Ok(Self { probabilities: freq.proportions() })
    }

    pub fn probabilities(&self) -> &[f64; ALPHABET_LEN] {
        &self.probabilities
    }
}

impl From<Language> for ReferenceDistribution {
    fn from(language: Language) -> Self {
        Self::language(language)
    }
}
