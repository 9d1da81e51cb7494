//! Error types shared by every simulator, estimator and key search.
//!
//! Invalid configuration is always reported as a [`SimError`] naming the
//! offending parameter. Degenerate numerical cases (zero variance, zero
//! expected counts) are not errors; they follow explicit zero/skip rules in
//! the modules that meet them.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("probability `{name}` = {value} is outside [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },

    /// The per-substep Bernoulli probability `rate * dt` left `[0, 1]`.
    #[error("step probability rate*dt = {rate}*{dt} = {p} exceeds 1; increase the step count")]
    StepProbabilityTooLarge { rate: f64, dt: f64, p: f64 },

    #[error("`{name}` = {value} is not prime")]
    NotPrime { name: &'static str, value: u64 },

    #[error("p and q must be different primes")]
    EqualPrimes,

    #[error("e = {e} is not coprime to phi = {phi}")]
    NotCoprime { e: u64, phi: u64 },

    #[error("no data supplied")]
    EmptyData,

    #[error("no valid key found in the candidate space")]
    NoValidKey,

    #[error("run cancelled after {completed} of {requested} trajectories")]
    Cancelled { completed: usize, requested: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        SimError::InvalidParameter { name, value, reason }
    }
}

/// `value > 0` and finite.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::invalid(name, value, "must be a finite positive number"))
    }
}

/// `value >= 1`.
pub(crate) fn ensure_count(name: &'static str, value: usize) -> Result<usize> {
    if value >= 1 {
        Ok(value)
    } else {
        Err(SimError::invalid(name, value as f64, "must be at least 1"))
    }
}

pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::invalid(name, value, "must be finite"))
    }
}

pub(crate) fn ensure_probability(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SimError::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_parameter() {
        let err = ensure_positive("horizon", -1.0).unwrap_err();
        assert!(err.to_string().contains("horizon"));
        assert!(err.to_string().contains("-1"));

        let err = ensure_probability("p", 1.5).unwrap_err();
        assert_eq!(err, SimError::InvalidProbability { name: "p", value: 1.5 });
    }

    #[test]
    fn test_guards_accept_valid_values() {
        assert_eq!(ensure_positive("t", 2.0), Ok(2.0));
        assert_eq!(ensure_count("n", 3), Ok(3));
        assert_eq!(ensure_probability("p", 0.0), Ok(0.0));
        assert_eq!(ensure_probability("p", 1.0), Ok(1.0));
        assert!(ensure_count("m", 0).is_err());
        assert!(ensure_positive("t", f64::NAN).is_err());
        assert!(ensure_finite("x0", f64::INFINITY).is_err());
    }
}
