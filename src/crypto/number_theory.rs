//! Integer primitives for textbook RSA

use crate::error::{Result, SimError};

/// Trial division over odd divisors up to `√n`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut i = 3u64;
    while i.saturating_mul(i) <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Every prime `≤ limit`.
pub fn small_primes(limit: u64) -> Vec<u64> {
    (2..=limit).filter(|&n| is_prime(n)).collect()
}

pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// `base^exp mod modulus` by square-and-multiply.
///
/// Intermediate products are widened to `u128`. `mod_pow(b, 0, m) = 1` for
/// `m > 1`, and any power modulo one (or zero) is `0`.
///
/// ```
/// use stochlab::crypto::mod_pow;
///
/// assert_eq!(mod_pow(4, 13, 497), 445);
/// assert_eq!(mod_pow(7, 0, 10), 1);
/// ```
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus <= 1 {
        return 0;
    }
    let m = modulus as u128;
    let mut result = 1u128;
    let mut base = base as u128 % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        exp >>= 1;
        base = base * base % m;
    }
    result as u64
}

/// `d` in `[0, phi)` with `e·d ≡ 1 (mod phi)`, by the extended Euclidean algorithm.
///
/// Fails with [`SimError::NotCoprime`] when `gcd(e, phi) ≠ 1`.
pub fn mod_inverse(e: u64, phi: u64) -> Result<u64> {
    if phi < 2 {
        return Err(SimError::invalid("phi", phi as f64, "modulus must be at least 2"));
    }
    let (mut old_r, mut r) = (e as i128, phi as i128);
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return Err(SimError::NotCoprime { e, phi });
    }
    Ok(old_s.rem_euclid(phi as i128) as u64)
}
