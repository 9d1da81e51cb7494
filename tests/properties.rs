//! Property-based tests for the numeric and cipher primitives

use proptest::prelude::*;

use stochlab::crypto::{caesar, gcd, mod_inverse, mod_pow, LetterFrequency};
use stochlab::fit::{chi_square_statistic, ks_statistic, tabulate, FrequencyTable};
use stochlab::probability::Binomial;
use stochlab::stats::{batch_moments, online_moments};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_online_and_batch_agree_on_well_conditioned_data(
        data in prop::collection::vec(1e-3f64..1e6, 8..200),
    ) {
        let online = online_moments(&data).unwrap();
        let batch = batch_moments(&data).unwrap();
        prop_assert_eq!(online.n, batch.n);
        prop_assert!((online.mean - batch.mean).abs() <= 1e-12 * batch.mean.abs());
        prop_assert!((online.variance - batch.variance).abs() <= 1e-9 * online.variance);
        prop_assert_eq!(online.min, batch.min);
        prop_assert_eq!(online.max, batch.max);
    }

    #[test]
    fn prop_online_variance_never_negative(
        data in prop::collection::vec(-1e9f64..1e9, 1..100),
    ) {
        let online = online_moments(&data).unwrap();
        prop_assert!(online.variance >= 0.0);
        prop_assert!(online.min <= online.mean && online.mean <= online.max);
    }

    #[test]
    fn prop_ks_is_bounded(
        outcomes in prop::collection::vec(0i64..=20, 1..300),
        p in 0.05f64..0.95,
    ) {
        let table: FrequencyTable<i64> = outcomes.into_iter().collect();
        let keys = table.outcomes();
        let theory = tabulate(&Binomial::new(20, p).unwrap(), keys.iter().copied());
        let ks = ks_statistic(&keys, &table, &theory, table.total());
        prop_assert!((0.0..=1.0 + 1e-9).contains(&ks));
        let chi2 = chi_square_statistic(&keys, &table, &theory, table.total());
        prop_assert!(chi2 >= 0.0 && chi2.is_finite());
    }

    #[test]
    fn prop_mod_pow_matches_repeated_multiplication(
        base in 0u64..5000,
        exp in 0u64..200,
        modulus in 2u64..5000,
    ) {
        let mut expected = 1 % modulus;
        for _ in 0..exp {
            expected = expected * (base % modulus) % modulus;
        }
        prop_assert_eq!(mod_pow(base, exp, modulus), expected);
    }

    #[test]
    fn prop_mod_inverse_inverts(e in 2u64..10_000, phi in 2u64..10_000) {
        match mod_inverse(e, phi) {
            Ok(d) => {
                prop_assert!(d < phi);
                prop_assert_eq!((e as u128 * d as u128) % phi as u128, 1);
            }
            Err(_) => prop_assert_ne!(gcd(e, phi), 1),
        }
    }

    #[test]
    fn prop_caesar_round_trip(text in "[ -~]{0,64}", shift in 0u8..=255) {
        let cipher = caesar::encrypt(&text, shift);
        prop_assert_eq!(caesar::decrypt(&cipher, shift), text.clone());
        prop_assert_eq!(
            LetterFrequency::from_text(&cipher).total(),
            text.chars().filter(|c| c.is_ascii_alphabetic()).count() as u64
        );
    }
}
