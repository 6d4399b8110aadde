//! Wiener's attack: recovers a small private exponent from `(N, e)` via the
//! continued-fraction convergents of `e / N`.

use super::PublicKey;
use num_bigint::BigUint;
use num_integer::Roots;
use num_traits::{One, Zero};
use utils::BigUintExt;

/// One continued-fraction convergent `numerator / denominator`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Convergent {
    pub numerator: BigUint,
    pub denominator: BigUint,
}

/// The attack always returns its full convergent list; `success` says
/// whether any convergent exposed the key.
#[derive(Clone, Debug)]
pub struct WienerAttackResult {
    pub d: Option<BigUint>,
    pub phi: Option<BigUint>,
    pub convergents: Vec<Convergent>,
    pub success: bool,
}

/// For each convergent `(k, d)`: a valid key satisfies `e*d = 1 + k*φ`, so
/// a candidate `φ = (e*d - 1) / k` must be integral, below `N`, and yield
/// `p + q = N - φ + 1` whose discriminant `(p+q)² - 4N` is a perfect
/// square with `p*q = N`.
pub fn wiener_attack(public_key: &PublicKey) -> WienerAttackResult {
    let (e, n) = (public_key.exponent(), public_key.modulus());
    let convergents = continued_fraction(e, n);

    for conv in convergents.iter() {
        let (k, d) = (&conv.numerator, &conv.denominator);
        if k.is_zero() || d.is_zero() {
            continue;
        }

        let ed_m1 = e * d - 1u8;
        if !(&ed_m1 % k).is_zero() {
            continue;
        }
        let phi = &ed_m1 / k;
        if &phi >= n {
            continue;
        }

        let p_plus_q = n - &phi + 1u8;
        let square = &p_plus_q * &p_plus_q;
        let four_n = n << 2;
        if square < four_n {
            continue;
        }
        let discriminant = square - four_n;
        let root = discriminant.sqrt();
        if &root * &root != discriminant {
            continue;
        }

        let p = (&p_plus_q + &root) >> 1;
        let q = (&p_plus_q - &root) >> 1;
        if &p * &q == *n {
            return WienerAttackResult {
                d: Some(d.clone()),
                phi: Some(phi),
                convergents,
                success: true,
            };
        }
    }

    WienerAttackResult {
        d: None,
        phi: None,
        convergents,
        success: false,
    }
}

/// `d < ⌊N^(1/4)⌋ / 3` is the classic vulnerability bound.
pub fn is_vulnerable_to_wiener(public_key: &PublicKey) -> bool {
    let result = wiener_attack(public_key);
    if !result.success {
        return false;
    }

    let threshold = BigUintExt(public_key.modulus()).fourth_root() / 3u8;
    result.d.is_some_and(|d| d < threshold)
}

/// Convergents of the continued-fraction expansion of `e / n`. The Euclid
/// remainder sequence terminates, so the list is finite.
fn continued_fraction(e: &BigUint, n: &BigUint) -> Vec<Convergent> {
    let mut convergents = Vec::new();

    let (mut num0, mut num1) = (BigUint::zero(), BigUint::one());
    let (mut den0, mut den1) = (BigUint::one(), BigUint::zero());
    let (mut x, mut y) = (e.clone(), n.clone());

    while !y.is_zero() {
        let q = &x / &y;

        let num2 = &q * &num1 + &num0;
        let den2 = &q * &den1 + &den0;
        convergents.push(Convergent {
            numerator: num2.clone(),
            denominator: den2.clone(),
        });

        (num0, num1) = (num1, num2);
        (den0, den1) = (den1, den2);
        let r = &x % &y;
        (x, y) = (y, r);
    }

    convergents
}
