//! GF(2⁸) arithmetic over a caller-chosen irreducible modulus.
//!
//! A byte encodes a polynomial over GF(2) with coefficients in bit
//! positions. The modulus byte holds the low eight coefficients of a
//! degree-8 polynomial; the leading `x⁸` term is implicit.

use crate::CipherError;

/// Polynomial addition is XOR.
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// `a * b` reduced by `x⁸ + modulus`. Fails when the modulus is reducible.
pub fn mul(a: u8, b: u8, modulus: u8) -> Result<u8, CipherError> {
    if !is_irreducible(modulus) {
        return Err(CipherError::ReduciblePolynomial);
    }
    Ok(mul_reduce(a, b, modulus))
}

/// Shift-and-xor multiply with reduction by the (already validated) modulus.
/// Conditional selects are masked rather than branched.
pub(crate) fn mul_reduce(a: u8, b: u8, modulus: u8) -> u8 {
    let (mut a, mut b, mut acc) = (a, b, 0u8);
    for _ in 0..8 {
        acc ^= a & (b & 1).wrapping_neg();
        let carry = a >> 7;
        a <<= 1;
        a ^= modulus & carry.wrapping_neg();
        b >>= 1;
    }
    acc
}

/// `a⁻¹` modulo `x⁸ + modulus` by the extended Euclidean algorithm over
/// GF(2)[x]. Zero has no inverse.
pub fn inv(a: u8, modulus: u8) -> Result<u8, CipherError> {
    if a == 0 {
        return Err(CipherError::InvalidParameters(
            "zero has no inverse in GF(256)".to_string(),
        ));
    }
    if !is_irreducible(modulus) {
        return Err(CipherError::ReduciblePolynomial);
    }
    Ok(inv_reduce(a, modulus))
}

pub(crate) fn inv_reduce(a: u8, modulus: u8) -> u8 {
    let full_mod = 0x100u16 | modulus as u16;
    let (mut r0, mut r1) = (full_mod, a as u16);
    let (mut t0, mut t1) = (0u16, 1u16);

    while r1 != 0 {
        let q = poly_div(r0, r1);
        (r0, r1) = (r1, r0 ^ poly_mul(q, r1));
        (t0, t1) = (t1, t0 ^ poly_mul(q, t1));
    }

    t0 as u8
}

/// Trial division by every polynomial of degree 1..=4. `poly` names the low
/// coefficients of a degree-8 polynomial.
pub fn is_irreducible(poly: u8) -> bool {
    let full = 0x100u16 | poly as u16;
    for degree in 1..=4usize {
        for divisor in (1u16 << degree)..(1u16 << (degree + 1)) {
            if poly_rem(full, divisor) == 0 {
                return false;
            }
        }
    }
    true
}

/// Every degree-8 modulus byte that passes [`is_irreducible`].
pub fn all_irreducible() -> Vec<u8> {
    (0u16..256)
        .filter(|&p| is_irreducible(p as u8))
        .map(|p| p as u8)
        .collect()
}

/// Irreducible factors of an arbitrary GF(2)[x] polynomial, in increasing
/// degree. `0` and `1` have no factors.
pub fn factorize(poly: u16) -> Vec<u16> {
    if poly < 2 {
        return Vec::new();
    }

    let mut poly = poly;
    let mut factors = Vec::new();

    // increasing degree, so every divisor that still divides is irreducible
    let mut degree = 1;
    while degree <= poly_degree(poly) {
        for divisor in (1u16 << degree)..(1u16 << (degree + 1)) {
            while poly > 1 && poly_rem(poly, divisor) == 0 {
                factors.push(divisor);
                poly = poly_div(poly, divisor);
            }
        }
        degree += 1;
    }

    if poly > 1 {
        factors.push(poly);
    }

    factors
}

fn poly_degree(p: u16) -> usize {
    (15 - p.leading_zeros().min(15)) as usize
}

fn poly_mul(a: u16, b: u16) -> u16 {
    let (mut a, mut b, mut acc) = (a, b, 0u16);
    while b != 0 {
        if b & 1 == 1 {
            acc ^= a;
        }
        a <<= 1;
        b >>= 1;
    }
    acc
}

fn poly_rem(a: u16, b: u16) -> u16 {
    let mut a = a;
    let deg_b = poly_degree(b);
    while a != 0 {
        let deg_a = poly_degree(a);
        if deg_a < deg_b {
            break;
        }
        a ^= b << (deg_a - deg_b);
    }
    a
}

fn poly_div(a: u16, b: u16) -> u16 {
    let (mut a, mut quotient) = (a, 0u16);
    let deg_b = poly_degree(b);
    while a != 0 {
        let deg_a = poly_degree(a);
        if deg_a < deg_b {
            break;
        }
        let shift = deg_a - deg_b;
        quotient ^= 1 << shift;
        a ^= b << shift;
    }
    quotient
}
