use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Euclid, One, Signed, ToPrimitive, Zero};
use std::borrow::Borrow;
use std::ops::Deref;

/// Number-theoretic extensions on `BigInt`.
pub struct BigIntExt<T: Borrow<BigInt>>(pub T);

impl<T: Borrow<BigInt>> Deref for BigIntExt<T> {
    type Target = BigInt;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigInt>> BigIntExt<T> {
    /// `self * inv = 1 mod modulus.abs()`, `None` when the inverse does not exist.
    pub fn modinv(&self, modulus: &BigInt) -> Option<BigInt> {
        let n = modulus.abs();
        let a = self.rem_euclid(&n);
        let g = a.extended_gcd(&n);
        g.gcd.is_one().then(|| g.x.rem_euclid(&n))
    }

    /// Jacobi symbol `(self | b)`. `None` when `b` is zero.
    ///
    /// Negative `b` follows the `(a | -b) = (a | b) * sign(a)` convention.
    pub fn jacobi(&self, b: &BigInt) -> Option<isize> {
        if b.is_zero() {
            return None;
        }

        let (mut a, mut b) = (self.deref().clone(), b.clone());
        let mut j = 1isize;
        if b.is_negative() {
            b = -b;
            if a.is_negative() {
                j = -j;
            }
        }

        loop {
            if b.is_one() {
                return Some(j);
            }
            a = a.rem_euclid(&b);
            if a.is_zero() {
                return Some(0);
            }

            // (2 | b) = -1 iff b = ±3 mod 8
            let s = a.trailing_zeros().unwrap_or(0);
            if (s & 1) == 1 {
                let b_mod8 = (&b % 8u8).to_u64().unwrap_or(0);
                if b_mod8 == 3 || b_mod8 == 5 {
                    j = -j;
                }
            }
            a >>= s;

            // quadratic reciprocity for odd a, b
            if (&a % 4u8) == BigInt::from(3u8) && (&b % 4u8) == BigInt::from(3u8) {
                j = -j;
            }
            std::mem::swap(&mut a, &mut b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BigIntExt;
    use num_bigint::BigInt;
    use num_traits::One;

    #[test]
    fn jacobi() {
        // (a, n, expected)
        let cases: [(i64, i64, isize); 14] = [
            (1001, 9907, -1),
            (19, 45, 1),
            (6, 9, 0),
            (0, 1, 1),
            (1, 5, 1),
            (2, 5, -1),
            (3, 5, -1),
            (5, 5, 0),
            (6, 5, 1),
            (2, 15, 1),
            (7, 15, -1),
            (8, 15, 1),
            (1236, 20003, 1),
            (-2, 5, -1),
        ];

        for (a, n, expected) in cases {
            let j = BigIntExt(BigInt::from(a)).jacobi(&BigInt::from(n));
            assert_eq!(j, Some(expected), "jacobi({a}, {n})");
        }

        assert_eq!(BigIntExt(BigInt::from(3)).jacobi(&BigInt::from(0)), None);
    }

    #[test]
    fn modinv() {
        let cases: [(i64, i64); 4] = [(3, 7), (-10, 13), (10, -13), (-17, -13)];
        for (a, n) in cases {
            let (a, n) = (BigInt::from(a), BigInt::from(n));
            let inv = BigIntExt(&a).modinv(&n).expect("inverse exists");
            use num_traits::{Euclid, Signed};
            let nr = n.abs();
            let prod = (a.rem_euclid(&nr) * &inv) % &nr;
            assert!(prod.is_one(), "{a} * {inv} != 1 mod {nr}");
        }
    }
}
