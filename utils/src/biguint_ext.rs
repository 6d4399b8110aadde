use crate::BigIntExt;
use num_bigint::{BigInt, BigUint};
use rand::Rand;
use std::borrow::Borrow;
use std::ops::Deref;

/// Number-theoretic extensions on `BigUint`.
pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// `self * inv = 1 mod modulus`, `None` when `gcd(self, modulus) != 1`.
    pub fn modinv(&self, modulus: &BigUint) -> Option<BigUint> {
        let a = BigInt::from(self.deref() % modulus);
        BigIntExt(a)
            .modinv(&BigInt::from(modulus.clone()))
            .map(|inv| {
                inv.to_biguint()
                    .expect("inverse is reduced modulo a positive modulus")
            })
    }

    /// Uniform random draw from `[0, self)`. `self` must be non-zero.
    pub fn gen_random<R: Rand>(&self, rng: &mut R) -> BigUint {
        let bits = self.bits() as usize;
        let mut buf = vec![0u8; (bits + 7) >> 3];
        let top = if (bits & 7) == 0 { 0xFF } else { (1u8 << (bits & 7)) - 1 };

        loop {
            rng.rand(buf.as_mut_slice());
            if let Some(last) = buf.last_mut() {
                *last &= top;
            }
            let r = BigUint::from_bytes_le(buf.as_slice());
            if &r < self.deref() {
                return r;
            }
        }
    }

    /// `⌊self^(1/4)⌋`.
    pub fn fourth_root(&self) -> BigUint {
        use num_integer::Roots;
        self.deref().sqrt().sqrt()
    }
}
