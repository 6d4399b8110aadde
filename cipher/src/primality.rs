//! Probabilistic primality testing.
//!
//! One driver owns the trivial cases, the iteration count and the witness
//! sampling; the per-witness predicate is a capability supplied by the
//! caller. The per-iteration error rate is 1/2 for Fermat and
//! Solovay–Strassen and 1/4 for Miller–Rabin.

use crate::CipherError;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rand;
use utils::{BigIntExt, BigUintExt};

/// A single-witness compositeness check.
pub trait WitnessTest {
    /// Probability that one witness passes a composite `n`.
    fn error_rate(&self) -> f64;

    /// `true` when `a` does not expose `n` as composite. `n` is odd and at
    /// least 5, `a` lies in `[2, n-2]`.
    fn witness(&self, n: &BigUint, a: &BigUint) -> bool;
}

impl<T: WitnessTest + ?Sized> WitnessTest for Box<T> {
    fn error_rate(&self) -> f64 {
        (**self).error_rate()
    }

    fn witness(&self, n: &BigUint, a: &BigUint) -> bool {
        (**self).witness(n, a)
    }
}

/// Fermat test: `a^(n-1) = 1 mod n`.
pub struct Fermat;

impl WitnessTest for Fermat {
    fn error_rate(&self) -> f64 {
        0.5
    }

    fn witness(&self, n: &BigUint, a: &BigUint) -> bool {
        a.modpow(&(n - 1u8), n).is_one()
    }
}

/// Solovay–Strassen test: `a^((n-1)/2) = (a | n) mod n` for `a` coprime to `n`.
pub struct SolovayStrassen;

impl WitnessTest for SolovayStrassen {
    fn error_rate(&self) -> f64 {
        0.5
    }

    fn witness(&self, n: &BigUint, a: &BigUint) -> bool {
        if !a.gcd(n).is_one() {
            return false;
        }

        let jacobi = BigIntExt(BigInt::from(a.clone()))
            .jacobi(&BigInt::from(n.clone()))
            .unwrap_or(0);
        let expected = match jacobi {
            1 => BigUint::one(),
            -1 => n - 1u8,
            _ => return false,
        };

        a.modpow(&((n - 1u8) >> 1), n) == expected
    }
}

/// Miller–Rabin test on `n - 1 = 2^r * d`.
pub struct MillerRabin;

impl WitnessTest for MillerRabin {
    fn error_rate(&self) -> f64 {
        0.25
    }

    fn witness(&self, n: &BigUint, a: &BigUint) -> bool {
        let n_m1 = n - 1u8;
        let r = n_m1.trailing_zeros().unwrap_or(0);
        let d = &n_m1 >> r;

        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_m1 {
            return true;
        }

        for _ in 1..r {
            x = &x * &x % n;
            if x == n_m1 {
                return true;
            }
        }

        false
    }
}

/// Template driver around a [`WitnessTest`] strategy.
pub struct PrimalityTester<T> {
    strategy: T,
}

impl<T: WitnessTest> PrimalityTester<T> {
    pub fn new(strategy: T) -> Self {
        Self { strategy }
    }

    /// Reports `n` probably prime with confidence at least `min_probability`.
    pub fn is_probably_prime<R: Rand>(
        &self,
        n: &BigUint,
        min_probability: f64,
        rng: &mut R,
    ) -> bool {
        let two = BigUint::from(2u8);
        if n < &two {
            return false;
        }
        if *n == two || *n == BigUint::from(3u8) {
            return true;
        }
        if n.is_even() {
            return false;
        }

        let rounds = iterations(min_probability, self.strategy.error_rate());
        // draws land in [2, n-2]
        let bound = n - 3u8;
        for _ in 0..rounds {
            let a = BigUintExt(&bound).gen_random(rng) + 2u8;
            if !self.strategy.witness(n, &a) {
                return false;
            }
        }

        true
    }
}

/// `k = ⌈log(1 - p_min) / log(p_err)⌉`, at least one round.
fn iterations(min_probability: f64, error_rate: f64) -> usize {
    let k = ((1.0 - min_probability).ln() / error_rate.ln()).ceil();
    if k.is_finite() && k > 1.0 {
        k as usize
    } else {
        1
    }
}

/// Generates a probable prime of exactly `bits` bits: bit 0 and bit
/// `bits - 1` are forced, candidates failing a small-prime trial division
/// are skipped before the tester runs.
pub fn generate_prime<T: WitnessTest, R: Rand>(
    bits: usize,
    tester: &PrimalityTester<T>,
    min_probability: f64,
    rng: &mut R,
) -> Result<BigUint, CipherError> {
    if bits < 2 {
        return Err(CipherError::InvalidParameters(
            "prime size must be at least 2 bits".to_string(),
        ));
    }

    const SMALL_PRIMES: [u32; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

    let mut buf = vec![0u8; (bits + 7) >> 3];
    let top = if (bits & 7) == 0 { 0xFF } else { (1u8 << (bits & 7)) - 1 };

    loop {
        rng.rand(buf.as_mut_slice());
        if let Some(last) = buf.last_mut() {
            *last &= top;
        }

        let mut candidate = BigUint::from_bytes_le(buf.as_slice());
        candidate.set_bit(0, true);
        candidate.set_bit(bits as u64 - 1, true);

        if bits > 6
            && SMALL_PRIMES
                .iter()
                .any(|&p| (&candidate % p).is_zero() && candidate != BigUint::from(p))
        {
            continue;
        }

        if tester.is_probably_prime(&candidate, min_probability, rng) {
            return Ok(candidate);
        }
    }
}
