//! Unauthenticated Diffie–Hellman key agreement over the primality
//! substrate.

use crate::primality::{generate_prime, PrimalityTester, WitnessTest};
use crate::CipherError;
use num_bigint::BigUint;
use rand::Rand;
use serde::{Deserialize, Serialize};
use utils::BigUintExt;

/// The group: a prime modulus and the generator 2.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    p: BigUint,
    g: BigUint,
}

impl Parameters {
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    pub fn generator(&self) -> &BigUint {
        &self.g
    }
}

#[derive(Clone, Debug)]
pub struct PrivateKey {
    params: Parameters,
    x: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    params: Parameters,
    // y = g^x mod p
    y: BigUint,
}

impl PublicKey {
    pub fn value(&self) -> &BigUint {
        &self.y
    }
}

/// A prime modulus of `bits` bits tested by the caller's strategy, with
/// generator 2.
pub fn generate_parameters<T: WitnessTest, R: Rand>(
    bits: usize,
    tester: &PrimalityTester<T>,
    min_probability: f64,
    rng: &mut R,
) -> Result<Parameters, CipherError> {
    if bits < 16 {
        return Err(CipherError::InvalidParameters(format!(
            "modulus of {bits} bits is too small"
        )));
    }

    Ok(Parameters {
        p: generate_prime(bits, tester, min_probability, rng)?,
        g: BigUint::from(2u8),
    })
}

/// Key pair with `x` drawn uniformly from `(1, p - 1)`.
pub fn generate_key<R: Rand>(
    params: &Parameters,
    rng: &mut R,
) -> Result<(PrivateKey, PublicKey), CipherError> {
    if params.p < BigUint::from(5u8) || params.g < BigUint::from(2u8) {
        return Err(CipherError::InvalidParameters(
            "degenerate group parameters".to_string(),
        ));
    }

    // x in [2, p-2]
    let bound = &params.p - 3u8;
    let x = BigUintExt(&bound).gen_random(rng) + 2u8;
    let y = params.g.modpow(&x, &params.p);

    Ok((
        PrivateKey {
            params: params.clone(),
            x,
        },
        PublicKey {
            params: params.clone(),
            y,
        },
    ))
}

/// `peer_y^x mod p`. The peer value must satisfy `1 < y < p`.
pub fn compute_shared_secret(
    private_key: &PrivateKey,
    peer: &PublicKey,
) -> Result<BigUint, CipherError> {
    if private_key.x < BigUint::from(2u8) {
        return Err(CipherError::InvalidPrivateKey(
            "private value out of range".to_string(),
        ));
    }
    if private_key.params != peer.params {
        return Err(CipherError::ParameterMismatch);
    }
    if peer.y <= BigUint::from(1u8) || peer.y >= private_key.params.p {
        return Err(CipherError::InvalidPublicKey(
            "peer value out of (1, p)".to_string(),
        ));
    }

    Ok(peer.y.modpow(&private_key.x, &private_key.params.p))
}
