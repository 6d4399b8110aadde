use crate::CipherError;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    // n = p * q
    n: BigUint,
    // gcd(e, (p-1)(q-1)) = 1
    e: BigUint,
}

impl PublicKey {
    /// Does not verify that `(n, e)` are sound RSA parameters.
    pub fn new_uncheck(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    pub fn from_be_bytes(n: &[u8], e: &[u8]) -> Self {
        Self {
            n: BigUint::from_bytes_be(n),
            e: BigUint::from_bytes_be(e),
        }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    /// `m^e mod n` for `m < n`.
    pub fn encrypt_int(&self, m: &BigUint) -> Result<BigUint, CipherError> {
        if m >= &self.n {
            return Err(CipherError::MessageTooLarge);
        }
        Ok(m.modpow(&self.e, &self.n))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    pk: PublicKey,
    // e * d = 1 mod (p-1)(q-1)
    d: BigUint,
    p: BigUint,
    q: BigUint,
}

impl PrivateKey {
    /// Does not verify the factorization or the exponent relation.
    pub fn new_uncheck(n: BigUint, e: BigUint, d: BigUint, p: BigUint, q: BigUint) -> Self {
        Self {
            pk: PublicKey::new_uncheck(n, e),
            d,
            p,
            q,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    pub fn exponent(&self) -> &BigUint {
        &self.d
    }

    pub fn primes(&self) -> (&BigUint, &BigUint) {
        (&self.p, &self.q)
    }

    /// `c^d mod n` for `c < n`.
    pub fn decrypt_int(&self, c: &BigUint) -> Result<BigUint, CipherError> {
        if c >= &self.pk.n {
            return Err(CipherError::InvalidDataLength {
                len: (c.bits() as usize + 7) / 8,
            });
        }
        Ok(c.modpow(&self.d, &self.pk.n))
    }
}

#[cfg(test)]
mod tests {
    use super::{PrivateKey, PublicKey};
    use crate::CipherError;
    use num_bigint::BigUint;

    // p = 61, q = 53, n = 3233, e = 17, d = 413
    fn textbook_key() -> PrivateKey {
        PrivateKey::new_uncheck(
            BigUint::from(3233u32),
            BigUint::from(17u32),
            BigUint::from(413u32),
            BigUint::from(61u32),
            BigUint::from(53u32),
        )
    }

    #[test]
    fn power_operations_invert() {
        let key = textbook_key();
        let m = BigUint::from(65u32);

        let c = key.public_key().encrypt_int(&m).unwrap();
        assert_eq!(c, BigUint::from(2790u32));
        assert_eq!(key.decrypt_int(&c).unwrap(), m);
    }

    #[test]
    fn oversized_integers_are_rejected() {
        let key = textbook_key();
        let over = BigUint::from(3233u32);
        assert!(matches!(
            key.public_key().encrypt_int(&over),
            Err(CipherError::MessageTooLarge)
        ));
        assert!(matches!(
            key.decrypt_int(&over),
            Err(CipherError::InvalidDataLength { .. })
        ));
    }

    #[test]
    fn be_bytes_constructor() {
        let pk = PublicKey::from_be_bytes(&[0x0C, 0xA1], &[0x11]);
        assert_eq!(pk.modulus(), &BigUint::from(0x0CA1u32));
        assert_eq!(pk.exponent(), &BigUint::from(0x11u32));
    }
}
