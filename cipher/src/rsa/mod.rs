//! RSA key generation, block encryption and the Wiener attack.
//!
//! Key generation is hardened against the two classic structural attacks:
//! primes too close together (Fermat factorization) and a private exponent
//! small enough for the continued-fraction recovery (Wiener).

use crate::primality::{generate_prime, MillerRabin, PrimalityTester, WitnessTest};
use crate::{CancelToken, CipherError};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::{DefaultRand, Rand};
use rayon::prelude::*;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use utils::BigUintExt;

mod key;
pub use key::{PrivateKey, PublicKey};

mod wiener;
pub use wiener::{is_vulnerable_to_wiener, wiener_attack, Convergent, WienerAttackResult};

const PUBLIC_EXPONENT: u32 = 65537;
const MIN_KEY_BITS: usize = 512;

/// The boxed strategy form accepted by [`Rsa`].
pub type DynWitnessTest = Box<dyn WitnessTest + Send + Sync>;

pub struct Rsa {
    tester: PrimalityTester<DynWitnessTest>,
    min_probability: f64,
    bits: usize,
    key: Option<PrivateKey>,
}

impl Rsa {
    /// A generated key pair of `bits` bits, Miller–Rabin at 0.999.
    pub fn new(bits: usize) -> Result<Self, CipherError> {
        let mut rsa = Self::with_tester(Box::new(MillerRabin), 0.999, bits)?;
        rsa.generate_key_pair(&mut DefaultRand::default())?;
        Ok(rsa)
    }

    /// No key material yet; call [`Rsa::generate_key_pair`].
    pub fn with_tester(
        strategy: DynWitnessTest,
        min_probability: f64,
        bits: usize,
    ) -> Result<Self, CipherError> {
        if bits < MIN_KEY_BITS {
            return Err(CipherError::InvalidKeySize {
                target: Some(MIN_KEY_BITS),
                real: bits,
            });
        }

        Ok(Self {
            tester: PrimalityTester::new(strategy),
            min_probability,
            bits,
            key: None,
        })
    }

    pub fn from_private_key(key: PrivateKey) -> Self {
        let bits = key.public_key().modulus().bits() as usize;
        Self {
            tester: PrimalityTester::new(Box::new(MillerRabin)),
            min_probability: 0.999,
            bits,
            key: Some(key),
        }
    }

    /// Replaces any previous key material.
    ///
    /// Restarts until `|p - q| ≥ 2^(bits/2 - 10)`, `gcd(e, φ) = 1` and
    /// `d > ⌊N^(1/4)⌋ / 3`.
    pub fn generate_key_pair<R: Rand>(&mut self, rng: &mut R) -> Result<(), CipherError> {
        let half = self.bits / 2;
        let e = BigUint::from(PUBLIC_EXPONENT);
        let distance = BigUint::one() << (half - 10);

        loop {
            let p = generate_prime(half, &self.tester, self.min_probability, rng)?;
            let q = generate_prime(half, &self.tester, self.min_probability, rng)?;
            if p == q {
                continue;
            }

            // Fermat factorization works when p and q are close
            let gap = if p > q { &p - &q } else { &q - &p };
            if gap < distance {
                continue;
            }

            let n = &p * &q;
            let phi = (&p - 1u8) * (&q - 1u8);
            if !e.gcd(&phi).is_one() {
                continue;
            }

            let Some(d) = BigUintExt(&e).modinv(&phi) else {
                continue;
            };

            // Wiener recovery bound
            if d <= BigUintExt(&n).fourth_root() / 3u8 {
                continue;
            }

            self.key = Some(PrivateKey::new_uncheck(n, e, d, p, q));
            return Ok(());
        }
    }

    pub fn public_key(&self) -> Result<&PublicKey, CipherError> {
        self.private_key().map(PrivateKey::public_key)
    }

    pub fn private_key(&self) -> Result<&PrivateKey, CipherError> {
        self.key.as_ref().ok_or_else(|| {
            CipherError::InvalidPrivateKey("no key pair has been generated".to_string())
        })
    }

    /// Bytes carried by one plaintext block: `⌊(bits(N) - 1) / 8⌋`.
    fn plain_block_len(&self) -> Result<usize, CipherError> {
        let bits = self.public_key()?.modulus().bits() as usize;
        let len = (bits - 1) / 8;
        if len == 0 {
            return Err(CipherError::InvalidBlockSize {
                target: 1,
                real: 0,
            });
        }
        Ok(len)
    }

    /// Bytes of one ciphertext block: `⌈bits(N) / 8⌉`.
    fn cipher_block_len(&self) -> Result<usize, CipherError> {
        let bits = self.public_key()?.modulus().bits() as usize;
        Ok((bits + 7) / 8)
    }

    /// Splits `data` into plaintext blocks, zero-padding the tail, and
    /// emits fixed-width left-zero-padded ciphertext blocks.
    ///
    /// Decryption trims trailing zero bytes, so a plaintext whose final
    /// byte is zero cannot be represented and is rejected up front.
    pub fn encrypt_bytes(
        &self,
        data: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        if data.last() == Some(&0) {
            return Err(CipherError::InvalidDataLength { len: data.len() });
        }

        let plain_len = self.plain_block_len()?;
        let cipher_len = self.cipher_block_len()?;
        let public_key = self.public_key()?;

        let blocks = data
            .par_chunks(plain_len)
            .map(|chunk| {
                token.checkpoint()?;

                let mut padded = vec![0u8; plain_len];
                padded[..chunk.len()].copy_from_slice(chunk);

                let c = public_key.encrypt_int(&BigUint::from_bytes_be(&padded))?;
                Ok(left_pad(&c.to_bytes_be(), cipher_len))
            })
            .collect::<Result<Vec<_>, CipherError>>()?;

        Ok(blocks.concat())
    }

    pub fn decrypt_bytes(
        &self,
        data: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        let plain_len = self.plain_block_len()?;
        let cipher_len = self.cipher_block_len()?;
        if data.len() % cipher_len != 0 {
            return Err(CipherError::InvalidDataLength { len: data.len() });
        }
        let private_key = self.private_key()?;

        let blocks = data
            .par_chunks(cipher_len)
            .map(|chunk| {
                token.checkpoint()?;
                let m = private_key.decrypt_int(&BigUint::from_bytes_be(chunk))?;
                let bytes = m.to_bytes_be();
                if bytes.len() > plain_len {
                    // corrupt block: the integer cannot come from a valid
                    // plaintext block
                    return Err(CipherError::InvalidDataLength { len: data.len() });
                }
                Ok(left_pad(&bytes, plain_len))
            })
            .collect::<Result<Vec<_>, CipherError>>()?;

        let mut out = blocks.concat();
        while out.last() == Some(&0) {
            out.pop();
        }
        Ok(out)
    }

    pub fn encrypt_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        token: &CancelToken,
    ) -> Result<(), CipherError> {
        let data = fs::read(input)?;
        let encrypted = self.encrypt_bytes(&data, token)?;
        fs::write(output, encrypted)?;
        Ok(())
    }

    pub fn decrypt_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        token: &CancelToken,
    ) -> Result<(), CipherError> {
        let data = fs::read(input)?;
        let decrypted = self.decrypt_bytes(&data, token)?;
        fs::write(output, decrypted)?;
        Ok(())
    }

    pub fn encrypt_stream<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        token: &CancelToken,
    ) -> Result<(), CipherError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let encrypted = self.encrypt_bytes(&data, token)?;
        writer.write_all(&encrypted)?;
        Ok(())
    }

    pub fn decrypt_stream<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        token: &CancelToken,
    ) -> Result<(), CipherError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let decrypted = self.decrypt_bytes(&data, token)?;
        writer.write_all(&decrypted)?;
        Ok(())
    }

    pub fn is_vulnerable_to_wiener(&self) -> Result<bool, CipherError> {
        Ok(wiener::is_vulnerable_to_wiener(self.public_key()?))
    }
}

fn left_pad(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    out[width - bytes.len()..].copy_from_slice(bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::{wiener_attack, Rsa};
    use crate::{CancelToken, CipherError};
    use num_bigint::BigUint;
    use num_traits::One;
    use utils::BigUintExt;

    fn generated() -> &'static Rsa {
        use std::sync::OnceLock;
        static RSA: OnceLock<Rsa> = OnceLock::new();
        RSA.get_or_init(|| Rsa::new(512).expect("key generation"))
    }

    #[test]
    fn generated_key_is_sound() {
        let rsa = generated();
        let key = rsa.private_key().unwrap();
        let (p, q) = key.primes();
        let n = key.public_key().modulus();
        let e = key.public_key().exponent();
        let d = key.exponent();

        assert_eq!(&(p * q), n);
        assert_ne!(p, q);

        let phi = (p - 1u8) * (q - 1u8);
        assert!(((e * d) % phi).is_one());

        // Fermat distance: |p - q| >= 2^(bits/2 - 10)
        let gap = if p > q { p - q } else { q - p };
        assert!(gap >= (BigUint::one() << (256 - 10)));

        // Wiener bound: d > floor(N^(1/4)) / 3
        assert!(d > &(BigUintExt(n).fourth_root() / 3u8));
    }

    #[test]
    fn power_identity_on_generated_key() {
        let rsa = generated();
        let key = rsa.private_key().unwrap();

        for m in [0u32, 1, 2, 0xDEAD, 0xFFFF_FFFF] {
            let m = BigUint::from(m);
            let c = key.public_key().encrypt_int(&m).unwrap();
            assert_eq!(key.decrypt_int(&c).unwrap(), m, "m = {m}");
        }
    }

    #[test]
    fn multi_block_codec_round_trips() {
        let rsa = generated();
        let token = CancelToken::new();

        // longer than one plaintext block (63 bytes for a 512-bit modulus)
        let data: Vec<u8> = (1..=200u8).collect();
        let ct = rsa.encrypt_bytes(&data, &token).unwrap();
        assert_eq!(ct.len() % 64, 0, "ciphertext must be block-aligned");
        assert_eq!(rsa.decrypt_bytes(&ct, &token).unwrap(), data);

        // empty plaintext encrypts to nothing
        assert!(rsa.encrypt_bytes(&[], &token).unwrap().is_empty());
    }

    #[test]
    fn trailing_zero_plaintext_is_rejected() {
        let rsa = generated();
        let token = CancelToken::new();
        assert!(matches!(
            rsa.encrypt_bytes(&[1, 2, 3, 0], &token),
            Err(CipherError::InvalidDataLength { len: 4 })
        ));
    }

    #[test]
    fn misaligned_ciphertext_is_rejected() {
        let rsa = generated();
        let token = CancelToken::new();
        assert!(matches!(
            rsa.decrypt_bytes(&[0u8; 65], &token),
            Err(CipherError::InvalidDataLength { len: 65 })
        ));
    }

    #[test]
    fn generated_key_resists_wiener() {
        let rsa = generated();
        let result = wiener_attack(rsa.public_key().unwrap());
        assert!(!result.success);
        assert!(!result.convergents.is_empty());
        assert!(!rsa.is_vulnerable_to_wiener().unwrap());
    }

    #[test]
    fn stream_round_trip_and_cancellation() {
        let rsa = generated();
        let token = CancelToken::new();
        let data = b"rsa streaming payload";

        let mut encrypted = Vec::new();
        rsa.encrypt_stream(&mut &data[..], &mut encrypted, &token)
            .unwrap();
        let mut decrypted = Vec::new();
        rsa.decrypt_stream(&mut encrypted.as_slice(), &mut decrypted, &token)
            .unwrap();
        assert_eq!(decrypted, data);

        let cancelled = CancelToken::new();
        cancelled.cancel();
        assert!(matches!(
            rsa.encrypt_bytes(data, &cancelled),
            Err(CipherError::Cancelled)
        ));
    }

    #[test]
    fn small_key_requests_are_rejected() {
        assert!(matches!(
            Rsa::new(256),
            Err(CipherError::InvalidKeySize {
                target: Some(512),
                real: 256
            })
        ));
    }
}
