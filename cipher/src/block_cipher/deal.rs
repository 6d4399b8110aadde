//! DEAL: a 128-bit-block Feistel cipher whose round function is DES.

use crate::feistel::{Feistel, KeySchedule, RoundFunction};
use crate::{CipherError, Des};

const ROUNDS: usize = 6;

pub struct Deal {
    feistel: Feistel<DesAdapter>,
}

impl Deal {
    pub const BLOCK_SIZE: usize = 16;
    pub const KEY_SIZE: usize = 24;

    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        Ok(Self {
            feistel: Feistel::new(&DealKeySchedule, key, DesAdapter, Self::BLOCK_SIZE)?,
        })
    }

    pub(crate) fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.feistel.encrypt(block)
    }

    pub(crate) fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.feistel.decrypt(block)
    }
}

#[cfg(feature = "sec-zeroize")]
impl zeroize::Zeroize for Deal {
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.feistel);
    }
}

struct DealKeySchedule;

impl KeySchedule for DealKeySchedule {
    /// Round `i` reuses 8-byte slice `i mod 3` of the 192-bit key.
    fn round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>, CipherError> {
        if key.len() != Deal::KEY_SIZE {
            return Err(CipherError::InvalidKeySize {
                target: Some(Deal::KEY_SIZE),
                real: key.len(),
            });
        }

        Ok((0..ROUNDS)
            .map(|i| key[(i % 3) * 8..(i % 3 + 1) * 8].to_vec())
            .collect())
    }
}

/// Runs a full DES encryption as the round function, rekeying per call.
struct DesAdapter;

impl RoundFunction for DesAdapter {
    fn transform(&self, half: &[u8], round_key: &[u8]) -> Result<Vec<u8>, CipherError> {
        Des::new(round_key)?.encrypt(half)
    }
}
