//! Generic Feistel network over pluggable key-schedule and round-function
//! capabilities.

use crate::CipherError;

/// Expands a master key into the ordered per-round keys.
pub trait KeySchedule {
    fn round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>, CipherError>;
}

/// Mixes one half-block with a round key.
pub trait RoundFunction {
    fn transform(&self, half: &[u8], round_key: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// The L/R round loop. Each encryption round maps `(L, R)` to
/// `(R, L ⊕ F(R, k))`; the output is `L ‖ R` with no final swap, so
/// `decrypt` (same rounds, keys reversed, mirrored update) is its exact
/// inverse. No padding, IV handling or byte-order conversion happens here.
pub struct Feistel<F> {
    round_keys: Vec<Vec<u8>>,
    f: F,
    block_size: usize,
}

impl<F: RoundFunction> Feistel<F> {
    pub fn new<S: KeySchedule>(
        schedule: &S,
        key: &[u8],
        f: F,
        block_size: usize,
    ) -> Result<Self, CipherError> {
        if block_size == 0 || block_size % 2 != 0 {
            return Err(CipherError::InvalidBlockSize {
                target: block_size.max(2),
                real: block_size,
            });
        }

        Ok(Self {
            round_keys: schedule.round_keys(key)?,
            f,
            block_size,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        let (mut l, mut r) = self.split(block)?;

        for key in self.round_keys.iter() {
            let f_out = self.f.transform(&r, key)?;
            let next_r: Vec<u8> = l.iter().zip(f_out.iter()).map(|(x, y)| x ^ y).collect();
            l = std::mem::replace(&mut r, next_r);
        }

        l.extend_from_slice(&r);
        Ok(l)
    }

    pub fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        let (mut l, mut r) = self.split(block)?;

        for key in self.round_keys.iter().rev() {
            let f_out = self.f.transform(&l, key)?;
            let next_l: Vec<u8> = r.iter().zip(f_out.iter()).map(|(x, y)| x ^ y).collect();
            r = std::mem::replace(&mut l, next_l);
        }

        l.extend_from_slice(&r);
        Ok(l)
    }

    fn split(&self, block: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CipherError> {
        if block.len() != self.block_size {
            return Err(CipherError::InvalidBlockSize {
                target: self.block_size,
                real: block.len(),
            });
        }

        let half = block.len() / 2;
        Ok((block[..half].to_vec(), block[half..].to_vec()))
    }
}

#[cfg(feature = "sec-zeroize")]
impl<F> zeroize::Zeroize for Feistel<F> {
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.round_keys);
    }
}
