//! Counter mode: `C_i = P_i ⊕ E(IV + i)`. The counter blocks are known up
//! front, so the keystream fans out across a thread pool.

use super::{check_aligned, xor, BlockMode};
use crate::{BlockCipher, BlockSized, CancelToken, CipherError};
use rayon::prelude::*;

pub struct Ctr;

/// Rightmost-byte increment: `+1` propagates toward the front while bytes
/// wrap to zero, and a counter of all `0xFF` wraps around to all zero.
pub(crate) fn increment(counter: &mut [u8]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

impl Ctr {
    fn keystream(
        &self,
        cipher: &dyn BlockCipher,
        iv: &[u8],
        blocks: usize,
        token: &CancelToken,
    ) -> Result<Vec<Vec<u8>>, CipherError> {
        let mut counter = iv.to_vec();
        let mut counters = Vec::with_capacity(blocks);
        for _ in 0..blocks {
            counters.push(counter.clone());
            increment(&mut counter);
        }

        counters
            .par_iter()
            .map(|block| {
                token.checkpoint()?;
                let mut out = Vec::with_capacity(block.len());
                cipher.encrypt_block(block, &mut out)?;
                Ok(out)
            })
            .collect()
    }

    fn apply(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        let bs = cipher.block_size();
        check_aligned(data, bs)?;

        let keystream = self.keystream(cipher, iv, data.len() / bs, token)?;
        let mut out = Vec::with_capacity(data.len());
        for (chunk, ks) in data.chunks_exact(bs).zip(keystream.iter()) {
            out.extend_from_slice(&xor(chunk, ks));
        }

        Ok(out)
    }
}

impl BlockMode for Ctr {
    fn encrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        self.apply(cipher, data, iv, token)
    }

    fn decrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        self.apply(cipher, data, iv, token)
    }
}
