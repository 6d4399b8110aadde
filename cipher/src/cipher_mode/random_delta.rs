//! RandomDelta: a deterministic cascade where each ciphertext block becomes
//! the delta mixed into the next plaintext block, seeded by the IV.

use super::{check_aligned, xor, BlockMode};
use crate::{BlockCipher, BlockSized, CancelToken, CipherError};

pub struct RandomDelta;

impl BlockMode for RandomDelta {
    fn encrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        let bs = cipher.block_size();
        check_aligned(data, bs)?;

        let mut out = Vec::with_capacity(data.len());
        let mut delta = iv.to_vec();
        for chunk in data.chunks_exact(bs) {
            token.checkpoint()?;
            let mixed = xor(chunk, &delta);
            let mut block = Vec::with_capacity(bs);
            cipher.encrypt_block(&mixed, &mut block)?;
            out.extend_from_slice(&block);
            delta = block;
        }

        Ok(out)
    }

    fn decrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        let bs = cipher.block_size();
        check_aligned(data, bs)?;

        let mut out = Vec::with_capacity(data.len());
        let mut delta = iv;
        for chunk in data.chunks_exact(bs) {
            token.checkpoint()?;
            let mut block = Vec::with_capacity(bs);
            cipher.decrypt_block(chunk, &mut block)?;
            out.extend_from_slice(&xor(&block, delta));
            delta = chunk;
        }

        Ok(out)
    }
}
