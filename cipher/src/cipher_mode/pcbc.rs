//! Propagating CBC: the feedback is `P_i ⊕ C_i`, seeded by the IV.

use super::{check_aligned, xor, BlockMode};
use crate::{BlockCipher, BlockSized, CancelToken, CipherError};

pub struct Pcbc;

impl BlockMode for Pcbc {
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
        let mut feedback = iv.to_vec();
        for chunk in data.chunks_exact(bs) {
            token.checkpoint()?;
            let mixed = xor(chunk, &feedback);
            let mut block = Vec::with_capacity(bs);
            cipher.encrypt_block(&mixed, &mut block)?;
            feedback = xor(chunk, &block);
            out.extend_from_slice(&block);
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
        let mut feedback = iv.to_vec();
        for chunk in data.chunks_exact(bs) {
            token.checkpoint()?;
            let mut block = Vec::with_capacity(bs);
            cipher.decrypt_block(chunk, &mut block)?;
            let plain = xor(&block, &feedback);
            feedback = xor(&plain, chunk);
            out.extend_from_slice(&plain);
        }

        Ok(out)
    }
}
