//! Cipher Block Chaining: `C_i = E(P_i ⊕ C_{i-1})`, `C_0 = IV`.

use super::{check_aligned, xor, BlockMode};
use crate::{BlockCipher, BlockSized, CancelToken, CipherError};

pub struct Cbc;

impl BlockMode for Cbc {
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
        let mut prev = iv.to_vec();
        for chunk in data.chunks_exact(bs) {
            token.checkpoint()?;
            let mixed = xor(chunk, &prev);
            let mut block = Vec::with_capacity(bs);
            cipher.encrypt_block(&mixed, &mut block)?;
            out.extend_from_slice(&block);
            prev = block;
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
        let mut prev = iv;
        for chunk in data.chunks_exact(bs) {
            token.checkpoint()?;
            let mut block = Vec::with_capacity(bs);
            cipher.decrypt_block(chunk, &mut block)?;
            out.extend_from_slice(&xor(&block, prev));
            prev = chunk;
        }

        Ok(out)
    }
}
