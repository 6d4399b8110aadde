//! Output Feedback: the keystream `O_i = E(O_{i-1})` never touches the
//! data, so encryption and decryption are the same operation.

use super::{check_aligned, xor, BlockMode};
use crate::{BlockCipher, BlockSized, CancelToken, CipherError};

pub struct Ofb;

impl BlockMode for Ofb {
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
            let mut keystream = Vec::with_capacity(bs);
            cipher.encrypt_block(&feedback, &mut keystream)?;
            out.extend_from_slice(&xor(chunk, &keystream));
            feedback = keystream;
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
        self.encrypt(cipher, data, iv, token)
    }
}
