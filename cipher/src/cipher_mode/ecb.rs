//! Electronic Codebook: every block stands alone, so both directions fan
//! out across a thread pool.

use super::{check_aligned, BlockMode};
use crate::{BlockCipher, BlockSized, CancelToken, CipherError};
use rayon::prelude::*;

pub struct Ecb;

impl BlockMode for Ecb {
    fn requires_iv(&self) -> bool {
        false
    }

    fn encrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        _iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        let bs = cipher.block_size();
        check_aligned(data, bs)?;

        let blocks = data
            .par_chunks(bs)
            .map(|chunk| {
                token.checkpoint()?;
                let mut out = Vec::with_capacity(bs);
                cipher.encrypt_block(chunk, &mut out)?;
                Ok(out)
            })
            .collect::<Result<Vec<_>, CipherError>>()?;

        Ok(blocks.concat())
    }

    fn decrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        _iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        let bs = cipher.block_size();
        check_aligned(data, bs)?;

        let blocks = data
            .par_chunks(bs)
            .map(|chunk| {
                token.checkpoint()?;
                let mut out = Vec::with_capacity(bs);
                cipher.decrypt_block(chunk, &mut out)?;
                Ok(out)
            })
            .collect::<Result<Vec<_>, CipherError>>()?;

        Ok(blocks.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::Ecb;
    use crate::cipher_mode::BlockMode;
    use crate::{BlockEncrypt, CancelToken, CipherError, Des};

    #[test]
    fn blocks_are_positionally_independent() {
        let des = Des::new(&[0x0Fu8; 8]).unwrap();
        let token = CancelToken::new();

        // two equal plaintext blocks give two equal ciphertext blocks
        let data = [[0x42u8; 8], [0x42u8; 8]].concat();
        let ct = Ecb.encrypt(&des, &data, &[], &token).unwrap();
        assert_eq!(ct[..8], ct[8..16]);

        // each ciphertext block is exactly the single-block encryption
        let mut single = Vec::new();
        des.encrypt_block(&data[..8], &mut single).unwrap();
        assert_eq!(ct[..8], single[..]);
    }

    #[test]
    fn empty_input_is_fine() {
        let des = Des::new(&[0u8; 8]).unwrap();
        let token = CancelToken::new();
        assert!(Ecb.encrypt(&des, &[], &[], &token).unwrap().is_empty());
    }

    #[test]
    fn decrypt_inverts_over_many_blocks() {
        let des = Des::new(&[0x99u8; 8]).unwrap();
        let token = CancelToken::new();
        let data: Vec<u8> = (0..1024u32).map(|i| (i % 251) as u8).collect();

        let ct = Ecb.encrypt(&des, &data, &[], &token).unwrap();
        assert_eq!(Ecb.decrypt(&des, &ct, &[], &token).unwrap(), data);
    }

    #[test]
    fn propagates_block_errors() {
        let des = Des::new(&[0u8; 8]).unwrap();
        let token = CancelToken::new();
        assert!(matches!(
            Ecb.encrypt(&des, &[0u8; 12], &[], &token),
            Err(CipherError::InvalidDataLength { len: 12 })
        ));
    }
}
