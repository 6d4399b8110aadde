//! Modes of operation over block-aligned data.
//!
//! Every mode exposes the same `encrypt`/`decrypt` pair over a padded byte
//! sequence; the IV is supplied per call by the owning context and the
//! plaintext is never mutated in place.

use crate::{BlockCipher, CancelToken, CipherError};

mod padding;
pub use padding::{AnsiX923Padding, BlockPadding, Iso10126Padding, Pkcs7Padding, ZerosPadding};

mod ecb;
pub use ecb::Ecb;

mod cbc;
pub use cbc::Cbc;

mod pcbc;
pub use pcbc::Pcbc;

mod cfb;
pub use cfb::Cfb;

mod ofb;
pub use ofb::Ofb;

mod ctr;
pub use ctr::Ctr;

mod random_delta;
pub use random_delta::RandomDelta;

pub trait BlockMode: Send + Sync {
    /// Whether the IV is consumed. Modes that return `false` ignore it.
    fn requires_iv(&self) -> bool {
        true
    }

    fn encrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError>;

    fn decrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError>;
}

impl<T: BlockMode + ?Sized> BlockMode for Box<T> {
    fn requires_iv(&self) -> bool {
        (**self).requires_iv()
    }

    fn encrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        (**self).encrypt(cipher, data, iv, token)
    }

    fn decrypt(
        &self,
        cipher: &dyn BlockCipher,
        data: &[u8],
        iv: &[u8],
        token: &CancelToken,
    ) -> Result<Vec<u8>, CipherError> {
        (**self).decrypt(cipher, data, iv, token)
    }
}

/// Data handed to a mode must already be block-aligned.
fn check_aligned(data: &[u8], block_size: usize) -> Result<(), CipherError> {
    if block_size == 0 || data.len() % block_size != 0 {
        return Err(CipherError::InvalidDataLength { len: data.len() });
    }
    Ok(())
}

fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}
