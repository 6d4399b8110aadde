//! Triple-DES in the FIPS 46-3 EDE composition.

use crate::{CipherError, Des};

pub struct TripleDes {
    des1: Des,
    des2: Des,
    des3: Des,
}

impl TripleDes {
    pub const BLOCK_SIZE: usize = 8;

    /// Accepts a 16-byte (two-key, `k3 = k1`) or 24-byte (three-key) key.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        let (k1, k2, k3) = match key.len() {
            16 => (&key[0..8], &key[8..16], &key[0..8]),
            24 => (&key[0..8], &key[8..16], &key[16..24]),
            real => {
                return Err(CipherError::InvalidKeySize { target: None, real });
            }
        };

        Ok(Self {
            des1: Des::new(k1)?,
            des2: Des::new(k2)?,
            des3: Des::new(k3)?,
        })
    }

    /// `E_k3(D_k2(E_k1(x)))`
    pub(crate) fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        let state = self.des1.encrypt(block)?;
        let state = self.des2.decrypt(&state)?;
        self.des3.encrypt(&state)
    }

    /// `D_k1(E_k2(D_k3(x)))`
    pub(crate) fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        let state = self.des3.decrypt(block)?;
        let state = self.des2.encrypt(&state)?;
        self.des1.decrypt(&state)
    }
}

#[cfg(feature = "sec-zeroize")]
impl zeroize::Zeroize for TripleDes {
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.des1);
        zeroize::Zeroize::zeroize(&mut self.des2);
        zeroize::Zeroize::zeroize(&mut self.des3);
    }
}
