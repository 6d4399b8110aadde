use crate::CipherError;

pub trait BlockSized {
    fn block_size(&self) -> usize;
}

pub trait BlockEncrypt: BlockSized {
    fn encrypt_block(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>)
        -> Result<(), CipherError>;
}

pub trait BlockDecrypt: BlockSized {
    fn decrypt_block(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>)
        -> Result<(), CipherError>;
}

pub trait BlockCipher: BlockEncrypt + BlockDecrypt + Send + Sync {}

impl<T> BlockCipher for T where T: BlockEncrypt + BlockDecrypt + Send + Sync {}

impl<T: BlockSized + ?Sized> BlockSized for Box<T> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }
}

impl<T: BlockEncrypt + ?Sized> BlockEncrypt for Box<T> {
    fn encrypt_block(
        &self,
        plaintext: &[u8],
        ciphertext: &mut Vec<u8>,
    ) -> Result<(), CipherError> {
        (**self).encrypt_block(plaintext, ciphertext)
    }
}

impl<T: BlockDecrypt + ?Sized> BlockDecrypt for Box<T> {
    fn decrypt_block(
        &self,
        ciphertext: &[u8],
        plaintext: &mut Vec<u8>,
    ) -> Result<(), CipherError> {
        (**self).decrypt_block(ciphertext, plaintext)
    }
}

mod des;
pub use des::Des;

mod deal;
pub use deal::Deal;

mod tripledes;
pub use tripledes::TripleDes;

mod rc6;
pub use rc6::Rc6;

mod rijndael;
pub use rijndael::Rijndael;

macro_rules! impl_block_cipher {
    ($($NAME: ty => $BLOCK: expr),+ $(,)?) => {$(
        impl BlockSized for $NAME {
            fn block_size(&self) -> usize {
                $BLOCK
            }
        }

        impl BlockEncrypt for $NAME {
            fn encrypt_block(
                &self,
                plaintext: &[u8],
                ciphertext: &mut Vec<u8>,
            ) -> Result<(), CipherError> {
                let block = self.encrypt(plaintext)?;
                ciphertext.extend_from_slice(&block);
                Ok(())
            }
        }

        impl BlockDecrypt for $NAME {
            fn decrypt_block(
                &self,
                ciphertext: &[u8],
                plaintext: &mut Vec<u8>,
            ) -> Result<(), CipherError> {
                let block = self.decrypt(ciphertext)?;
                plaintext.extend_from_slice(&block);
                Ok(())
            }
        }
    )+};
}

impl_block_cipher!(
    Des => Des::BLOCK_SIZE,
    Deal => Deal::BLOCK_SIZE,
    TripleDes => TripleDes::BLOCK_SIZE,
    Rc6 => Rc6::BLOCK_SIZE,
);

impl BlockSized for Rijndael {
    fn block_size(&self) -> usize {
        Rijndael::block_size(self)
    }
}

impl BlockEncrypt for Rijndael {
    fn encrypt_block(
        &self,
        plaintext: &[u8],
        ciphertext: &mut Vec<u8>,
    ) -> Result<(), CipherError> {
        let block = self.encrypt(plaintext)?;
        ciphertext.extend_from_slice(&block);
        Ok(())
    }
}

impl BlockDecrypt for Rijndael {
    fn decrypt_block(
        &self,
        ciphertext: &[u8],
        plaintext: &mut Vec<u8>,
    ) -> Result<(), CipherError> {
        let block = self.decrypt(ciphertext)?;
        plaintext.extend_from_slice(&block);
        Ok(())
    }
}
