//! The cipher context binds one keyed block cipher to a mode, a padding
//! scheme and an IV, and runs byte, file and stream operations over it.

use crate::cipher_mode::{BlockMode, BlockPadding};
use crate::{BlockCipher, CancelToken, CipherError};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// A context is single-keyed and immutable once constructed; it may be
/// shared for reading but one operation at a time is the caller's business.
pub struct CipherContext<C, M, P> {
    cipher: C,
    mode: M,
    padding: P,
    iv: Vec<u8>,
}

impl<C, M, P> CipherContext<C, M, P>
where
    C: BlockCipher,
    M: BlockMode,
    P: BlockPadding,
{
    /// Validates the IV length against the cipher's block size when the
    /// mode consumes an IV; modes that do not consume one ignore it.
    pub fn new(cipher: C, mode: M, padding: P, iv: Vec<u8>) -> Result<Self, CipherError> {
        if mode.requires_iv() && iv.len() != cipher.block_size() {
            return Err(CipherError::InvalidIVSize {
                target: cipher.block_size(),
                real: iv.len(),
            });
        }

        Ok(Self {
            cipher,
            mode,
            padding,
            iv,
        })
    }

    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    pub fn encrypt_bytes(&self, data: &[u8], token: &CancelToken) -> Result<Vec<u8>, CipherError> {
        let mut buf = data.to_vec();
        self.padding.pad(&mut buf);
        self.mode.encrypt(&self.cipher, &buf, &self.iv, token)
    }

    pub fn decrypt_bytes(&self, data: &[u8], token: &CancelToken) -> Result<Vec<u8>, CipherError> {
        let mut buf = self.mode.decrypt(&self.cipher, data, &self.iv, token)?;
        self.padding.unpad(&mut buf)?;
        Ok(buf)
    }

    /// The output file holds the raw ciphertext stream; IV and algorithm
    /// travel out-of-band.
    pub fn encrypt_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        token: &CancelToken,
    ) -> Result<(), CipherError> {
        let data = fs::read(input)?;
        let encrypted = self.encrypt_bytes(&data, token)?;
        fs::write(output, encrypted)?;
        Ok(())
    }

    pub fn decrypt_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        token: &CancelToken,
    ) -> Result<(), CipherError> {
        let data = fs::read(input)?;
        let decrypted = self.decrypt_bytes(&data, token)?;
        fs::write(output, decrypted)?;
        Ok(())
    }

    pub fn encrypt_stream<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        token: &CancelToken,
    ) -> Result<(), CipherError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let encrypted = self.encrypt_bytes(&data, token)?;
        writer.write_all(&encrypted)?;
        Ok(())
    }

    pub fn decrypt_stream<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        token: &CancelToken,
    ) -> Result<(), CipherError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let decrypted = self.decrypt_bytes(&data, token)?;
        writer.write_all(&decrypted)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CipherContext;
    use crate::cipher_mode::{
        AnsiX923Padding, BlockMode, Cbc, Cfb, Ctr, Ecb, Iso10126Padding, Ofb, Pcbc, Pkcs7Padding,
        RandomDelta, ZerosPadding,
    };
    use crate::{CancelToken, CipherError, Deal, Des, Rc6, Rijndael, TripleDes};

    const DES_KEY: [u8; 8] = [0x13, 0x34, 0x57, 0x79, 0x9B, 0xBC, 0xDF, 0xF1];
    const MESSAGE: &[u8] = b"Test message for encryption!";

    fn modes() -> Vec<(&'static str, Box<dyn BlockMode>)> {
        vec![
            ("ECB", Box::new(Ecb)),
            ("CBC", Box::new(Cbc)),
            ("PCBC", Box::new(Pcbc)),
            ("CFB", Box::new(Cfb)),
            ("OFB", Box::new(Ofb)),
            ("CTR", Box::new(Ctr)),
            ("RandomDelta", Box::new(RandomDelta)),
        ]
    }

    #[test]
    fn des_cbc_pkcs7_chain() {
        let ctx = CipherContext::new(
            Des::new(&DES_KEY).unwrap(),
            Cbc,
            Pkcs7Padding::new(Des::BLOCK_SIZE),
            vec![0u8; 8],
        )
        .unwrap();
        let token = CancelToken::new();

        let ct = ctx.encrypt_bytes(MESSAGE, &token).unwrap();
        assert_ne!(&ct[..MESSAGE.len().min(ct.len())], MESSAGE);
        assert_eq!(ct.len() % 8, 0);
        assert_eq!(ctx.decrypt_bytes(&ct, &token).unwrap(), MESSAGE);
    }

    #[test]
    fn every_mode_round_trips_through_the_context() {
        let token = CancelToken::new();
        for (name, mode) in modes() {
            let ctx = CipherContext::new(
                Des::new(&DES_KEY).unwrap(),
                mode,
                Pkcs7Padding::new(Des::BLOCK_SIZE),
                vec![0u8; 8],
            )
            .unwrap();

            let ct = ctx.encrypt_bytes(MESSAGE, &token).unwrap();
            assert_eq!(
                ctx.decrypt_bytes(&ct, &token).unwrap(),
                MESSAGE,
                "{name} chain failed"
            );
        }
    }

    #[test]
    fn every_cipher_family_round_trips() {
        let token = CancelToken::new();
        let data = b"the quick brown fox jumps over thirteen lazy dogs";

        let deal = CipherContext::new(
            Deal::new(&[0x31u8; 24]).unwrap(),
            Cbc,
            Pkcs7Padding::new(Deal::BLOCK_SIZE),
            vec![7u8; 16],
        )
        .unwrap();
        let ct = deal.encrypt_bytes(data, &token).unwrap();
        assert_eq!(deal.decrypt_bytes(&ct, &token).unwrap(), data);

        let tdes = CipherContext::new(
            TripleDes::new(&[0x56u8; 24]).unwrap(),
            Ctr,
            AnsiX923Padding::new(TripleDes::BLOCK_SIZE),
            vec![1u8; 8],
        )
        .unwrap();
        let ct = tdes.encrypt_bytes(data, &token).unwrap();
        assert_eq!(tdes.decrypt_bytes(&ct, &token).unwrap(), data);

        let rc6 = CipherContext::new(
            Rc6::new(&[0x9Au8; 16]).unwrap(),
            Ofb,
            ZerosPadding::new(Rc6::BLOCK_SIZE),
            vec![3u8; 16],
        )
        .unwrap();
        let ct = rc6.encrypt_bytes(data, &token).unwrap();
        assert_eq!(rc6.decrypt_bytes(&ct, &token).unwrap(), data);

        let rijndael = CipherContext::new(
            Rijndael::new(32, &[0x0Du8; 32], 0x1B).unwrap(),
            Ecb,
            Iso10126Padding::new(32),
            Vec::new(),
        )
        .unwrap();
        let ct = rijndael.encrypt_bytes(data, &token).unwrap();
        assert_eq!(rijndael.decrypt_bytes(&ct, &token).unwrap(), data);
    }

    #[test]
    fn iv_length_is_validated_at_construction() {
        let result = CipherContext::new(
            Des::new(&DES_KEY).unwrap(),
            Cbc,
            Pkcs7Padding::new(Des::BLOCK_SIZE),
            vec![0u8; 7],
        );
        assert!(matches!(
            result,
            Err(CipherError::InvalidIVSize { target: 8, real: 7 })
        ));

        // ECB does not consume an IV, any length goes
        assert!(CipherContext::new(
            Des::new(&DES_KEY).unwrap(),
            Ecb,
            Pkcs7Padding::new(Des::BLOCK_SIZE),
            Vec::new(),
        )
        .is_ok());
    }

    #[test]
    fn file_round_trip_is_raw_ciphertext() {
        let dir = std::env::temp_dir().join("cipher-ctx-file-test");
        std::fs::create_dir_all(&dir).unwrap();
        let (plain, enc, dec) = (
            dir.join("plain.bin"),
            dir.join("enc.bin"),
            dir.join("dec.bin"),
        );
        std::fs::write(&plain, MESSAGE).unwrap();

        let ctx = CipherContext::new(
            Des::new(&DES_KEY).unwrap(),
            Cbc,
            Pkcs7Padding::new(Des::BLOCK_SIZE),
            vec![0u8; 8],
        )
        .unwrap();
        let token = CancelToken::new();

        ctx.encrypt_file(&plain, &enc, &token).unwrap();
        let ct = std::fs::read(&enc).unwrap();
        // no header: length is exactly the padded stream
        assert_eq!(ct.len(), (MESSAGE.len() / 8 + 1) * 8);
        assert_eq!(ct, ctx.encrypt_bytes(MESSAGE, &token).unwrap());

        ctx.decrypt_file(&enc, &dec, &token).unwrap();
        assert_eq!(std::fs::read(&dec).unwrap(), MESSAGE);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn stream_round_trip() {
        let ctx = CipherContext::new(
            Rc6::new(&[0x66u8; 16]).unwrap(),
            Cfb,
            Pkcs7Padding::new(Rc6::BLOCK_SIZE),
            vec![0x42u8; 16],
        )
        .unwrap();
        let token = CancelToken::new();

        let mut encrypted = Vec::new();
        ctx.encrypt_stream(&mut &MESSAGE[..], &mut encrypted, &token)
            .unwrap();

        let mut decrypted = Vec::new();
        ctx.decrypt_stream(&mut encrypted.as_slice(), &mut decrypted, &token)
            .unwrap();
        assert_eq!(decrypted, MESSAGE);
    }

    #[test]
    fn cancellation_yields_no_output() {
        let ctx = CipherContext::new(
            Des::new(&DES_KEY).unwrap(),
            Cbc,
            Pkcs7Padding::new(Des::BLOCK_SIZE),
            vec![0u8; 8],
        )
        .unwrap();
        let token = CancelToken::new();
        token.cancel();

        assert!(matches!(
            ctx.encrypt_bytes(MESSAGE, &token),
            Err(CipherError::Cancelled)
        ));
        let mut out = Vec::new();
        assert!(matches!(
            ctx.encrypt_stream(&mut &MESSAGE[..], &mut out, &token),
            Err(CipherError::Cancelled)
        ));
        assert!(out.is_empty(), "cancelled stream op must not emit output");
    }
}
