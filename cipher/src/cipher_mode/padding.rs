//! Block padding schemes.
//!
//! Padding always appends between 1 and `block_size` bytes; input that is
//! already aligned gains a full block, so the pad length can always be
//! recovered.

use crate::CipherError;
use rand::{DefaultRand, Rand};

pub trait BlockPadding: Send + Sync {
    fn pad(&self, buf: &mut Vec<u8>);

    fn unpad(&self, buf: &mut Vec<u8>) -> Result<(), CipherError>;
}

impl<T: BlockPadding + ?Sized> BlockPadding for Box<T> {
    fn pad(&self, buf: &mut Vec<u8>) {
        (**self).pad(buf)
    }

    fn unpad(&self, buf: &mut Vec<u8>) -> Result<(), CipherError> {
        (**self).unpad(buf)
    }
}

fn pad_len(len: usize, block_size: usize) -> usize {
    block_size - (len % block_size)
}

/// Declared pad length from the trailing byte; rejects empty buffers and
/// impossible declarations.
fn declared_len(buf: &[u8]) -> Result<usize, CipherError> {
    let Some(&last) = buf.last() else {
        return Err(CipherError::InvalidDataLength { len: 0 });
    };
    let n = last as usize;
    if n == 0 || n > buf.len() {
        return Err(CipherError::InvalidDataLength { len: buf.len() });
    }
    Ok(n)
}

/// All-zero fill. Stripping removes every trailing zero, so plaintexts with
/// genuine trailing zero bytes do not survive the round trip.
#[derive(Copy, Clone, Debug)]
pub struct ZerosPadding {
    block_size: usize,
}

impl ZerosPadding {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockPadding for ZerosPadding {
    fn pad(&self, buf: &mut Vec<u8>) {
        let n = pad_len(buf.len(), self.block_size);
        buf.resize(buf.len() + n, 0);
    }

    fn unpad(&self, buf: &mut Vec<u8>) -> Result<(), CipherError> {
        if buf.is_empty() {
            return Err(CipherError::InvalidDataLength { len: 0 });
        }
        while buf.last() == Some(&0) {
            buf.pop();
        }
        Ok(())
    }
}

/// Zero fill with the pad length in the final byte.
#[derive(Copy, Clone, Debug)]
pub struct AnsiX923Padding {
    block_size: usize,
}

impl AnsiX923Padding {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockPadding for AnsiX923Padding {
    fn pad(&self, buf: &mut Vec<u8>) {
        let n = pad_len(buf.len(), self.block_size);
        buf.resize(buf.len() + n - 1, 0);
        buf.push(n as u8);
    }

    fn unpad(&self, buf: &mut Vec<u8>) -> Result<(), CipherError> {
        let n = declared_len(buf)?;
        buf.truncate(buf.len() - n);
        Ok(())
    }
}

/// Every fill byte is the pad length.
#[derive(Copy, Clone, Debug)]
pub struct Pkcs7Padding {
    block_size: usize,
}

impl Pkcs7Padding {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockPadding for Pkcs7Padding {
    fn pad(&self, buf: &mut Vec<u8>) {
        let n = pad_len(buf.len(), self.block_size);
        buf.resize(buf.len() + n, n as u8);
    }

    fn unpad(&self, buf: &mut Vec<u8>) -> Result<(), CipherError> {
        let n = declared_len(buf)?;
        if buf[buf.len() - n..].iter().any(|&b| b as usize != n) {
            return Err(CipherError::UnpaddingNotMatch("PKCS7".to_string()));
        }
        buf.truncate(buf.len() - n);
        Ok(())
    }
}

/// Random fill with the pad length in the final byte.
#[derive(Clone, Debug)]
pub struct Iso10126Padding {
    block_size: usize,
}

impl Iso10126Padding {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockPadding for Iso10126Padding {
    fn pad(&self, buf: &mut Vec<u8>) {
        let n = pad_len(buf.len(), self.block_size);
        let mut fill = vec![0u8; n - 1];
        DefaultRand::default().rand(&mut fill);
        buf.extend_from_slice(&fill);
        buf.push(n as u8);
    }

    fn unpad(&self, buf: &mut Vec<u8>) -> Result<(), CipherError> {
        let n = declared_len(buf)?;
        buf.truncate(buf.len() - n);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AnsiX923Padding, BlockPadding, Iso10126Padding, Pkcs7Padding, ZerosPadding,
    };
    use crate::CipherError;

    fn schemes(block_size: usize) -> Vec<(&'static str, Box<dyn BlockPadding>)> {
        vec![
            ("Zeros", Box::new(ZerosPadding::new(block_size))),
            ("ANSI X.923", Box::new(AnsiX923Padding::new(block_size))),
            ("PKCS7", Box::new(Pkcs7Padding::new(block_size))),
            ("ISO 10126", Box::new(Iso10126Padding::new(block_size))),
        ]
    }

    #[test]
    fn pad_lengths_and_round_trips() {
        for bs in [8usize, 16] {
            for data_len in [0usize, 1, 7, 8, 9, 15, 16, 31] {
                // avoid trailing zeros so the Zeros scheme round-trips too
                let data: Vec<u8> = (0..data_len).map(|i| (i % 250 + 1) as u8).collect();

                for (name, scheme) in schemes(bs) {
                    let mut buf = data.clone();
                    scheme.pad(&mut buf);
                    assert_eq!(buf.len() % bs, 0, "{name}: not aligned (bs {bs})");
                    let appended = buf.len() - data.len();
                    assert!(
                        (1..=bs).contains(&appended),
                        "{name}: appended {appended} bytes for input {data_len}"
                    );

                    scheme.unpad(&mut buf).unwrap();
                    assert_eq!(buf, data, "{name}: round trip failed (bs {bs})");
                }
            }
        }
    }

    #[test]
    fn aligned_input_gains_a_full_block() {
        for (name, scheme) in schemes(8) {
            let mut buf = vec![1u8; 16];
            scheme.pad(&mut buf);
            assert_eq!(buf.len(), 24, "{name}: expected one extra block");
        }
    }

    #[test]
    fn length_carrying_schemes_declare_their_fill() {
        let mut buf = vec![9u8, 9, 9];
        AnsiX923Padding::new(8).pad(&mut buf);
        assert_eq!(&buf[..3], &[9, 9, 9]);
        assert_eq!(&buf[3..7], &[0, 0, 0, 0]);
        assert_eq!(buf[7], 5);

        let mut buf = vec![9u8, 9, 9];
        Pkcs7Padding::new(8).pad(&mut buf);
        assert_eq!(&buf[3..], &[5, 5, 5, 5, 5]);

        let mut buf = vec![9u8, 9, 9];
        Iso10126Padding::new(8).pad(&mut buf);
        assert_eq!(buf.len(), 8);
        assert_eq!(buf[7], 5);
    }

    #[test]
    fn unpad_rejects_empty_and_oversized_declarations() {
        for (name, scheme) in schemes(8) {
            let mut empty = Vec::new();
            assert!(
                matches!(
                    scheme.unpad(&mut empty),
                    Err(CipherError::InvalidDataLength { len: 0 })
                ),
                "{name}: empty input accepted"
            );
        }

        // declared length larger than the buffer
        for (name, scheme) in schemes(8) {
            if name == "Zeros" {
                continue;
            }
            let mut buf = vec![0xFFu8, 0x09];
            assert!(
                matches!(
                    scheme.unpad(&mut buf),
                    Err(CipherError::InvalidDataLength { .. })
                ),
                "{name}: oversized declaration accepted"
            );
        }
    }

    #[test]
    fn pkcs7_verifies_the_constant_run() {
        let mut buf = vec![1u8, 2, 3, 4, 5, 6, 4, 3];
        assert!(matches!(
            Pkcs7Padding::new(8).unpad(&mut buf),
            Err(CipherError::UnpaddingNotMatch(_))
        ));
    }

    #[test]
    fn zeros_strips_every_trailing_zero() {
        let mut buf = vec![1u8, 2, 0, 0, 0];
        ZerosPadding::new(8).unpad(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 2]);
    }
}
