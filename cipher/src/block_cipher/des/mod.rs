//! DES, FIPS 46-3.
//!
//! The Feistel driver carries the sixteen rounds; the wrapper applies the
//! initial/final permutations and the classic preoutput half-swap so the
//! published test vectors hold.

use crate::bits::{self, BitIndexing, BitNumbering};
use crate::feistel::{Feistel, KeySchedule, RoundFunction};
use crate::CipherError;

mod tables;

const HALF_MASK: u32 = 0x0FFF_FFFF;

pub struct Des {
    feistel: Feistel<DesRound>,
}

impl Des {
    pub const BLOCK_SIZE: usize = 8;
    pub const KEY_SIZE: usize = 8;

    /// `key` is 8 bytes; the parity bits are ignored by PC-1.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        Ok(Self {
            feistel: Feistel::new(&DesKeySchedule, key, DesRound, Self::BLOCK_SIZE)?,
        })
    }

    pub(crate) fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        Self::check_block(block)?;

        let state = permute(block, &tables::IP)?;
        let mut state = self.feistel.encrypt(&state)?;
        state.rotate_left(Self::BLOCK_SIZE / 2);
        permute(&state, &tables::FP)
    }

    pub(crate) fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        Self::check_block(block)?;

        let mut state = permute(block, &tables::IP)?;
        state.rotate_left(Self::BLOCK_SIZE / 2);
        let state = self.feistel.decrypt(&state)?;
        permute(&state, &tables::FP)
    }

    fn check_block(block: &[u8]) -> Result<(), CipherError> {
        if block.len() != Self::BLOCK_SIZE {
            return Err(CipherError::InvalidBlockSize {
                target: Self::BLOCK_SIZE,
                real: block.len(),
            });
        }
        Ok(())
    }
}

#[cfg(feature = "sec-zeroize")]
impl zeroize::Zeroize for Des {
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.feistel);
    }
}

fn permute(data: &[u8], table: &[usize]) -> Result<Vec<u8>, CipherError> {
    bits::permute(data, table, BitIndexing::MsbFirst, BitNumbering::OneBased)
}

struct DesKeySchedule;

impl KeySchedule for DesKeySchedule {
    fn round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>, CipherError> {
        if key.len() != Des::KEY_SIZE {
            return Err(CipherError::InvalidKeySize {
                target: Some(Des::KEY_SIZE),
                real: key.len(),
            });
        }

        let permuted = permute(key, &tables::PC1)?;
        let (mut c, mut d) = split_halves(&permuted);

        let mut keys = Vec::with_capacity(tables::KEY_SHIFTS.len());
        for shift in tables::KEY_SHIFTS {
            c = rotl28(c, shift);
            d = rotl28(d, shift);
            keys.push(permute(&join_halves(c, d), &tables::PC2)?);
        }

        Ok(keys)
    }
}

/// Splits 7 bytes (56 bits, MSB-first) into the C and D 28-bit halves.
fn split_halves(bytes: &[u8]) -> (u32, u32) {
    let mut v = 0u64;
    for &b in bytes.iter().take(7) {
        v = (v << 8) | b as u64;
    }
    (((v >> 28) as u32) & HALF_MASK, (v as u32) & HALF_MASK)
}

fn join_halves(c: u32, d: u32) -> [u8; 7] {
    let v = ((c as u64) << 28) | d as u64;
    let mut out = [0u8; 7];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = (v >> (48 - 8 * i)) as u8;
    }
    out
}

fn rotl28(x: u32, shift: u32) -> u32 {
    ((x << shift) | (x >> (28 - shift))) & HALF_MASK
}

struct DesRound;

impl RoundFunction for DesRound {
    fn transform(&self, half: &[u8], round_key: &[u8]) -> Result<Vec<u8>, CipherError> {
        let expanded = permute(half, &tables::E)?;
        let mixed: Vec<u8> = expanded
            .iter()
            .zip(round_key.iter())
            .map(|(x, k)| x ^ k)
            .collect();

        let mut substituted = [0u8; 4];
        for (i, sbox) in tables::SBOXES.iter().enumerate() {
            let six = six_bits(&mixed, i);
            // row is the outer pair b5 b0, column the inner four bits
            let row = ((six >> 4) & 0b10) | (six & 1);
            let col = (six >> 1) & 0x0F;
            let val = sbox[(row * 16 + col) as usize];
            substituted[i / 2] |= if i % 2 == 0 { val << 4 } else { val };
        }

        permute(&substituted, &tables::P)
    }
}

/// The `index`-th 6-bit group of a 48-bit buffer, MSB-first.
fn six_bits(data: &[u8], index: usize) -> u8 {
    let bit = index * 6;
    let (byte, offset) = (bit / 8, bit % 8);
    if offset <= 2 {
        (data[byte] >> (2 - offset)) & 0x3F
    } else {
        ((data[byte] << (offset - 2)) | (data[byte + 1] >> (10 - offset))) & 0x3F
    }
}
