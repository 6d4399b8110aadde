//! RC6-32/20: four 32-bit little-endian words, twenty rounds.

use crate::CipherError;
use utils::Block;

const ROUNDS: usize = 20;
const P32: u32 = 0xB7E1_5163;
const Q32: u32 = 0x9E37_79B9;
const SCHEDULE_WORDS: usize = 2 * ROUNDS + 4;

pub struct Rc6 {
    s: [u32; SCHEDULE_WORDS],
}

impl Rc6 {
    pub const BLOCK_SIZE: usize = 16;

    /// Any key from 1 to 255 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        if key.is_empty() || key.len() > 255 {
            return Err(CipherError::InvalidKeySize {
                target: None,
                real: key.len(),
            });
        }

        Ok(Self {
            s: Self::expand_key(key),
        })
    }

    fn expand_key(key: &[u8]) -> [u32; SCHEDULE_WORDS] {
        let c = (key.len() + 3) / 4;
        let mut l = vec![0u32; c];
        for (i, &byte) in key.iter().enumerate() {
            l[i / 4] |= (byte as u32) << (8 * (i % 4));
        }

        let mut s = [0u32; SCHEDULE_WORDS];
        s[0] = P32;
        for i in 1..SCHEDULE_WORDS {
            s[i] = s[i - 1].wrapping_add(Q32);
        }

        let (mut a, mut b) = (0u32, 0u32);
        let (mut i, mut j) = (0usize, 0usize);
        for _ in 0..3 * c.max(SCHEDULE_WORDS) {
            a = s[i].wrapping_add(a).wrapping_add(b).rotate_left(3);
            s[i] = a;
            b = l[j]
                .wrapping_add(a)
                .wrapping_add(b)
                .rotate_left(a.wrapping_add(b) & 31);
            l[j] = b;
            i = (i + 1) % SCHEDULE_WORDS;
            j = (j + 1) % c;
        }

        s
    }

    pub(crate) fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        let [mut a, mut b, mut c, mut d] = Self::load_words(block)?;
        let s = &self.s;

        b = b.wrapping_add(s[0]);
        d = d.wrapping_add(s[1]);
        for i in 1..=ROUNDS {
            let t = b
                .wrapping_mul(b.wrapping_mul(2).wrapping_add(1))
                .rotate_left(5);
            let u = d
                .wrapping_mul(d.wrapping_mul(2).wrapping_add(1))
                .rotate_left(5);
            a = (a ^ t).rotate_left(u & 31).wrapping_add(s[2 * i]);
            c = (c ^ u).rotate_left(t & 31).wrapping_add(s[2 * i + 1]);
            (a, b, c, d) = (b, c, d, a);
        }
        a = a.wrapping_add(s[2 * ROUNDS + 2]);
        c = c.wrapping_add(s[2 * ROUNDS + 3]);

        Ok(Self::store_words([a, b, c, d]))
    }

    pub(crate) fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        let [mut a, mut b, mut c, mut d] = Self::load_words(block)?;
        let s = &self.s;

        c = c.wrapping_sub(s[2 * ROUNDS + 3]);
        a = a.wrapping_sub(s[2 * ROUNDS + 2]);
        for i in (1..=ROUNDS).rev() {
            (a, b, c, d) = (d, a, b, c);
            let u = d
                .wrapping_mul(d.wrapping_mul(2).wrapping_add(1))
                .rotate_left(5);
            let t = b
                .wrapping_mul(b.wrapping_mul(2).wrapping_add(1))
                .rotate_left(5);
            c = c.wrapping_sub(s[2 * i + 1]).rotate_right(t & 31) ^ u;
            a = a.wrapping_sub(s[2 * i]).rotate_right(u & 31) ^ t;
        }
        d = d.wrapping_sub(s[1]);
        b = b.wrapping_sub(s[0]);

        Ok(Self::store_words([a, b, c, d]))
    }

    fn load_words(block: &[u8]) -> Result<[u32; 4], CipherError> {
        if block.len() != Self::BLOCK_SIZE {
            return Err(CipherError::InvalidBlockSize {
                target: Self::BLOCK_SIZE,
                real: block.len(),
            });
        }

        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
            *word = u32::from_le_bytes(Block::to_arr_uncheck(chunk));
        }
        Ok(words)
    }

    fn store_words(words: [u32; 4]) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::BLOCK_SIZE);
        for word in words {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out
    }
}

#[cfg(feature = "sec-zeroize")]
impl zeroize::Zeroize for Rc6 {
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.s);
    }
}
