//! Rijndael over a caller-chosen irreducible polynomial, with 128/192/256-bit
//! blocks and keys.
//!
//! The S-box is not a fixed table: it is derived at construction from the
//! chosen modulus (GF(2⁸) inversion followed by the AES affine transform),
//! so the cipher with modulus `0x1B` is exactly AES.

use crate::{gf256, CipherError};
use utils::Block;

const MIX: [[u8; 4]; 4] = [
    [0x02, 0x03, 0x01, 0x01],
    [0x01, 0x02, 0x03, 0x01],
    [0x01, 0x01, 0x02, 0x03],
    [0x03, 0x01, 0x01, 0x02],
];

const INV_MIX: [[u8; 4]; 4] = [
    [0x0E, 0x0B, 0x0D, 0x09],
    [0x09, 0x0E, 0x0B, 0x0D],
    [0x0D, 0x09, 0x0E, 0x0B],
    [0x0B, 0x0D, 0x09, 0x0E],
];

pub struct Rijndael {
    block_size: usize,
    rounds: usize,
    modulus: u8,
    sbox: [u8; 256],
    inv_sbox: [u8; 256],
    round_keys: Vec<Vec<u8>>,
}

impl Rijndael {
    /// `block_size` and the key length must each be 16, 24 or 32 bytes;
    /// `modulus` must be irreducible.
    pub fn new(block_size: usize, key: &[u8], modulus: u8) -> Result<Self, CipherError> {
        if !matches!(block_size, 16 | 24 | 32) {
            return Err(CipherError::InvalidParameters(format!(
                "block size `{block_size}` not one of 16/24/32"
            )));
        }
        if !matches!(key.len(), 16 | 24 | 32) {
            return Err(CipherError::InvalidKeySize {
                target: None,
                real: key.len(),
            });
        }
        if !gf256::is_irreducible(modulus) {
            return Err(CipherError::ReduciblePolynomial);
        }

        let (nb, nk) = (block_size / 4, key.len() / 4);
        let rounds = nb.max(nk) + 6;

        let (sbox, inv_sbox) = derive_sboxes(modulus);
        let mut cipher = Self {
            block_size,
            rounds,
            modulus,
            sbox,
            inv_sbox,
            round_keys: Vec::new(),
        };
        cipher.round_keys = cipher.expand_key(key, nk);

        Ok(cipher)
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub(crate) fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.check_block(block)?;

        let mut state = block.to_vec();
        add_round_key(&mut state, &self.round_keys[0]);
        for round in 1..self.rounds {
            self.sub_bytes(&mut state);
            self.shift_rows(&mut state);
            self.mix_columns(&mut state, &MIX);
            add_round_key(&mut state, &self.round_keys[round]);
        }
        self.sub_bytes(&mut state);
        self.shift_rows(&mut state);
        add_round_key(&mut state, &self.round_keys[self.rounds]);

        Ok(state)
    }

    pub(crate) fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.check_block(block)?;

        let mut state = block.to_vec();
        add_round_key(&mut state, &self.round_keys[self.rounds]);
        self.inv_shift_rows(&mut state);
        self.inv_sub_bytes(&mut state);
        for round in (1..self.rounds).rev() {
            add_round_key(&mut state, &self.round_keys[round]);
            self.mix_columns(&mut state, &INV_MIX);
            self.inv_shift_rows(&mut state);
            self.inv_sub_bytes(&mut state);
        }
        add_round_key(&mut state, &self.round_keys[0]);

        Ok(state)
    }

    fn check_block(&self, block: &[u8]) -> Result<(), CipherError> {
        if block.len() != self.block_size {
            return Err(CipherError::InvalidBlockSize {
                target: self.block_size,
                real: block.len(),
            });
        }
        Ok(())
    }

    fn sub_bytes(&self, state: &mut [u8]) {
        for byte in state.iter_mut() {
            *byte = self.sbox[*byte as usize];
        }
    }

    fn inv_sub_bytes(&self, state: &mut [u8]) {
        for byte in state.iter_mut() {
            *byte = self.inv_sbox[*byte as usize];
        }
    }

    /// Row `r` rotates left by `{0,1,2,3}` columns, or `{0,1,3,4}` for the
    /// 256-bit block.
    fn row_shifts(&self) -> [usize; 4] {
        if self.block_size == 32 {
            [0, 1, 3, 4]
        } else {
            [0, 1, 2, 3]
        }
    }

    fn shift_rows(&self, state: &mut [u8]) {
        let nb = self.block_size / 4;
        let shifts = self.row_shifts();
        let tmp = state.to_vec();
        for row in 0..4 {
            for col in 0..nb {
                state[row + 4 * col] = tmp[row + 4 * ((col + shifts[row]) % nb)];
            }
        }
    }

    fn inv_shift_rows(&self, state: &mut [u8]) {
        let nb = self.block_size / 4;
        let shifts = self.row_shifts();
        let tmp = state.to_vec();
        for row in 0..4 {
            for col in 0..nb {
                state[row + 4 * col] = tmp[row + 4 * ((col + nb - shifts[row] % nb) % nb)];
            }
        }
    }

    fn mix_columns(&self, state: &mut [u8], matrix: &[[u8; 4]; 4]) {
        for col in state.chunks_exact_mut(4) {
            let tmp = Block::to_arr_uncheck::<4>(col);
            for (i, row) in matrix.iter().enumerate() {
                col[i] = row
                    .iter()
                    .zip(tmp.iter())
                    .fold(0u8, |acc, (&m, &v)| {
                        gf256::add(acc, gf256::mul_reduce(m, v, self.modulus))
                    });
            }
        }
    }

    fn expand_key(&self, key: &[u8], nk: usize) -> Vec<Vec<u8>> {
        let nb = self.block_size / 4;
        let total_words = nb * (self.rounds + 1);

        let mut w: Vec<[u8; 4]> = Vec::with_capacity(total_words);
        for chunk in key.chunks_exact(4) {
            w.push(Block::to_arr_uncheck(chunk));
        }

        for i in nk..total_words {
            let mut temp = w[i - 1];
            if i % nk == 0 {
                temp.rotate_left(1);
                temp = self.sub_word(temp);
                temp[0] ^= self.rcon(i / nk);
            } else if nk > 6 && i % nk == 4 {
                temp = self.sub_word(temp);
            }

            let mut word = w[i - nk];
            for (b, t) in word.iter_mut().zip(temp.iter()) {
                *b ^= t;
            }
            w.push(word);
        }

        (0..=self.rounds)
            .map(|round| {
                w[round * nb..(round + 1) * nb]
                    .iter()
                    .flatten()
                    .copied()
                    .collect()
            })
            .collect()
    }

    fn sub_word(&self, word: [u8; 4]) -> [u8; 4] {
        word.map(|b| self.sbox[b as usize])
    }

    /// Round constant: `0x02^(i-1)` in the chosen field.
    fn rcon(&self, i: usize) -> u8 {
        let mut rc = 1u8;
        for _ in 1..i {
            rc = gf256::mul_reduce(rc, 0x02, self.modulus);
        }
        rc
    }
}

fn add_round_key(state: &mut [u8], round_key: &[u8]) {
    for (byte, key) in state.iter_mut().zip(round_key.iter()) {
        *byte ^= key;
    }
}

fn derive_sboxes(modulus: u8) -> ([u8; 256], [u8; 256]) {
    let mut sbox = [0u8; 256];
    let mut inv_sbox = [0u8; 256];

    for x in 0..=255u8 {
        let inv = if x == 0 {
            0
        } else {
            gf256::inv_reduce(x, modulus)
        };
        sbox[x as usize] = affine_transform(inv);
    }
    for (x, &s) in sbox.iter().enumerate() {
        inv_sbox[s as usize] = x as u8;
    }

    (sbox, inv_sbox)
}

/// `y_i = x_i ⊕ x_{i+4} ⊕ x_{i+5} ⊕ x_{i+6} ⊕ x_{i+7} ⊕ c_i`, `c = 0x63`.
fn affine_transform(x: u8) -> u8 {
    let mut y = 0u8;
    for i in 0..8 {
        let bit = ((x >> i)
            ^ (x >> ((i + 4) % 8))
            ^ (x >> ((i + 5) % 8))
            ^ (x >> ((i + 6) % 8))
            ^ (x >> ((i + 7) % 8)))
            & 1;
        y |= bit << i;
    }
    y ^ 0x63
}

#[cfg(feature = "sec-zeroize")]
impl zeroize::Zeroize for Rijndael {
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.round_keys);
    }
}
