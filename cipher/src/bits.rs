//! P-box bit permutations over byte buffers.

use crate::CipherError;

/// How bit positions map onto the bits of one byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BitIndexing {
    /// Bit 0 is the least significant bit of the first byte.
    LsbFirst,
    /// Bit 0 is the most significant bit of the first byte.
    MsbFirst,
}

/// Whether table entries count positions from 0 or from 1.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BitNumbering {
    ZeroBased,
    OneBased,
}

fn get_bit(data: &[u8], idx: usize, indexing: BitIndexing) -> u8 {
    let (byte, bit) = (idx / 8, idx % 8);
    match indexing {
        BitIndexing::LsbFirst => (data[byte] >> bit) & 1,
        BitIndexing::MsbFirst => (data[byte] >> (7 - bit)) & 1,
    }
}

fn set_bit(data: &mut [u8], idx: usize, value: u8, indexing: BitIndexing) {
    let (byte, bit) = (idx / 8, idx % 8);
    let mask = match indexing {
        BitIndexing::LsbFirst => 1u8 << bit,
        BitIndexing::MsbFirst => 1u8 << (7 - bit),
    };
    if value == 1 {
        data[byte] |= mask;
    } else {
        data[byte] &= !mask;
    }
}

/// Applies the P-box `table` to `data`: output bit `i` is the input bit named
/// by `table[i]`, read and written with the same `indexing` convention.
/// Output length is `⌈table.len() / 8⌉` bytes.
pub fn permute(
    data: &[u8],
    table: &[usize],
    indexing: BitIndexing,
    numbering: BitNumbering,
) -> Result<Vec<u8>, CipherError> {
    if table.is_empty() {
        return Err(CipherError::InvalidTableSize);
    }

    let bits = data.len() * 8;
    let mut out = vec![0u8; (table.len() + 7) / 8];
    for (i, &pos) in table.iter().enumerate() {
        let src = match numbering {
            BitNumbering::ZeroBased => pos,
            BitNumbering::OneBased => match pos.checked_sub(1) {
                Some(p) => p,
                None => return Err(CipherError::InvalidBitIndex { index: pos, bits }),
            },
        };
        if src >= bits {
            return Err(CipherError::InvalidBitIndex { index: pos, bits });
        }
        set_bit(&mut out, i, get_bit(data, src, indexing), indexing);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{permute, BitIndexing, BitNumbering};
    use crate::CipherError;

    #[test]
    fn identity_table_keeps_input() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        let table: Vec<usize> = (0..32).collect();
        for indexing in [BitIndexing::LsbFirst, BitIndexing::MsbFirst] {
            let out = permute(&data, &table, indexing, BitNumbering::ZeroBased).unwrap();
            assert_eq!(out, data, "identity failed for {indexing:?}");
        }
    }

    #[test]
    fn one_based_table_shifts_by_one() {
        let data = [0b1000_0000u8];
        // names the MSB in both conventions
        let msb = permute(&data, &[1], BitIndexing::MsbFirst, BitNumbering::OneBased).unwrap();
        assert_eq!(msb, vec![0b1000_0000]);
        let lsb = permute(&data, &[8], BitIndexing::LsbFirst, BitNumbering::OneBased).unwrap();
        assert_eq!(lsb, vec![0b0000_0001]);
    }

    #[test]
    fn reversal_table() {
        let data = [0b1100_0000u8];
        let table: Vec<usize> = (0..8).rev().collect();
        let out = permute(&data, &table, BitIndexing::MsbFirst, BitNumbering::ZeroBased).unwrap();
        assert_eq!(out, vec![0b0000_0011]);
    }

    #[test]
    fn output_is_table_sized() {
        let data = [0xFFu8, 0x00];
        let out = permute(&data, &[0, 1, 2], BitIndexing::MsbFirst, BitNumbering::ZeroBased)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out, vec![0b1110_0000]);

        let out = permute(
            &data,
            &(0..9).collect::<Vec<_>>(),
            BitIndexing::MsbFirst,
            BitNumbering::ZeroBased,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(
            permute(&[0u8], &[], BitIndexing::MsbFirst, BitNumbering::ZeroBased),
            Err(CipherError::InvalidTableSize)
        ));
    }

    #[test]
    fn rejects_out_of_range_positions() {
        assert!(matches!(
            permute(&[0u8], &[8], BitIndexing::MsbFirst, BitNumbering::ZeroBased),
            Err(CipherError::InvalidBitIndex { index: 8, bits: 8 })
        ));
        // position 0 does not exist in one-based numbering
        assert!(matches!(
            permute(&[0u8], &[0], BitIndexing::MsbFirst, BitNumbering::OneBased),
            Err(CipherError::InvalidBitIndex { .. })
        ));
    }
}
