//! Runtime construction of a [`CipherContext`] from enum-valued algorithm,
//! mode and padding identities, for callers that pick them from
//! configuration rather than types.

use crate::cipher_mode::{
    AnsiX923Padding, BlockMode, BlockPadding, Cbc, Cfb, Ctr, Ecb, Iso10126Padding, Ofb, Pcbc,
    Pkcs7Padding, RandomDelta, ZerosPadding,
};
use crate::{
    BlockCipher, BlockSized, CipherContext, CipherError, Deal, Des, Rc6, Rijndael, TripleDes,
};
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

/// Default Rijndael modulus: the AES polynomial `x⁸+x⁴+x³+x+1`.
const AES_POLY: u8 = 0x1B;

macro_rules! impl_kind_enum {
    ($NAME: ident, $($ITEM: ident = $VAL: literal),+ $(,)?) => {
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        pub enum $NAME {
            $($ITEM = $VAL,)+
        }

        impl $NAME {
            pub fn all() -> Vec<Self> {
                vec![$(Self::$ITEM,)+]
            }

            pub fn name(self) -> String {
                match self {
                    $(Self::$ITEM => stringify!($ITEM).to_lowercase(),)+
                }
            }
        }
    };
}

impl_kind_enum!(
    BlockCipherKind,
    Des = 0x1,
    TripleDes = 0x2,
    Deal = 0x3,
    Rc6 = 0x4,
    Rijndael128 = 0x5,
    Rijndael192 = 0x6,
    Rijndael256 = 0x7,
);

impl_kind_enum!(
    ModeKind,
    Ecb = 0x1,
    Cbc = 0x2,
    Pcbc = 0x3,
    Cfb = 0x4,
    Ofb = 0x5,
    Ctr = 0x6,
    RandomDelta = 0x7,
);

impl_kind_enum!(
    PaddingKind,
    Zeros = 0x1,
    AnsiX923 = 0x2,
    Pkcs7 = 0x3,
    Iso10126 = 0x4,
);

impl TryFrom<u8> for BlockCipherKind {
    type Error = CipherError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|&k| k as u8 == value)
            .ok_or_else(|| CipherError::Other(format!("{value} is no valid block cipher kind")))
    }
}

impl TryFrom<u8> for ModeKind {
    type Error = CipherError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|&k| k as u8 == value)
            .ok_or(CipherError::InvalidMode)
    }
}

impl TryFrom<u8> for PaddingKind {
    type Error = CipherError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|&k| k as u8 == value)
            .ok_or(CipherError::InvalidPaddingScheme)
    }
}

/// A boxed context whose parts were chosen at run time.
pub type DynCipherContext =
    CipherContext<Box<dyn BlockCipher>, Box<dyn BlockMode>, Box<dyn BlockPadding>>;

#[derive(Clone)]
pub struct CipherBuilder {
    cipher_kind: BlockCipherKind,
    mode_kind: ModeKind,
    padding_kind: PaddingKind,
    key: Vec<u8>,
    iv: Vec<u8>,
    rijndael_modulus: u8,
}

impl CipherBuilder {
    pub fn new(cipher_kind: BlockCipherKind) -> Self {
        Self {
            cipher_kind,
            mode_kind: ModeKind::Ecb,
            padding_kind: PaddingKind::Pkcs7,
            key: Vec::new(),
            iv: Vec::new(),
            rijndael_modulus: AES_POLY,
        }
    }

    pub fn mode(mut self, mode_kind: ModeKind) -> Self {
        self.mode_kind = mode_kind;
        self
    }

    pub fn padding(mut self, padding_kind: PaddingKind) -> Self {
        self.padding_kind = padding_kind;
        self
    }

    pub fn key(mut self, key: Vec<u8>) -> Self {
        #[cfg(feature = "sec-zeroize")]
        self.key.zeroize();
        self.key = key;
        self
    }

    pub fn iv(mut self, iv: Vec<u8>) -> Self {
        self.iv = iv;
        self
    }

    /// Only consulted by the Rijndael kinds.
    pub fn rijndael_modulus(mut self, modulus: u8) -> Self {
        self.rijndael_modulus = modulus;
        self
    }

    pub fn build(&self) -> Result<DynCipherContext, CipherError> {
        let cipher: Box<dyn BlockCipher> = match self.cipher_kind {
            BlockCipherKind::Des => Box::new(Des::new(&self.key)?),
            BlockCipherKind::TripleDes => Box::new(TripleDes::new(&self.key)?),
            BlockCipherKind::Deal => Box::new(Deal::new(&self.key)?),
            BlockCipherKind::Rc6 => Box::new(Rc6::new(&self.key)?),
            BlockCipherKind::Rijndael128 => {
                Box::new(Rijndael::new(16, &self.key, self.rijndael_modulus)?)
            }
            BlockCipherKind::Rijndael192 => {
                Box::new(Rijndael::new(24, &self.key, self.rijndael_modulus)?)
            }
            BlockCipherKind::Rijndael256 => {
                Box::new(Rijndael::new(32, &self.key, self.rijndael_modulus)?)
            }
        };

        let mode: Box<dyn BlockMode> = match self.mode_kind {
            ModeKind::Ecb => Box::new(Ecb),
            ModeKind::Cbc => Box::new(Cbc),
            ModeKind::Pcbc => Box::new(Pcbc),
            ModeKind::Cfb => Box::new(Cfb),
            ModeKind::Ofb => Box::new(Ofb),
            ModeKind::Ctr => Box::new(Ctr),
            ModeKind::RandomDelta => Box::new(RandomDelta),
        };

        let block_size = cipher.block_size();
        let padding: Box<dyn BlockPadding> = match self.padding_kind {
            PaddingKind::Zeros => Box::new(ZerosPadding::new(block_size)),
            PaddingKind::AnsiX923 => Box::new(AnsiX923Padding::new(block_size)),
            PaddingKind::Pkcs7 => Box::new(Pkcs7Padding::new(block_size)),
            PaddingKind::Iso10126 => Box::new(Iso10126Padding::new(block_size)),
        };

        CipherContext::new(cipher, mode, padding, self.iv.clone())
    }
}

#[cfg(feature = "sec-zeroize")]
impl Drop for CipherBuilder {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockCipherKind, CipherBuilder, ModeKind, PaddingKind};
    use crate::{CancelToken, CipherError};

    #[test]
    fn builds_and_round_trips_every_combination() {
        let token = CancelToken::new();
        let data = b"builder driven encryption";

        for cipher_kind in BlockCipherKind::all() {
            let (key_len, block_len) = match cipher_kind {
                BlockCipherKind::Des => (8usize, 8usize),
                BlockCipherKind::TripleDes => (24, 8),
                BlockCipherKind::Deal => (24, 16),
                BlockCipherKind::Rc6 => (16, 16),
                BlockCipherKind::Rijndael128 => (16, 16),
                BlockCipherKind::Rijndael192 => (24, 24),
                BlockCipherKind::Rijndael256 => (32, 32),
            };

            for mode_kind in ModeKind::all() {
                let ctx = CipherBuilder::new(cipher_kind)
                    .mode(mode_kind)
                    .padding(PaddingKind::Pkcs7)
                    .key(vec![0x5Au8; key_len])
                    .iv(vec![0xC3u8; block_len])
                    .build()
                    .unwrap();

                let ct = ctx.encrypt_bytes(data, &token).unwrap();
                assert_eq!(
                    ctx.decrypt_bytes(&ct, &token).unwrap(),
                    data,
                    "{} + {} failed",
                    cipher_kind.name(),
                    mode_kind.name()
                );
            }
        }
    }

    #[test]
    fn discriminants_round_trip_and_reject_garbage() {
        for kind in ModeKind::all() {
            assert_eq!(ModeKind::try_from(kind as u8).unwrap(), kind);
        }
        assert!(matches!(
            ModeKind::try_from(0xFF),
            Err(CipherError::InvalidMode)
        ));

        for kind in PaddingKind::all() {
            assert_eq!(PaddingKind::try_from(kind as u8).unwrap(), kind);
        }
        assert!(matches!(
            PaddingKind::try_from(0),
            Err(CipherError::InvalidPaddingScheme)
        ));

        assert!(matches!(
            BlockCipherKind::try_from(0x70),
            Err(CipherError::Other(_))
        ));
    }

    #[test]
    fn key_errors_surface_through_build() {
        let result = CipherBuilder::new(BlockCipherKind::Des)
            .key(vec![0u8; 5])
            .build();
        assert!(matches!(
            result,
            Err(CipherError::InvalidKeySize {
                target: Some(8),
                real: 5
            })
        ));
    }
}
