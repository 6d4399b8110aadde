use std::{error::Error, fmt::Display};

#[derive(Debug)]
pub enum CipherError {
    /// Block length does not match the cipher's block size.
    InvalidBlockSize {
        target: usize,
        real: usize,
    },

    /// Key length does not match the cipher's accepted size(s).
    InvalidKeySize {
        target: Option<usize>,
        real: usize,
    },

    /// IV length does not match the cipher's block size.
    InvalidIVSize {
        target: usize,
        real: usize,
    },

    /// Data is empty, not block-aligned, or declares an impossible length.
    InvalidDataLength {
        len: usize,
    },

    /// A permutation table entry points outside the input.
    InvalidBitIndex {
        index: usize,
        bits: usize,
    },

    /// The permutation table is empty.
    InvalidTableSize,

    InvalidPaddingScheme,

    InvalidMode,

    InvalidPublicKey(String),

    InvalidPrivateKey(String),

    InvalidParameters(String),

    /// Key material of the two parties disagrees.
    ParameterMismatch,

    /// Message integer is not below the modulus.
    MessageTooLarge,

    /// The polynomial is not irreducible over GF(2).
    ReduciblePolynomial,

    /// The operation observed a cancelled token.
    Cancelled,

    /// Unpadding failed for the named scheme.
    UnpaddingNotMatch(String),

    IOError(std::io::Error),

    Other(String),
}

impl Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBlockSize { target, real } => f.write_fmt(format_args!(
                "Invalid block data size `{real}` not match to target size `{target}`"
            )),
            Self::InvalidKeySize { target, real } => match target {
                Some(target) => f.write_fmt(format_args!(
                    "Invalid key size `{real}` not match to target size `{target}`"
                )),
                None => f.write_fmt(format_args!(
                    "Invalid key size `{real}` not match to any accepted size"
                )),
            },
            Self::InvalidIVSize { target, real } => f.write_fmt(format_args!(
                "Invalid IV size `{real}` not match to block size `{target}`"
            )),
            Self::InvalidDataLength { len } => {
                f.write_fmt(format_args!("Invalid data length `{len}`"))
            }
            Self::InvalidBitIndex { index, bits } => f.write_fmt(format_args!(
                "Bit index `{index}` out of the input bit range `[0,{bits})`"
            )),
            Self::InvalidTableSize => f.write_str("Permutation table is empty"),
            Self::InvalidPaddingScheme => f.write_str("Unknown padding scheme"),
            Self::InvalidMode => f.write_str("Unknown mode of operation"),
            Self::InvalidPublicKey(why) => {
                f.write_fmt(format_args!("Invalid public key: {why}"))
            }
            Self::InvalidPrivateKey(why) => {
                f.write_fmt(format_args!("Invalid private key: {why}"))
            }
            Self::InvalidParameters(why) => {
                f.write_fmt(format_args!("Invalid parameters: {why}"))
            }
            Self::ParameterMismatch => f.write_str("Key parameters do not match"),
            Self::MessageTooLarge => f.write_str("Message is not less than the modulus"),
            Self::ReduciblePolynomial => f.write_str("Polynomial is reducible"),
            Self::Cancelled => f.write_str("Operation was cancelled"),
            Self::UnpaddingNotMatch(name) => {
                f.write_fmt(format_args!("unpadding failed by the `{name}`"))
            }
            Self::IOError(io_err) => f.write_fmt(format_args!("{}", io_err)),
            Self::Other(other) => f.write_str(other.as_str()),
        }
    }
}

impl Error for CipherError {}

impl From<std::io::Error> for CipherError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}
