mod error;
pub use error::CipherError;

mod cancel;
pub use cancel::CancelToken;

pub mod bits;

pub mod gf256;

pub mod primality;

pub mod feistel;

pub mod block_cipher;
pub use block_cipher::{
    BlockCipher, BlockDecrypt, BlockEncrypt, BlockSized, Deal, Des, Rc6, Rijndael, TripleDes,
};

pub mod cipher_mode;

mod context;
pub use context::CipherContext;

mod builder;
pub use builder::{BlockCipherKind, CipherBuilder, DynCipherContext, ModeKind, PaddingKind};

pub mod rsa;

pub mod dh;
