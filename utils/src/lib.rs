mod block;
pub use block::Block;

mod biguint_ext;
pub use biguint_ext::BigUintExt;

mod bigint_ext;
pub use bigint_ext::BigIntExt;

mod num;
pub use num::{extended_gcd, gcd, jacobi, legendre, mod_pow};
