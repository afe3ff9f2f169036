pub mod bignum;
pub mod error;
pub mod rand;

pub use bignum::{BigUnsigned, Workspace};
pub use error::{Error, Status};
