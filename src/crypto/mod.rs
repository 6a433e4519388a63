//! Cryptographic primitives and helpers used by the handshake.

pub mod constant_time;
pub mod provider;
pub mod rust_crypto;

mod prf;
mod validation;

pub use constant_time::equals;
pub use provider::{CryptoProvider, CryptoSafe, HashContext, HashProvider};
pub use provider::{PrfProvider, SecureRandom};

pub use crate::buffer::Buf;
pub use crate::types::HashAlgorithm;

pub use prf::VerifyData;

pub(crate) use prf::{compute_verify_data, key_expansion};
