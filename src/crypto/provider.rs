//! Cryptographic provider traits for pluggable crypto backends.
//!
//! The [`CryptoProvider`] struct holds static references to trait objects,
//! one per capability the handshake needs:
//!
//! - **Hash Provider** ([`HashProvider`]): Factory for transcript hash contexts
//! - **PRF Provider** ([`PrfProvider`]): TLS PRF for Finished digests and key expansion
//! - **Secure Random** ([`SecureRandom`]): Hello randoms
//!
//! # Using a Custom Provider
//!
//! ```
//! use tls_finish::crypto::{rust_crypto, CryptoProvider};
//! use tls_finish::Config;
//!
//! let provider = rust_crypto::default_provider();
//! let custom = CryptoProvider {
//!     hash_provider: provider.hash_provider,
//!     prf_provider: provider.prf_provider,
//!     secure_random: provider.secure_random,
//! };
//!
//! let config = Config::builder()
//!     .with_crypto_provider(custom)
//!     .build()
//!     .unwrap();
//! # let _ = config;
//! ```

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};
use std::sync::OnceLock;

use crate::buffer::Buf;
use crate::types::HashAlgorithm;

/// Marker trait for types that are safe to use in a crypto provider.
pub trait CryptoSafe: Send + Sync + Debug + UnwindSafe + RefUnwindSafe {}

/// Blanket implementation: any type satisfying the bounds implements [`CryptoSafe`].
impl<T: Send + Sync + Debug + UnwindSafe + RefUnwindSafe> CryptoSafe for T {}

/// Stateful hash context for incremental hashing.
pub trait HashContext: CryptoSafe {
    /// Update the hash with new data.
    fn update(&mut self, data: &[u8]);

    /// Clone the context and finalize it, writing the hash to `out`.
    /// The original context can continue to be updated.
    fn clone_and_finalize(&self, out: &mut Buf);
}

/// Hash provider (factory for HashContext).
pub trait HashProvider: CryptoSafe {
    /// Create a new hash context for the specified algorithm.
    fn create_hash(&self, algorithm: HashAlgorithm) -> Box<dyn HashContext>;
}

/// PRF (Pseudo-Random Function) as used by the TLS handshake.
pub trait PrfProvider: CryptoSafe {
    /// PRF(secret, label, seed) writing `output_len` bytes to `out`.
    /// Uses `scratch` for temporary concatenation of label+seed.
    #[allow(clippy::too_many_arguments)]
    fn prf_tls12(
        &self,
        secret: &[u8],
        label: &str,
        seed: &[u8],
        out: &mut Buf,
        output_len: usize,
        scratch: &mut Buf,
        hash: HashAlgorithm,
    ) -> Result<(), String>;
}

/// Secure random number generator.
pub trait SecureRandom: CryptoSafe {
    /// Fill buffer with cryptographically secure random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), String>;
}

/// Cryptographic provider for the handshake.
///
/// Static trait object references keep dispatch cheap and let the provider
/// be `Clone` without reference counting.
#[derive(Debug, Clone)]
pub struct CryptoProvider {
    /// Hash provider for the handshake transcript.
    pub hash_provider: &'static dyn HashProvider,

    /// PRF for Finished digests and key expansion.
    pub prf_provider: &'static dyn PrfProvider,

    /// Secure random number generator.
    pub secure_random: &'static dyn SecureRandom,
}

/// Static storage for the default crypto provider.
///
/// This is set by `install_default()` and retrieved by `get_default()`.
static DEFAULT: OnceLock<CryptoProvider> = OnceLock::new();

impl CryptoProvider {
    /// Install a default crypto provider for the process.
    ///
    /// Used by [`Config::builder()`](crate::Config::builder) when no explicit
    /// provider is given.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    pub fn install_default(provider: CryptoProvider) {
        DEFAULT
            .set(provider)
            .expect("CryptoProvider::install_default() called more than once");
    }

    /// Get the default crypto provider, if one has been installed.
    pub fn get_default() -> Option<&'static CryptoProvider> {
        DEFAULT.get()
    }
}
