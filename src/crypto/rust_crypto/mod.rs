//! RustCrypto cryptographic provider implementation.
//!
//! Pure Rust backend built on crates from the
//! [RustCrypto](https://github.com/RustCrypto) organization.
//!
//! # Usage
//!
//! This provider is used automatically when no other provider is set or
//! installed as the process default:
//!
//! ```
//! use std::sync::Arc;
//! use tls_finish::Config;
//! use tls_finish::crypto::rust_crypto;
//!
//! let config = Arc::new(
//!     Config::builder()
//!         .with_crypto_provider(rust_crypto::default_provider())
//!         .build()
//!         .unwrap()
//! );
//! # let _ = config;
//! ```

mod hash;
mod hmac;
mod tls12;

use crate::crypto::provider::CryptoProvider;

/// Get the default RustCrypto-based crypto provider.
///
/// # Supported Hash Algorithms
///
/// - SHA-256
/// - SHA-384
///
/// # PRF
///
/// P_hash over HMAC-SHA256 or HMAC-SHA384, used for Finished digests and
/// key expansion.
///
/// # Random Number Generation
///
/// Uses `OsRng` from the `rand` crate.
pub fn default_provider() -> CryptoProvider {
    CryptoProvider {
        hash_provider: &hash::HASH_PROVIDER,
        prf_provider: &tls12::PRF_PROVIDER,
        secure_random: &tls12::SECURE_RANDOM,
    }
}
