//! Validation for crypto providers.
//!
//! A provider is checked once when the [`Config`](crate::Config) is built,
//! so a broken backend fails early instead of in the middle of a handshake.

use crate::buffer::Buf;
use crate::crypto::provider::CryptoProvider;
use crate::types::HashAlgorithm;
use crate::Error;

const REQUIRED_HASHES: &[HashAlgorithm] = &[HashAlgorithm::SHA256, HashAlgorithm::SHA384];

/// Hash of the empty input.
const HASH_TEST_VECTORS: &[(HashAlgorithm, &[u8])] = &[
    (
        HashAlgorithm::SHA256,
        &[
            0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f,
            0xb9, 0x24, 0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b,
            0x78, 0x52, 0xb8, 0x55,
        ],
    ),
    (
        HashAlgorithm::SHA384,
        &[
            0x38, 0xb0, 0x60, 0xa7, 0x51, 0xac, 0x96, 0x38, 0x4c, 0xd9, 0x32, 0x7e, 0xb1, 0xb1,
            0xe3, 0x6a, 0x21, 0xfd, 0xb7, 0x11, 0x14, 0xbe, 0x07, 0x43, 0x4c, 0x0c, 0xc7, 0xbf,
            0x63, 0xf6, 0xe1, 0xda, 0x27, 0x4e, 0xde, 0xbf, 0xe7, 0x6f, 0x65, 0xfb, 0xd5, 0x1a,
            0xd2, 0xf1, 0x48, 0x98, 0xb9, 0x5b,
        ],
    ),
];

impl CryptoProvider {
    /// Validates the provider for use with the handshake.
    ///
    /// - Hash providers produce known digests for every required algorithm
    /// - The PRF is deterministic and honours the requested length
    /// - The random source can fill a buffer
    ///
    /// Returns `Error::ConfigError` if validation fails.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_hash_provider()?;
        self.validate_prf_provider()?;
        self.validate_secure_random()?;
        Ok(())
    }

    fn validate_hash_provider(&self) -> Result<(), Error> {
        for hash_alg in REQUIRED_HASHES {
            let hasher = self.hash_provider.create_hash(*hash_alg);
            let mut result = Buf::new();
            hasher.clone_and_finalize(&mut result);

            let maybe_expected = HASH_TEST_VECTORS
                .iter()
                .find(|(h, _)| h == hash_alg)
                .map(|(_, v)| v);

            let Some(expected) = maybe_expected else {
                return Err(Error::ConfigError(format!(
                    "No expected hash data for hash algorithm: {:?}",
                    hash_alg
                )));
            };

            if result.as_ref() != *expected {
                return Err(Error::ConfigError(format!(
                    "Hash provider {:?} produced incorrect result",
                    hash_alg
                )));
            }
        }

        Ok(())
    }

    fn validate_prf_provider(&self) -> Result<(), Error> {
        let secret = b"test_secret";
        let label = "test label";
        let seed = b"test_seed";
        // Longer than one HMAC block for both hashes, so P_hash has to iterate.
        let output_len = 100;

        for &hash_alg in REQUIRED_HASHES {
            let mut first = Buf::new();
            let mut second = Buf::new();
            let mut scratch = Buf::new();

            for out in [&mut first, &mut second] {
                self.prf_provider
                    .prf_tls12(secret, label, seed, out, output_len, &mut scratch, hash_alg)
                    .map_err(|e| {
                        Error::ConfigError(format!("PRF provider failed for {:?}: {}", hash_alg, e))
                    })?;
            }

            if first.len() != output_len {
                return Err(Error::ConfigError(format!(
                    "PRF provider {:?} returned wrong length: expected {}, got {}",
                    hash_alg,
                    output_len,
                    first.len()
                )));
            }

            if first != second {
                return Err(Error::ConfigError(format!(
                    "PRF provider {:?} is not deterministic",
                    hash_alg
                )));
            }
        }

        Ok(())
    }

    fn validate_secure_random(&self) -> Result<(), Error> {
        let mut buf = [0u8; 32];
        self.secure_random
            .fill(&mut buf)
            .map_err(|e| Error::ConfigError(format!("Secure random failed: {}", e)))
    }
}
