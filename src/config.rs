use crate::crypto::{rust_crypto, CryptoProvider};
use crate::types::ProtocolVersion;
use crate::Error;

/// Handshake configuration
#[derive(Clone)]
pub struct Config {
    min_protocol_version: ProtocolVersion,
    max_protocol_version: ProtocolVersion,
    require_client_certificate: bool,
    max_incoming_bytes: usize,
    crypto_provider: CryptoProvider,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            min_protocol_version: ProtocolVersion::TLS1_0,
            max_protocol_version: ProtocolVersion::TLS1_2,
            require_client_certificate: false,
            max_incoming_bytes: 64 * 1024,
            crypto_provider: None,
        }
    }

    /// Lowest protocol version a connection may negotiate.
    #[inline(always)]
    pub fn min_protocol_version(&self) -> ProtocolVersion {
        self.min_protocol_version
    }

    /// Highest protocol version a connection may negotiate.
    #[inline(always)]
    pub fn max_protocol_version(&self) -> ProtocolVersion {
        self.max_protocol_version
    }

    /// For a server, require a client certificate.
    ///
    /// Makes the server refuse a handshake path without client authentication.
    #[inline(always)]
    pub fn require_client_certificate(&self) -> bool {
        self.require_client_certificate
    }

    /// Max amount of unread handshake bytes to buffer before rejecting more input.
    #[inline(always)]
    pub fn max_incoming_bytes(&self) -> usize {
        self.max_incoming_bytes
    }

    /// Cryptographic provider.
    ///
    /// Provides the transcript hash, PRF and random source.
    #[inline(always)]
    pub fn crypto_provider(&self) -> &CryptoProvider {
        &self.crypto_provider
    }

    /// Whether `version` lies inside the configured range.
    pub fn allows_version(&self, version: ProtocolVersion) -> bool {
        version >= self.min_protocol_version && version <= self.max_protocol_version
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("min_protocol_version", &self.min_protocol_version)
            .field("max_protocol_version", &self.max_protocol_version)
            .field(
                "require_client_certificate",
                &self.require_client_certificate,
            )
            .field("max_incoming_bytes", &self.max_incoming_bytes)
            .finish_non_exhaustive()
    }
}

/// Builder for handshake configuration.
pub struct ConfigBuilder {
    min_protocol_version: ProtocolVersion,
    max_protocol_version: ProtocolVersion,
    require_client_certificate: bool,
    max_incoming_bytes: usize,
    crypto_provider: Option<CryptoProvider>,
}

impl ConfigBuilder {
    /// Set the lowest protocol version to accept.
    ///
    /// Defaults to TLS 1.0.
    pub fn min_protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.min_protocol_version = version;
        self
    }

    /// Set the highest protocol version to accept.
    ///
    /// Defaults to TLS 1.2.
    pub fn max_protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.max_protocol_version = version;
        self
    }

    /// Set whether to require a client certificate (for servers).
    ///
    /// Defaults to false.
    pub fn require_client_certificate(mut self, require: bool) -> Self {
        self.require_client_certificate = require;
        self
    }

    /// Set the max amount of unread handshake bytes to buffer.
    ///
    /// Defaults to 64 KiB.
    pub fn max_incoming_bytes(mut self, max: usize) -> Self {
        self.max_incoming_bytes = max;
        self
    }

    /// Set a custom crypto provider.
    ///
    /// If not set, the installed default is used, and failing that the
    /// RustCrypto provider.
    pub fn with_crypto_provider(mut self, provider: CryptoProvider) -> Self {
        self.crypto_provider = Some(provider);
        self
    }

    /// Build the configuration.
    ///
    /// This validates the version range and the crypto provider.
    /// Returns `Error::ConfigError` if either is invalid.
    ///
    /// The crypto provider is selected in the following priority order:
    /// 1. Explicit provider set via `with_crypto_provider()`
    /// 2. Default provider installed via `CryptoProvider::install_default()`
    /// 3. RustCrypto provider
    pub fn build(self) -> Result<Config, Error> {
        if self.min_protocol_version > self.max_protocol_version {
            return Err(Error::ConfigError(format!(
                "min protocol version {} above max {}",
                self.min_protocol_version, self.max_protocol_version
            )));
        }

        // A Finished message must fit alongside the other messages of a flight.
        if self.max_incoming_bytes < crate::types::MAX_FINISHED_LEN {
            return Err(Error::ConfigError(format!(
                "max_incoming_bytes {} too small",
                self.max_incoming_bytes
            )));
        }

        let crypto_provider = self
            .crypto_provider
            .or_else(|| CryptoProvider::get_default().cloned())
            .unwrap_or_else(rust_crypto::default_provider);

        // Always validate the crypto provider
        crypto_provider.validate()?;

        Ok(Config {
            min_protocol_version: self.min_protocol_version,
            max_protocol_version: self.max_protocol_version,
            require_client_certificate: self.require_client_certificate,
            max_incoming_bytes: self.max_incoming_bytes,
            crypto_provider,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builder()
            .build()
            .expect("Default config should always validate")
    }
}
