//! Protocol identifiers shared by the handshake, epoch and crypto modules.

use std::fmt;

use nom::number::complete::{be_u16, be_u8};
use nom::sequence::tuple;
use nom::IResult;

use crate::Error;

/// Length of the Finished body for SSLv3 (MD5 + SHA-1 sized).
pub const SSL_FINISHED_LEN: usize = 36;

/// Length of the Finished body for the TLS family.
pub const TLS_FINISHED_LEN: usize = 12;

/// Largest Finished body across all versions.
pub const MAX_FINISHED_LEN: usize = SSL_FINISHED_LEN;

/// Supported protocol versions.
///
/// Closed set: every version carries its own Finished length, so there is
/// no way to end up with a length that was not pinned by negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum ProtocolVersion {
    SSLv3,
    TLS1_0,
    TLS1_1,
    TLS1_2,
}

impl ProtocolVersion {
    /// Map the two wire bytes to a version.
    pub fn from_wire(major: u8, minor: u8) -> Result<Self, Error> {
        match (major, minor) {
            (3, 0) => Ok(ProtocolVersion::SSLv3),
            (3, 1) => Ok(ProtocolVersion::TLS1_0),
            (3, 2) => Ok(ProtocolVersion::TLS1_1),
            (3, 3) => Ok(ProtocolVersion::TLS1_2),
            _ => Err(Error::UnsupportedTlsVersion(major, minor)),
        }
    }

    /// The two wire bytes of this version.
    pub fn as_wire(&self) -> [u8; 2] {
        match self {
            ProtocolVersion::SSLv3 => [3, 0],
            ProtocolVersion::TLS1_0 => [3, 1],
            ProtocolVersion::TLS1_1 => [3, 2],
            ProtocolVersion::TLS1_2 => [3, 3],
        }
    }

    /// Parse a version from network byte order.
    pub fn parse(input: &[u8]) -> Result<(&[u8], ProtocolVersion), Error> {
        let parsed: IResult<&[u8], (u8, u8)> = tuple((be_u8, be_u8))(input);
        let (rest, (major, minor)) = parsed?;
        Ok((rest, Self::from_wire(major, minor)?))
    }

    /// Length in bytes of the Finished verify_data.
    pub fn finished_len(&self) -> usize {
        match self {
            ProtocolVersion::SSLv3 => SSL_FINISHED_LEN,
            ProtocolVersion::TLS1_0 | ProtocolVersion::TLS1_1 | ProtocolVersion::TLS1_2 => {
                TLS_FINISHED_LEN
            }
        }
    }

    /// Whether this is a member of the TLS family (as opposed to SSLv3).
    pub fn is_tls(&self) -> bool {
        !matches!(self, ProtocolVersion::SSLv3)
    }

    /// All supported versions, oldest first.
    pub const fn all() -> &'static [ProtocolVersion; 4] {
        &[
            ProtocolVersion::SSLv3,
            ProtocolVersion::TLS1_0,
            ProtocolVersion::TLS1_1,
            ProtocolVersion::TLS1_2,
        ]
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProtocolVersion::SSLv3 => "SSL 3.0",
            ProtocolVersion::TLS1_0 => "TLS 1.0",
            ProtocolVersion::TLS1_1 => "TLS 1.1",
            ProtocolVersion::TLS1_2 => "TLS 1.2",
        };
        write!(f, "{}", s)
    }
}

/// Which end of the connection we are.
///
/// Also used to name a traffic direction: the direction of the records a
/// role writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Client,
    Server,
}

impl Role {
    /// The other end.
    pub fn peer(&self) -> Role {
        match self {
            Role::Client => Role::Server,
            Role::Server => Role::Client,
        }
    }

    /// Label mixed into the Finished digest for messages written by this role.
    pub fn finished_label(&self, version: ProtocolVersion) -> &'static str {
        match (version.is_tls(), self) {
            (true, Role::Client) => "client finished",
            (true, Role::Server) => "server finished",
            (false, Role::Client) => "CLNT",
            (false, Role::Server) => "SRVR",
        }
    }
}

/// Hash algorithms usable for the transcript and PRF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    SHA256,
    SHA384,
}

impl HashAlgorithm {
    /// Output length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::SHA256 => 32,
            HashAlgorithm::SHA384 => 48,
        }
    }
}

/// Cipher suite identity carried by an epoch.
///
/// The bulk ciphers are not implemented here, only the parameters the
/// handshake needs: PRF hash and key block geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum CipherSuite {
    /// The initial suite. No protection.
    #[default]
    NULL_WITH_NULL_NULL, // 0x0000
    RSA_AES128_CBC_SHA256,         // 0x003C
    ECDHE_RSA_AES128_GCM_SHA256,   // 0xC02F
    ECDHE_RSA_AES256_GCM_SHA384,   // 0xC030
    ECDHE_ECDSA_AES128_GCM_SHA256, // 0xC02B
    ECDHE_ECDSA_AES256_GCM_SHA384, // 0xC02C

    /// Unknown or unsupported cipher suite by its IANA value
    Unknown(u16),
}

impl CipherSuite {
    /// Convert the 16-bit IANA value to a `CipherSuite`.
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0000 => CipherSuite::NULL_WITH_NULL_NULL,
            0x003C => CipherSuite::RSA_AES128_CBC_SHA256,
            0xC02F => CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
            0xC030 => CipherSuite::ECDHE_RSA_AES256_GCM_SHA384,
            0xC02B => CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256,
            0xC02C => CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384,
            _ => CipherSuite::Unknown(value),
        }
    }

    /// Return the 16-bit IANA value for this cipher suite.
    pub fn as_u16(&self) -> u16 {
        match self {
            CipherSuite::NULL_WITH_NULL_NULL => 0x0000,
            CipherSuite::RSA_AES128_CBC_SHA256 => 0x003C,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256 => 0xC02F,
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384 => 0xC030,
            CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256 => 0xC02B,
            CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384 => 0xC02C,
            CipherSuite::Unknown(value) => *value,
        }
    }

    /// Parse a `CipherSuite` from network byte order.
    pub fn parse(input: &[u8]) -> IResult<&[u8], CipherSuite> {
        let (input, value) = be_u16(input)?;
        Ok((input, CipherSuite::from_u16(value)))
    }

    /// The hash algorithm used by the PRF and transcript for this suite.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        match self {
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384
            | CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384 => HashAlgorithm::SHA384,
            _ => HashAlgorithm::SHA256,
        }
    }

    /// Key material lengths: (mac_key_len, enc_key_len, fixed_iv_len).
    #[rustfmt::skip]
    pub fn key_lengths(&self) -> (usize, usize, usize) {
        match self {
            CipherSuite::RSA_AES128_CBC_SHA256         => (32, 16, 16),
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256
            | CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256 => (0, 16, 4),
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384
            | CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384 => (0, 32, 4),
            CipherSuite::NULL_WITH_NULL_NULL
            | CipherSuite::Unknown(_)                  => (0, 0, 0),
        }
    }

    /// Returns true if this suite can be negotiated.
    pub fn is_supported(&self) -> bool {
        !matches!(
            self,
            CipherSuite::NULL_WITH_NULL_NULL | CipherSuite::Unknown(_)
        )
    }
}
