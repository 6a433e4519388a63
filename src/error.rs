use thiserror::Error;

use crate::handshake::State;
use crate::types::{ProtocolVersion, Role};

/// Errors produced while driving a handshake.
///
/// All of these are fatal to the handshake. A failed connection must be
/// discarded and a new one started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The handshake stream holds fewer bytes than the message requires.
    #[error("Too short: needed {needed} bytes, {available} available")]
    TooShort { needed: usize, available: usize },

    /// A handshake message body could not be parsed.
    #[error("Parse error: {0:?}")]
    ParseError(nom::error::ErrorKind),

    /// The peer's Finished message did not verify.
    ///
    /// Deliberately covers both a digest mismatch and an earlier key
    /// exchange failure.
    #[error("Invalid finished message received")]
    InvalidFinished,

    /// A message arrived from a role that is not the writer of the current state.
    #[error("Unexpected message in state {state:?} from {from:?}")]
    UnexpectedMessage { state: State, from: Role },

    /// Internal precondition not met (missing secret, missing version...).
    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    /// A previous step failed and the handshake can not continue.
    #[error("Handshake aborted")]
    HandshakeAborted,

    /// The handshake already reached its terminal state.
    #[error("Handshake complete")]
    HandshakeComplete,

    /// A sequence number would wrap.
    #[error("Sequence number overflow")]
    SequenceOverflow,

    /// The incoming handshake buffer is full.
    #[error("Receive buffer full")]
    ReceiveBufferFull,

    #[error("Unsupported TLS version {0}, {1}")]
    UnsupportedTlsVersion(u8, u8),

    /// A protocol version outside the configured range was negotiated.
    #[error("Protocol version not allowed: {0}")]
    VersionNotAllowed(ProtocolVersion),

    /// The server requires a client certificate but the path does not have one.
    #[error("Client certificate required")]
    CertificateRequired,

    #[error("Crypto error: {0}")]
    CryptoError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl<'a> From<nom::Err<nom::error::Error<&'a [u8]>>> for Error {
    fn from(value: nom::Err<nom::error::Error<&'a [u8]>>) -> Self {
        match value {
            nom::Err::Incomplete(_) => Error::ParseError(nom::error::ErrorKind::Eof),
            nom::Err::Error(e) | nom::Err::Failure(e) => Error::ParseError(e.code),
        }
    }
}
