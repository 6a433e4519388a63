use crate::types::Role;
use crate::Error;

/// Handshake message positions, in the order a full handshake visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    ClientHello,
    ServerHello,
    ServerCertificate,
    ServerKeyExchange,
    ServerCertificateRequest,
    ServerHelloDone,
    ClientCertificate,
    ClientKeyExchange,
    ClientCertificateVerify,
    ClientChangeCipherSpec,
    ClientFinished,
    ServerChangeCipherSpec,
    ServerFinished,
    HandshakeOver,
}

/// Which optional parts of the handshake are in play.
///
/// Decided by the hello exchange and handed to the connection through
/// `Connection::negotiate`. Until then the full path without optional
/// messages is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandshakePath {
    /// Abbreviated handshake on a resumed session. Server finishes first.
    pub resumed: bool,
    /// Server sends a ServerKeyExchange (ephemeral key exchange).
    pub ephemeral_key_exchange: bool,
    /// Server requests a client certificate and the client answers with
    /// Certificate and CertificateVerify.
    pub client_auth: bool,
}

impl HandshakePath {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn resumed() -> Self {
        HandshakePath {
            resumed: true,
            ..Default::default()
        }
    }
}

/// What the driver does in a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ChangeCipherSpec,
    Finished,
    /// Hello, certificate and key exchange messages, handled by a
    /// [`MessageHandler`](super::MessageHandler).
    External,
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::ClientHello => "ClientHello",
            State::ServerHello => "ServerHello",
            State::ServerCertificate => "ServerCertificate",
            State::ServerKeyExchange => "ServerKeyExchange",
            State::ServerCertificateRequest => "ServerCertificateRequest",
            State::ServerHelloDone => "ServerHelloDone",
            State::ClientCertificate => "ClientCertificate",
            State::ClientKeyExchange => "ClientKeyExchange",
            State::ClientCertificateVerify => "ClientCertificateVerify",
            State::ClientChangeCipherSpec => "ClientChangeCipherSpec",
            State::ClientFinished => "ClientFinished",
            State::ServerChangeCipherSpec => "ServerChangeCipherSpec",
            State::ServerFinished => "ServerFinished",
            State::HandshakeOver => "HandshakeOver",
        }
    }

    /// The role that writes the message of this state.
    ///
    /// `None` for the terminal state.
    pub fn writer(&self) -> Option<Role> {
        match self {
            State::ClientHello
            | State::ClientCertificate
            | State::ClientKeyExchange
            | State::ClientCertificateVerify
            | State::ClientChangeCipherSpec
            | State::ClientFinished => Some(Role::Client),

            State::ServerHello
            | State::ServerCertificate
            | State::ServerKeyExchange
            | State::ServerCertificateRequest
            | State::ServerHelloDone
            | State::ServerChangeCipherSpec
            | State::ServerFinished => Some(Role::Server),

            State::HandshakeOver => None,
        }
    }

    /// Dispatch entry for this state. `None` for the terminal state.
    pub fn step(&self) -> Option<Step> {
        match self {
            State::ClientChangeCipherSpec | State::ServerChangeCipherSpec => {
                Some(Step::ChangeCipherSpec)
            }
            State::ClientFinished | State::ServerFinished => Some(Step::Finished),
            State::HandshakeOver => None,
            _ => Some(Step::External),
        }
    }

    /// Whether the message of this state goes into the transcript.
    pub fn in_transcript(&self) -> bool {
        !matches!(self.step(), Some(Step::ChangeCipherSpec) | None)
    }

    /// The state following this one once its message has been written by
    /// `written_by`.
    ///
    /// This is the only place transitions are defined.
    pub fn next(self, path: HandshakePath, written_by: Role) -> Result<State, Error> {
        let unexpected = Error::UnexpectedMessage {
            state: self,
            from: written_by,
        };

        if self.writer() != Some(written_by) {
            return Err(unexpected);
        }

        let next = if path.resumed {
            match self {
                State::ClientHello => State::ServerHello,
                State::ServerHello => State::ServerChangeCipherSpec,
                State::ServerChangeCipherSpec => State::ServerFinished,
                State::ServerFinished => State::ClientChangeCipherSpec,
                State::ClientChangeCipherSpec => State::ClientFinished,
                State::ClientFinished => State::HandshakeOver,
                _ => return Err(unexpected),
            }
        } else {
            match self {
                State::ClientHello => State::ServerHello,
                State::ServerHello => State::ServerCertificate,
                State::ServerCertificate if path.ephemeral_key_exchange => {
                    State::ServerKeyExchange
                }
                State::ServerCertificate | State::ServerKeyExchange if path.client_auth => {
                    State::ServerCertificateRequest
                }
                State::ServerCertificate
                | State::ServerKeyExchange
                | State::ServerCertificateRequest => State::ServerHelloDone,
                State::ServerHelloDone if path.client_auth => State::ClientCertificate,
                State::ServerHelloDone | State::ClientCertificate => State::ClientKeyExchange,
                State::ClientKeyExchange if path.client_auth => State::ClientCertificateVerify,
                State::ClientKeyExchange | State::ClientCertificateVerify => {
                    State::ClientChangeCipherSpec
                }
                State::ClientChangeCipherSpec => State::ClientFinished,
                State::ClientFinished => State::ServerChangeCipherSpec,
                State::ServerChangeCipherSpec => State::ServerFinished,
                State::ServerFinished => State::HandshakeOver,
                State::HandshakeOver => return Err(unexpected),
            }
        };

        Ok(next)
    }
}
