use std::sync::Arc;
use std::time::SystemTime;

use zeroize::Zeroizing;

use crate::buffer::Buf;
use crate::crypto::VerifyData;
use crate::epoch::{Epoch, EpochState, KeyBlock, SequenceNumber};
use crate::handshake::{HandshakePath, State};
use crate::io::{HandshakeIo, Transcript};
use crate::message::Random;
use crate::types::{CipherSuite, ProtocolVersion, Role};
use crate::{Config, Error};

/// Progress of the handshake itself.
#[derive(Debug)]
pub(crate) struct Handshake {
    pub(crate) state: State,
    pub(crate) io: HandshakeIo,
    pub(crate) transcript: Transcript,
    /// Digest computed for the last received Finished.
    pub(crate) expected_finished: VerifyData,
    /// Set by the key exchange collaborator. Makes Finished verification
    /// fail regardless of the digest.
    pub(crate) key_exchange_failed: bool,
    pub(crate) aborted: bool,
}

/// One side of one session.
///
/// Owns everything the handshake steps touch: negotiated parameters, the
/// handshake stream and transcript, and the epoch state the record layer
/// consults.
pub struct Connection {
    config: Arc<Config>,
    role: Role,
    version: Option<ProtocolVersion>,
    cipher_suite: CipherSuite,
    path: HandshakePath,
    pub(crate) handshake: Handshake,
    epochs: EpochState,
    client_random: Option<Random>,
    server_random: Option<Random>,
    master_secret: Option<Zeroizing<Buf>>,
}

impl Connection {
    /// Create a connection for `role`.
    ///
    /// The local hello random is generated here.
    pub fn new(config: Arc<Config>, role: Role) -> Result<Self, Error> {
        let random = Random::new(
            SystemTime::now(),
            config.crypto_provider().secure_random,
        )?;

        let (client_random, server_random) = match role {
            Role::Client => (Some(random), None),
            Role::Server => (None, Some(random)),
        };

        let max_incoming = config.max_incoming_bytes();

        Ok(Connection {
            config,
            role,
            version: None,
            cipher_suite: CipherSuite::NULL_WITH_NULL_NULL,
            path: HandshakePath::default(),
            handshake: Handshake {
                state: State::ClientHello,
                io: HandshakeIo::new(max_incoming),
                transcript: Transcript::new(),
                expected_finished: VerifyData::default(),
                key_exchange_failed: false,
                aborted: false,
            },
            epochs: EpochState::new(),
            client_random,
            server_random,
            master_secret: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> State {
        self.handshake.state
    }

    pub fn is_handshake_over(&self) -> bool {
        self.handshake.state == State::HandshakeOver
    }

    pub fn is_aborted(&self) -> bool {
        self.handshake.aborted
    }

    /// Negotiated protocol version, if the hello exchange is done.
    pub fn version(&self) -> Option<ProtocolVersion> {
        self.version
    }

    pub fn cipher_suite(&self) -> CipherSuite {
        self.cipher_suite
    }

    pub fn path(&self) -> HandshakePath {
        self.path
    }

    /// Record the outcome of the hello exchange.
    ///
    /// Succeeds at most once per connection. Later calls fail with
    /// [`Error::InvariantViolation`] and leave version, suite and path as
    /// they were.
    pub fn negotiate(
        &mut self,
        version: ProtocolVersion,
        cipher_suite: CipherSuite,
        path: HandshakePath,
    ) -> Result<(), Error> {
        if self.version.is_some() {
            return Err(Error::InvariantViolation(
                "protocol version already negotiated",
            ));
        }

        if !self.config.allows_version(version) {
            return Err(Error::VersionNotAllowed(version));
        }

        if !cipher_suite.is_supported() {
            return Err(Error::CryptoError(format!(
                "Unsupported cipher suite: {:?}",
                cipher_suite
            )));
        }

        if self.role == Role::Server
            && self.config.require_client_certificate()
            && !path.resumed
            && !path.client_auth
        {
            return Err(Error::CertificateRequired);
        }

        debug!(
            "Negotiated {} {:?} resumed={} ephemeral={} client_auth={}",
            version,
            cipher_suite,
            path.resumed,
            path.ephemeral_key_exchange,
            path.client_auth
        );

        self.version = Some(version);
        self.cipher_suite = cipher_suite;
        self.path = path;
        Ok(())
    }

    pub fn client_random(&self) -> Option<&Random> {
        self.client_random.as_ref()
    }

    pub fn server_random(&self) -> Option<&Random> {
        self.server_random.as_ref()
    }

    /// The random this side contributes to the hello exchange.
    pub fn local_random(&self) -> Option<&Random> {
        match self.role {
            Role::Client => self.client_random(),
            Role::Server => self.server_random(),
        }
    }

    /// Set both hello randoms, as carried by ClientHello and ServerHello.
    pub fn set_randoms(&mut self, client_random: Random, server_random: Random) {
        self.client_random = Some(client_random);
        self.server_random = Some(server_random);
    }

    /// Set the peer's hello random, keeping the local one.
    pub fn set_peer_random(&mut self, random: Random) {
        match self.role {
            Role::Client => self.server_random = Some(random),
            Role::Server => self.client_random = Some(random),
        }
    }

    pub fn set_master_secret(&mut self, master_secret: &[u8]) {
        self.master_secret = Some(Zeroizing::new(Buf::from_slice(master_secret)));
    }

    pub(crate) fn master_secret(&self) -> Option<&[u8]> {
        self.master_secret.as_deref().map(|b| &b[..])
    }

    /// Derive the key block from the master secret and randoms and make it
    /// the pending epoch.
    pub fn install_pending_keys(&mut self) -> Result<(), Error> {
        let master_secret = self
            .master_secret
            .as_deref()
            .ok_or(Error::InvariantViolation("no master secret"))?;
        let client_random = self
            .client_random
            .ok_or(Error::InvariantViolation("no client random"))?;
        let server_random = self
            .server_random
            .ok_or(Error::InvariantViolation("no server random"))?;

        let keys = KeyBlock::derive(
            self.config.crypto_provider(),
            self.cipher_suite,
            master_secret,
            &client_random.to_bytes(),
            &server_random.to_bytes(),
        )?;

        self.epochs
            .install_pending(Epoch::new(self.cipher_suite, keys))
    }

    /// Flag that the key exchange went wrong.
    ///
    /// The handshake continues, but the peer's Finished will not verify.
    pub fn mark_key_exchange_failed(&mut self) {
        self.handshake.key_exchange_failed = true;
    }

    pub fn key_exchange_failed(&self) -> bool {
        self.handshake.key_exchange_failed
    }

    pub fn io(&self) -> &HandshakeIo {
        &self.handshake.io
    }

    pub fn io_mut(&mut self) -> &mut HandshakeIo {
        &mut self.handshake.io
    }

    /// Bytes received from the transport.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), Error> {
        self.handshake.io.feed(data)
    }

    /// Bytes to hand to the transport.
    pub fn take_outgoing(&mut self) -> Buf {
        self.handshake.io.take_outgoing()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.handshake.transcript
    }

    /// Digest computed for the last received Finished message.
    pub fn expected_finished(&self) -> &[u8] {
        &self.handshake.expected_finished
    }

    pub fn epochs(&self) -> &EpochState {
        &self.epochs
    }

    pub(crate) fn epochs_mut(&mut self) -> &mut EpochState {
        &mut self.epochs
    }

    /// Epoch protecting records written by `direction`.
    pub fn epoch_for(&self, direction: Role) -> &Epoch {
        self.epochs.epoch_for(direction)
    }

    /// Sequence number for the next record written by `direction`.
    pub fn next_sequence(&mut self, direction: Role) -> Result<SequenceNumber, Error> {
        self.epochs.next_sequence(direction)
    }

    pub(crate) fn abort(&mut self) {
        self.handshake.aborted = true;
        self.epochs.discard_pending();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("role", &self.role)
            .field("version", &self.version)
            .field("cipher_suite", &self.cipher_suite)
            .field("path", &self.path)
            .field("state", &self.handshake.state)
            .field("aborted", &self.handshake.aborted)
            .field("epochs", &self.epochs)
            .finish_non_exhaustive()
    }
}
