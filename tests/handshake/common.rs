//! Shared helpers for handshake integration tests.
//!
//! A [`Peer`] pairs a connection with a driver whose [`TestHandler`] speaks a
//! toy hello and key exchange: just enough for both sides to agree on
//! version, suite, path, randoms and master secret.

#![allow(unused)]

use std::sync::Arc;

use tls_finish::message::Random;
use tls_finish::{
    Buf, CipherSuite, Config, Connection, Driver, Error, HandshakePath, MessageHandler,
    ProtocolVersion, Role, State,
};

pub const MASTER_SECRET: [u8; 48] = [0x4D; 48];

/// What the client offers and the server accepts.
#[derive(Debug, Clone, Copy)]
pub struct Offer {
    pub version: ProtocolVersion,
    pub suite: CipherSuite,
    pub path: HandshakePath,
}

impl Default for Offer {
    fn default() -> Self {
        Offer {
            version: ProtocolVersion::TLS1_2,
            suite: CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
            path: HandshakePath::full(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TestHandler {
    pub offer: Offer,
    /// Server side: pretend the premaster secret did not decrypt.
    pub fail_key_exchange: bool,
    /// External messages seen, sent or received.
    pub seen: Vec<State>,
}

fn encode_path(path: HandshakePath) -> u8 {
    (path.resumed as u8)
        | ((path.ephemeral_key_exchange as u8) << 1)
        | ((path.client_auth as u8) << 2)
}

fn decode_path(flags: u8) -> HandshakePath {
    HandshakePath {
        resumed: flags & 1 != 0,
        ephemeral_key_exchange: flags & 2 != 0,
        client_auth: flags & 4 != 0,
    }
}

const HELLO_LEN: usize = 2 + 32 + 2 + 1;

fn write_hello(conn: &mut Connection, offer: &Offer) -> Result<(), Error> {
    let random = *conn
        .local_random()
        .ok_or(Error::InvariantViolation("no local random"))?;

    let mut out = Buf::new();
    out.extend_from_slice(&offer.version.as_wire());
    random.serialize(&mut out);
    out.extend_from_slice(&offer.suite.as_u16().to_be_bytes());
    out.push(encode_path(offer.path));
    conn.io_mut().write_bytes(&out);
    Ok(())
}

fn read_hello(conn: &mut Connection) -> Result<(), Error> {
    let body = conn.io_mut().read_bytes(HELLO_LEN)?.to_vec();

    let (rest, version) = ProtocolVersion::parse(&body)?;
    let (rest, random) = Random::parse(rest)?;
    let (rest, suite) = CipherSuite::parse(rest)?;
    let path = decode_path(rest[0]);

    conn.set_peer_random(random);
    conn.negotiate(version, suite, path)
}

fn start_resumed(conn: &mut Connection) -> Result<(), Error> {
    if conn.path().resumed {
        conn.set_master_secret(&MASTER_SECRET);
        conn.install_pending_keys()?;
    }
    Ok(())
}

impl MessageHandler for TestHandler {
    fn send(&mut self, state: State, conn: &mut Connection) -> Result<(), Error> {
        self.seen.push(state);
        match state {
            State::ClientHello => write_hello(conn, &self.offer),
            State::ServerHello => {
                write_hello(conn, &self.offer)?;
                start_resumed(conn)
            }
            State::ClientKeyExchange => {
                conn.io_mut().write_bytes(&MASTER_SECRET);
                conn.set_master_secret(&MASTER_SECRET);
                conn.install_pending_keys()
            }
            _ => {
                conn.io_mut().write_bytes(&[state as u8]);
                Ok(())
            }
        }
    }

    fn recv(&mut self, state: State, conn: &mut Connection) -> Result<(), Error> {
        self.seen.push(state);
        match state {
            State::ClientHello => read_hello(conn),
            State::ServerHello => {
                read_hello(conn)?;
                start_resumed(conn)
            }
            State::ClientKeyExchange => {
                let secret = conn.io_mut().read_bytes(MASTER_SECRET.len())?.to_vec();
                conn.set_master_secret(&secret);
                conn.install_pending_keys()?;
                if self.fail_key_exchange {
                    conn.mark_key_exchange_failed();
                }
                Ok(())
            }
            _ => {
                let got = conn.io_mut().read_bytes(1)?[0];
                if got != state as u8 {
                    return Err(Error::UnexpectedMessage {
                        state,
                        from: conn.role().peer(),
                    });
                }
                Ok(())
            }
        }
    }
}

pub struct Peer {
    pub conn: Connection,
    pub driver: Driver<TestHandler>,
}

impl Peer {
    pub fn new(config: Arc<Config>, role: Role, handler: TestHandler) -> Peer {
        Peer {
            conn: Connection::new(config, role).expect("new connection"),
            driver: Driver::new(handler),
        }
    }

    pub fn pair(offer: Offer) -> (Peer, Peer) {
        let config = Arc::new(
            Config::builder()
                .min_protocol_version(ProtocolVersion::SSLv3)
                .build()
                .expect("build config"),
        );
        let client = Peer::new(
            config.clone(),
            Role::Client,
            TestHandler {
                offer,
                ..Default::default()
            },
        );
        let server = Peer::new(
            config,
            Role::Server,
            TestHandler {
                offer,
                ..Default::default()
            },
        );
        (client, server)
    }

    pub fn is_sending(&self) -> bool {
        Driver::<TestHandler>::is_sending(&self.conn)
    }

    pub fn advance(&mut self) -> Result<(), Error> {
        self.driver.advance(&mut self.conn)
    }
}

/// Which side failed, and how.
#[derive(Debug, PartialEq, Eq)]
pub struct Failure {
    pub role: Role,
    pub state: State,
    pub error: Error,
}

/// Move one message from the sending peer to the receiving one. `tamper`
/// sees the bytes in flight.
pub fn exchange_one(
    client: &mut Peer,
    server: &mut Peer,
    tamper: &mut dyn FnMut(State, &mut Vec<u8>),
) -> Result<(), Failure> {
    let (from, to) = if client.is_sending() {
        (client, server)
    } else {
        (server, client)
    };

    let state = from.conn.state();
    from.advance().map_err(|error| Failure {
        role: from.conn.role(),
        state,
        error,
    })?;

    let mut bytes = from.conn.take_outgoing().into_vec();
    tamper(state, &mut bytes);

    let role = to.conn.role();
    let fail = move |error| Failure { role, state, error };
    to.conn.feed(&bytes).map_err(fail)?;
    to.advance().map_err(fail)
}

/// Run both peers until the handshake is over or one side fails.
pub fn run_with(
    client: &mut Peer,
    server: &mut Peer,
    mut tamper: impl FnMut(State, &mut Vec<u8>),
) -> Result<(), Failure> {
    while !(client.conn.is_handshake_over() && server.conn.is_handshake_over()) {
        exchange_one(client, server, &mut tamper)?;
    }
    Ok(())
}

pub fn run(client: &mut Peer, server: &mut Peer) -> Result<(), Failure> {
    run_with(client, server, |_, _| {})
}

/// Run until the next message to move is the one for `state`.
pub fn run_until(client: &mut Peer, server: &mut Peer, state: State) -> Result<(), Failure> {
    while client.conn.state() != state {
        exchange_one(client, server, &mut |_, _| {})?;
    }
    Ok(())
}
