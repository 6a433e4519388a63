//! Handshake completion for TLS 1.2 and earlier (SSLv3 through TLS 1.2).
//!
//! This crate sequences a handshake, produces and verifies the Finished
//! messages, and commits the negotiated security parameters so the record
//! layer starts protecting traffic with them. Hello, certificate and key
//! exchange messages are left to a [`MessageHandler`] implementation, and
//! record encryption to whatever consults [`Connection::epoch_for`].
//!
//! Finished digests for every version are computed with the TLS 1.2 PRF over
//! the suite hash. TLS 1.2 interoperates with other stacks. SSLv3, TLS 1.0
//! and TLS 1.1 run end to end only between peers built on this crate; see
//! [`finished::compute_verify_data`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use tls_finish::{Config, Connection, Driver, Error, MessageHandler, Role, State};
//!
//! struct Hellos;
//!
//! impl MessageHandler for Hellos {
//!     fn send(&mut self, state: State, conn: &mut Connection) -> Result<(), Error> {
//!         // Write the message for `state` into conn.io_mut().
//!         Ok(())
//!     }
//!
//!     fn recv(&mut self, state: State, conn: &mut Connection) -> Result<(), Error> {
//!         // Read it from conn.io_mut(), call conn.negotiate() and friends.
//!         Ok(())
//!     }
//! }
//!
//! let config = Arc::new(Config::default());
//! let mut conn = Connection::new(config, Role::Client).unwrap();
//! let mut driver = Driver::new(Hellos);
//!
//! while !conn.is_handshake_over() {
//!     if Driver::<Hellos>::is_sending(&conn) {
//!         driver.advance(&mut conn).unwrap();
//!         let _to_send = conn.take_outgoing();
//!     } else {
//!         // conn.feed(&bytes_from_peer) before reading.
//!         driver.advance(&mut conn).unwrap();
//!     }
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(clippy::all)]

#[macro_use]
extern crate log;

mod buffer;
pub use buffer::Buf;

mod config;
pub use config::{Config, ConfigBuilder};

mod connection;
pub use connection::Connection;

pub mod crypto;

pub mod epoch;
pub use epoch::{Epoch, EpochRef, EpochState, KeyBlock, SequenceNumber};

mod error;
pub use error::Error;

pub mod finished;

pub mod handshake;
pub use handshake::{Driver, HandshakePath, MessageHandler, State, Step};

pub mod io;

pub mod message;

mod types;
pub use types::{
    CipherSuite, HashAlgorithm, ProtocolVersion, Role, MAX_FINISHED_LEN, SSL_FINISHED_LEN,
    TLS_FINISHED_LEN,
};
