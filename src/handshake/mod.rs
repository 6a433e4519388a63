//! Handshake driver.
//!
//! The driver walks a [`Connection`] through the handshake one message at a
//! time. Which message comes next is decided by [`State::next`] alone; what
//! is done for a message is decided by its [`Step`]:
//!
//! * ChangeCipherSpec and Finished are handled here.
//! * Everything else (hellos, certificates, key exchange) goes to a
//!   [`MessageHandler`] supplied by the caller.
//!
//! The local role decides between sending and receiving. Any failure is
//! fatal: the connection is marked aborted and its pending epoch discarded.

mod state;

pub use state::{HandshakePath, State, Step};

use crate::buffer::Buf;
use crate::connection::Connection;
use crate::finished::{finished_recv, finished_send};
use crate::message::ChangeCipherSpec;
use crate::types::Role;
use crate::Error;

/// Collaborator for the messages the driver does not handle itself.
///
/// `send` writes the message of `state` to `conn.io_mut()`, `recv` reads it
/// from there. Either may record negotiated parameters on the connection
/// (`negotiate`, `set_peer_random`, `set_master_secret`,
/// `install_pending_keys`, `mark_key_exchange_failed`).
///
/// A handler may `feed` more bytes or `take_outgoing` in the middle of a
/// step. The message bytes of the step are still recorded in full.
pub trait MessageHandler {
    fn send(&mut self, state: State, conn: &mut Connection) -> Result<(), Error>;

    fn recv(&mut self, state: State, conn: &mut Connection) -> Result<(), Error>;
}

/// Runs handshake steps for one connection.
#[derive(Debug)]
pub struct Driver<H> {
    handler: H,
}

impl<H: MessageHandler> Driver<H> {
    pub fn new(handler: H) -> Self {
        Driver { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Send or receive the message of the current state and move to the
    /// next state.
    ///
    /// Exactly one message per call. Whether a step sends or receives is
    /// given by [`Driver::is_sending`].
    pub fn advance(&mut self, conn: &mut Connection) -> Result<(), Error> {
        if conn.is_aborted() {
            return Err(Error::HandshakeAborted);
        }
        if conn.is_handshake_over() {
            return Err(Error::HandshakeComplete);
        }

        let state = conn.state();
        match self.run_step(conn, state) {
            Ok(next) => {
                trace!("{:?} -> {:?}", state, next);
                conn.handshake.state = next;
                if next == State::HandshakeOver {
                    debug!("Handshake complete ({:?})", conn.role());
                }
                Ok(())
            }
            Err(e) => {
                debug!(
                    "Handshake failed in {} ({:?}): {}",
                    state.name(),
                    conn.role(),
                    e
                );
                conn.abort();
                Err(e)
            }
        }
    }

    /// Whether the next [`Driver::advance`] writes rather than reads.
    pub fn is_sending(conn: &Connection) -> bool {
        conn.state().writer() == Some(conn.role())
    }

    fn run_step(&mut self, conn: &mut Connection, state: State) -> Result<State, Error> {
        let writer = state
            .writer()
            .ok_or(Error::InvariantViolation("no writer in terminal state"))?;
        let step = state
            .step()
            .ok_or(Error::InvariantViolation("no step in terminal state"))?;
        let sending = writer == conn.role();

        conn.io_mut().begin_step();
        let result = match (step, sending) {
            (Step::ChangeCipherSpec, true) => send_change_cipher_spec(conn, writer),
            (Step::ChangeCipherSpec, false) => recv_change_cipher_spec(conn, writer),
            (Step::Finished, true) => finished_send(conn, writer),
            (Step::Finished, false) => finished_recv(conn, writer),
            (Step::External, true) => self.handler.send(state, conn),
            (Step::External, false) => self.handler.recv(state, conn),
        };
        let (written, read) = conn.io_mut().end_step();
        result?;

        if state.in_transcript() {
            let message = if sending { written } else { read };
            conn.handshake.transcript.append(&message);
        }

        state.next(conn.path(), writer)
    }
}

fn send_change_cipher_spec(conn: &mut Connection, writer: Role) -> Result<(), Error> {
    let mut out = Buf::new();
    ChangeCipherSpec.serialize(&mut out);
    conn.io_mut().write_bytes(&out);
    conn.epochs_mut().activate(writer);
    Ok(())
}

fn recv_change_cipher_spec(conn: &mut Connection, writer: Role) -> Result<(), Error> {
    conn.io_mut().read_with(ChangeCipherSpec::parse)?;
    conn.epochs_mut().activate(writer);
    Ok(())
}
