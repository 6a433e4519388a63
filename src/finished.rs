//! Finished message: sending commits the pending epoch, receiving verifies
//! the peer's digest in constant time.

use subtle::Choice;

use crate::buffer::Buf;
use crate::connection::Connection;
use crate::crypto::{self, constant_time, VerifyData};
use crate::message::Finished;
use crate::types::Role;
use crate::Error;

/// Digest a Finished written by `sender` must carry, over the transcript so far.
///
/// Every version uses the TLS 1.2 PRF with the suite hash. Below TLS 1.2
/// the digest is therefore not wire-compatible with other implementations.
pub fn compute_verify_data(conn: &Connection, sender: Role) -> Result<VerifyData, Error> {
    let version = conn
        .version()
        .ok_or(Error::InvariantViolation("no protocol version negotiated"))?;
    let master_secret = conn
        .master_secret()
        .ok_or(Error::InvariantViolation("no master secret"))?;

    let provider = conn.config().crypto_provider();
    let hash = conn.cipher_suite().hash_algorithm();
    let transcript_hash = conn.transcript().hash(provider, hash);

    crypto::compute_verify_data(
        provider,
        version,
        hash,
        master_secret,
        sender,
        &transcript_hash,
    )
}

/// Write our Finished and make the pending epoch active for `sender`.
pub fn finished_send(conn: &mut Connection, sender: Role) -> Result<(), Error> {
    let verify_data = compute_verify_data(conn, sender)?;

    let mut out = Buf::new();
    Finished::new(&verify_data).serialize(&mut out);
    conn.io_mut().write_bytes(&out);

    conn.epochs_mut().commit(sender);

    debug!("Sent Finished ({:?})", sender);
    Ok(())
}

/// Read the peer's Finished and verify it.
///
/// A digest mismatch and an earlier key exchange failure both give
/// [`Error::InvalidFinished`].
pub fn finished_recv(conn: &mut Connection, sender: Role) -> Result<(), Error> {
    let version = conn
        .version()
        .ok_or(Error::InvariantViolation("no protocol version negotiated"))?;
    let length = version.finished_len();

    // Exactly `length` bytes or nothing.
    let mut received = VerifyData::default();
    received.extend_from_slice(conn.io_mut().read_bytes(length)?);

    let expected = compute_verify_data(conn, sender)?;

    let digest_ok = constant_time::equals_choice(&expected, &received, length);
    let kex_ok = !Choice::from(conn.key_exchange_failed() as u8);

    conn.handshake.expected_finished = expected;

    if !bool::from(digest_ok & kex_ok) {
        debug!("Finished from {:?} did not verify", sender);
        return Err(Error::InvalidFinished);
    }

    trace!("Verified Finished ({:?})", sender);
    Ok(())
}
