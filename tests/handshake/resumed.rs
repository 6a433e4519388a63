//! Abbreviated handshakes: the server finishes first.

use tls_finish::{EpochRef, Error, HandshakePath, ProtocolVersion, Role, State};

use crate::common::*;

fn resumed_offer() -> Offer {
    Offer {
        path: HandshakePath::resumed(),
        ..Default::default()
    }
}

#[test]
fn resumed_handshake_completes() {
    let _ = env_logger::try_init();

    let (mut client, mut server) = Peer::pair(resumed_offer());

    let mut order = Vec::new();
    run_with(&mut client, &mut server, |state, _| order.push(state)).expect("handshake");

    assert_eq!(
        order,
        vec![
            State::ClientHello,
            State::ServerHello,
            State::ServerChangeCipherSpec,
            State::ServerFinished,
            State::ClientChangeCipherSpec,
            State::ClientFinished,
        ]
    );

    for direction in [Role::Client, Role::Server] {
        assert_eq!(
            client.conn.epoch_for(direction),
            server.conn.epoch_for(direction)
        );
        assert_eq!(client.conn.epochs().reference(direction), EpochRef::Active);
        assert_eq!(server.conn.epochs().reference(direction), EpochRef::Active);
    }
}

#[test]
fn server_commits_first() {
    let (mut client, mut server) = Peer::pair(resumed_offer());

    run_until(&mut client, &mut server, State::ServerFinished).expect("up to server finished");
    server.advance().expect("server finished");

    let epochs = server.conn.epochs();
    assert!(epochs.is_committed());
    assert_eq!(epochs.reference(Role::Server), EpochRef::Active);
    assert_eq!(epochs.reference(Role::Client), EpochRef::Initial);

    // The client has switched the server direction to pending keys but not
    // committed anything yet.
    assert!(!client.conn.epochs().is_committed());
    assert_eq!(
        client.conn.epochs().reference(Role::Server),
        EpochRef::Pending
    );

    let bytes = server.conn.take_outgoing();
    client.conn.feed(&bytes).unwrap();
    client.advance().expect("client reads server finished");

    // The rest of the handshake. The server's later CCS receive lands on
    // the already active epoch.
    run(&mut client, &mut server).expect("rest of handshake");
    assert_eq!(
        server.conn.epochs().reference(Role::Client),
        EpochRef::Active
    );
}

#[test]
fn resumed_sslv3_uses_long_finished() {
    let offer = Offer {
        version: ProtocolVersion::SSLv3,
        ..resumed_offer()
    };
    let (mut client, mut server) = Peer::pair(offer);

    let mut lengths = Vec::new();
    run_with(&mut client, &mut server, |state, bytes| {
        if matches!(state, State::ClientFinished | State::ServerFinished) {
            lengths.push(bytes.len());
        }
    })
    .expect("handshake");

    assert_eq!(lengths, vec![36, 36]);
}

#[test]
fn flipped_server_finished_is_rejected() {
    let (mut client, mut server) = Peer::pair(resumed_offer());

    let failure = run_with(&mut client, &mut server, |state, bytes| {
        if state == State::ServerFinished {
            bytes[0] ^= 0x01;
        }
    })
    .unwrap_err();

    assert_eq!(failure.role, Role::Client);
    assert_eq!(failure.state, State::ServerFinished);
    assert_eq!(failure.error, Error::InvalidFinished);
    assert!(client.conn.is_aborted());
}
