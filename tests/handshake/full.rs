//! Full handshakes between two peers.

use tls_finish::{
    CipherSuite, Epoch, EpochRef, HandshakePath, ProtocolVersion, Role, SequenceNumber, State,
};

use crate::common::*;

#[test]
fn full_handshake_every_version() {
    let _ = env_logger::try_init();

    for version in ProtocolVersion::all() {
        let offer = Offer {
            version: *version,
            suite: CipherSuite::RSA_AES128_CBC_SHA256,
            ..Default::default()
        };
        let (mut client, mut server) = Peer::pair(offer);

        let mut finished_lengths = Vec::new();
        run_with(&mut client, &mut server, |state, bytes| {
            if matches!(state, State::ClientFinished | State::ServerFinished) {
                finished_lengths.push(bytes.len());
            }
        })
        .expect("handshake");

        assert!(client.conn.is_handshake_over());
        assert!(server.conn.is_handshake_over());
        assert_eq!(client.conn.version(), Some(*version));
        assert_eq!(
            finished_lengths,
            vec![version.finished_len(), version.finished_len()]
        );
    }
}

#[test]
fn peers_agree_on_epochs() {
    let _ = env_logger::try_init();

    let (mut client, mut server) = Peer::pair(Offer::default());
    run(&mut client, &mut server).expect("handshake");

    for direction in [Role::Client, Role::Server] {
        assert_eq!(client.conn.epochs().reference(direction), EpochRef::Active);
        assert_eq!(server.conn.epochs().reference(direction), EpochRef::Active);
        assert_eq!(
            client.conn.epoch_for(direction),
            server.conn.epoch_for(direction)
        );
        assert_ne!(client.conn.epoch_for(direction), &Epoch::null());
        assert_eq!(
            client.conn.epoch_for(direction).cipher_suite(),
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256
        );
    }

    // The record layer starts counting from zero under the new keys.
    assert_eq!(
        client.conn.next_sequence(Role::Client).unwrap(),
        SequenceNumber::ZERO
    );
    assert_eq!(
        server.conn.next_sequence(Role::Client).unwrap(),
        SequenceNumber::ZERO
    );
    assert_eq!(client.conn.next_sequence(Role::Client).unwrap().value(), 1);
}

#[test]
fn client_commits_on_sending_finished() {
    let _ = env_logger::try_init();

    let (mut client, mut server) = Peer::pair(Offer::default());

    run_until(&mut client, &mut server, State::ClientFinished).expect("up to client finished");

    // Both sides switched the client direction to the pending keys on CCS.
    assert_eq!(client.conn.epochs().reference(Role::Client), EpochRef::Pending);
    assert_eq!(server.conn.epochs().reference(Role::Client), EpochRef::Pending);

    client.conn.next_sequence(Role::Client).unwrap();
    let pending_before = client.conn.epochs().pending().clone();
    assert_eq!(pending_before.sequence(Role::Client).value(), 1);

    client.advance().expect("client finished");

    let epochs = client.conn.epochs();
    assert!(epochs.is_committed());
    assert_eq!(epochs.reference(Role::Client), EpochRef::Active);
    assert_eq!(epochs.reference(Role::Server), EpochRef::Initial);
    assert_eq!(epochs.active().cipher_suite(), pending_before.cipher_suite());
    assert_eq!(epochs.active().keys(), pending_before.keys());
    assert_eq!(epochs.active().sequence(Role::Client), SequenceNumber::ZERO);
    assert_eq!(epochs.pending().sequence(Role::Client), SequenceNumber::ZERO);
    assert_eq!(client.conn.epoch_for(Role::Client), epochs.active());

    // Receiving the client's Finished commits nothing on the server.
    let bytes = client.conn.take_outgoing();
    server.conn.feed(&bytes).unwrap();
    server.advance().expect("server reads client finished");
    assert!(!server.conn.epochs().is_committed());
    assert_eq!(server.conn.expected_finished(), &bytes[..]);
}

#[test]
fn optional_messages_are_visited() {
    let _ = env_logger::try_init();

    let offer = Offer {
        path: HandshakePath {
            resumed: false,
            ephemeral_key_exchange: true,
            client_auth: true,
        },
        ..Default::default()
    };
    let (mut client, mut server) = Peer::pair(offer);
    run(&mut client, &mut server).expect("handshake");

    let expected = vec![
        State::ClientHello,
        State::ServerHello,
        State::ServerCertificate,
        State::ServerKeyExchange,
        State::ServerCertificateRequest,
        State::ServerHelloDone,
        State::ClientCertificate,
        State::ClientKeyExchange,
        State::ClientCertificateVerify,
    ];
    assert_eq!(client.driver.handler().seen, expected);
    assert_eq!(server.driver.handler().seen, expected);
}

#[test]
fn sha384_suite() {
    let offer = Offer {
        suite: CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384,
        ..Default::default()
    };
    let (mut client, mut server) = Peer::pair(offer);
    run(&mut client, &mut server).expect("handshake");

    let keys = client.conn.epoch_for(Role::Server).keys();
    assert_eq!(keys.write_key(Role::Server).len(), 32);
    assert_eq!(keys, server.conn.epoch_for(Role::Server).keys());
}

#[test]
fn transcripts_match() {
    let (mut client, mut server) = Peer::pair(Offer::default());
    run(&mut client, &mut server).expect("handshake");

    assert_eq!(
        client.conn.transcript().as_bytes(),
        server.conn.transcript().as_bytes()
    );
    assert!(!client.conn.transcript().as_bytes().is_empty());
}
