//! Handshakes that must fail, and how they fail.

use std::sync::Arc;

use tls_finish::{
    CipherSuite, Config, Epoch, EpochRef, Error, HandshakePath, ProtocolVersion, Role, State,
};

use crate::common::*;

#[test]
fn flipped_client_finished_is_rejected() {
    let _ = env_logger::try_init();

    let (mut client, mut server) = Peer::pair(Offer::default());

    let failure = run_with(&mut client, &mut server, |state, bytes| {
        if state == State::ClientFinished {
            bytes[5] ^= 0x80;
        }
    })
    .unwrap_err();

    assert_eq!(
        failure,
        Failure {
            role: Role::Server,
            state: State::ClientFinished,
            error: Error::InvalidFinished,
        }
    );

    // The server gives up and forgets the negotiated keys.
    assert!(server.conn.is_aborted());
    assert_eq!(server.conn.epochs().pending(), &Epoch::null());
    assert_eq!(
        server.conn.epochs().reference(Role::Client),
        EpochRef::Initial
    );
    assert_eq!(server.advance(), Err(Error::HandshakeAborted));
}

#[test]
fn flipped_server_finished_is_rejected() {
    let (mut client, mut server) = Peer::pair(Offer::default());

    let failure = run_with(&mut client, &mut server, |state, bytes| {
        if state == State::ServerFinished {
            let last = bytes.len() - 1;
            bytes[last] ^= 0x01;
        }
    })
    .unwrap_err();

    assert_eq!(failure.role, Role::Client);
    assert_eq!(failure.error, Error::InvalidFinished);
    assert!(!client.conn.is_handshake_over());
    assert!(server.conn.is_handshake_over());
}

#[test]
fn truncated_finished_is_too_short() {
    for version in [ProtocolVersion::SSLv3, ProtocolVersion::TLS1_2] {
        let offer = Offer {
            version,
            suite: CipherSuite::RSA_AES128_CBC_SHA256,
            ..Default::default()
        };
        let (mut client, mut server) = Peer::pair(offer);

        let failure = run_with(&mut client, &mut server, |state, bytes| {
            if state == State::ClientFinished {
                bytes.pop();
            }
        })
        .unwrap_err();

        let len = version.finished_len();
        assert_eq!(
            failure.error,
            Error::TooShort {
                needed: len,
                available: len - 1,
            }
        );
        // Never got as far as a comparison.
        assert!(server.conn.expected_finished().is_empty());
    }
}

#[test]
fn key_exchange_failure_fails_finished() {
    let _ = env_logger::try_init();

    let config = Arc::new(Config::default());
    let mut client = Peer::new(config.clone(), Role::Client, TestHandler::default());
    let mut server = Peer::new(
        config,
        Role::Server,
        TestHandler {
            fail_key_exchange: true,
            ..Default::default()
        },
    );

    let failure = run(&mut client, &mut server).unwrap_err();

    assert_eq!(failure.role, Role::Server);
    assert_eq!(failure.state, State::ClientFinished);
    assert_eq!(failure.error, Error::InvalidFinished);

    // The digest did match; only the flag made it fail.
    assert!(!server.conn.expected_finished().is_empty());
}

#[test]
fn tampered_transcript_fails_finished() {
    let (mut client, mut server) = Peer::pair(Offer::default());

    // Byte 10 lies inside the client random.
    let failure = run_with(&mut client, &mut server, |state, bytes| {
        if state == State::ClientHello {
            bytes[10] ^= 0xFF;
        }
    })
    .unwrap_err();

    assert_eq!(failure.role, Role::Server);
    assert_eq!(failure.state, State::ClientFinished);
    assert_eq!(failure.error, Error::InvalidFinished);
}

#[test]
fn version_outside_range_is_refused() {
    let client_config = Arc::new(
        Config::builder()
            .min_protocol_version(ProtocolVersion::TLS1_0)
            .build()
            .unwrap(),
    );
    let server_config = Arc::new(
        Config::builder()
            .min_protocol_version(ProtocolVersion::TLS1_2)
            .build()
            .unwrap(),
    );
    let offer = Offer {
        version: ProtocolVersion::TLS1_0,
        ..Default::default()
    };

    let mut client = Peer::new(
        client_config,
        Role::Client,
        TestHandler {
            offer,
            ..Default::default()
        },
    );
    let mut server = Peer::new(
        server_config,
        Role::Server,
        TestHandler {
            offer,
            ..Default::default()
        },
    );

    let failure = run(&mut client, &mut server).unwrap_err();
    assert_eq!(
        failure,
        Failure {
            role: Role::Server,
            state: State::ClientHello,
            error: Error::VersionNotAllowed(ProtocolVersion::TLS1_0),
        }
    );
}

#[test]
fn server_requiring_certificate_refuses_path_without_it() {
    let server_config = Arc::new(
        Config::builder()
            .require_client_certificate(true)
            .build()
            .unwrap(),
    );
    let mut client = Peer::new(
        Arc::new(Config::default()),
        Role::Client,
        TestHandler::default(),
    );
    let mut server = Peer::new(server_config, Role::Server, TestHandler::default());

    let failure = run(&mut client, &mut server).unwrap_err();
    assert_eq!(failure.error, Error::CertificateRequired);

    // With client auth on the path the same server completes.
    let offer = Offer {
        path: HandshakePath {
            client_auth: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let server_config = Arc::new(
        Config::builder()
            .require_client_certificate(true)
            .build()
            .unwrap(),
    );
    let mut client = Peer::new(
        Arc::new(Config::default()),
        Role::Client,
        TestHandler {
            offer,
            ..Default::default()
        },
    );
    let mut server = Peer::new(
        server_config,
        Role::Server,
        TestHandler {
            offer,
            ..Default::default()
        },
    );
    run(&mut client, &mut server).expect("handshake with client auth");
}

#[test]
fn reading_before_data_arrives_is_fatal() {
    let (_client, mut server) = Peer::pair(Offer::default());

    assert!(!server.is_sending());
    assert_eq!(
        server.advance(),
        Err(Error::TooShort {
            needed: 37,
            available: 0,
        })
    );
    assert!(server.conn.is_aborted());
}

#[test]
fn nothing_after_completion() {
    let (mut client, mut server) = Peer::pair(Offer::default());
    run(&mut client, &mut server).expect("handshake");

    assert_eq!(client.advance(), Err(Error::HandshakeComplete));
    assert!(!client.conn.is_aborted());
}
