#![no_main]

//! Fuzz target for ServerKeyExchange decoding.
//!
//! The body is tried against both wire layouts (with and without the
//! explicit SignatureAndHashAlgorithm). A failed decode must never leave
//! DH parameters in the session or move the handshake state.

use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use std::sync::Arc;

use dhe_kx::crypto::RsaVerifyingKey;
use dhe_kx::{parse_server_key_exchange, Config, HandshakeState, ProtocolVersion, Random};
use dhe_kx::{ReadCursor, Session};

static PEER_KEY: Lazy<RsaVerifyingKey> = Lazy::new(|| {
    RsaVerifyingKey::from_bytes(include_bytes!("../../tests/data/server_pub.pem"))
        .expect("server public key")
});

static CONFIG: Lazy<Arc<Config>> = Lazy::new(|| {
    Arc::new(
        Config::builder()
            .min_dh_prime_bits(512)
            .build()
            .expect("config"),
    )
});

fuzz_target!(|data: &[u8]| {
    for version in [ProtocolVersion::TLS1_2, ProtocolVersion::TLS1_0] {
        let mut session = Session::new(
            CONFIG.clone(),
            version,
            Random::from_bytes([0xC1; 32]),
            Random::from_bytes([0x5E; 32]),
        );
        session.set_peer_public_key(PEER_KEY.clone());

        let mut cursor = ReadCursor::new(data);
        match parse_server_key_exchange(&mut session, &mut cursor) {
            Ok(()) => {
                assert_eq!(session.handshake_state(), HandshakeState::ServerHelloDone);
                assert!(session.dh_params().is_some());
            }
            Err(_) => {
                assert_eq!(session.handshake_state(), HandshakeState::ServerKeyExchange);
                assert!(session.dh_params().is_none());
            }
        }
    }
});
