#![allow(unused)]

//! Shared fixtures for the integration tests.

use std::sync::Arc;

use dhe_kx::crypto::{RsaSigningKey, RsaVerifyingKey};
use dhe_kx::{build_server_key_exchange, Buf, Config, ProtocolVersion, Random, Session, WriteCursor};

pub const SERVER_KEY_PEM: &[u8] = include_bytes!("../data/server_key.pem");
pub const SERVER_KEY_DER: &[u8] = include_bytes!("../data/server_key.der");
pub const SERVER_PUB_PEM: &[u8] = include_bytes!("../data/server_pub.pem");
pub const SERVER_CERT_DER: &[u8] = include_bytes!("../data/server_cert.der");
pub const OTHER_KEY_PEM: &[u8] = include_bytes!("../data/other_key.pem");
pub const FFDHE2048_PEM: &str = include_str!("../data/ffdhe2048.pem");

pub const CLIENT_RANDOM: [u8; 32] = [0xC1; 32];
pub const SERVER_RANDOM: [u8; 32] = [0x5E; 32];

pub fn server_key() -> RsaSigningKey {
    RsaSigningKey::from_bytes(SERVER_KEY_PEM).expect("server key")
}

pub fn server_public_key() -> RsaVerifyingKey {
    RsaVerifyingKey::from_certificate_der(SERVER_CERT_DER).expect("server certificate")
}

/// Default ffdhe2048 config with the test server key.
pub fn server_config() -> Arc<Config> {
    Arc::new(
        Config::builder()
            .signing_key(server_key())
            .build()
            .expect("server config"),
    )
}

pub fn client_config() -> Arc<Config> {
    Arc::new(Config::default())
}

pub fn session(config: Arc<Config>, version: ProtocolVersion) -> Session {
    Session::new(
        config,
        version,
        Random::from_bytes(CLIENT_RANDOM),
        Random::from_bytes(SERVER_RANDOM),
    )
}

/// Client session with the server key already taken from the certificate.
pub fn client_session(version: ProtocolVersion) -> Session {
    let mut session = session(client_config(), version);
    session.set_peer_public_key(server_public_key());
    session
}

/// Run the server side and return the session and the encoded body.
pub fn server_message(version: ProtocolVersion) -> (Session, Vec<u8>) {
    let config = server_config();
    let mut session = session(config.clone(), version);
    let mut buf = Buf::new();
    let mut out = WriteCursor::new(&mut buf, config.max_message_size());
    build_server_key_exchange(&mut session, &mut out).expect("build ServerKeyExchange");
    (session, buf.into_vec())
}
