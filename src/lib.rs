//! dhe-kx implements the TLS ServerKeyExchange message for the DHE_RSA key
//! exchange (RFC 5246 7.4.3, RFC 4346/2246 for older versions).
//!
//! The server side generates an ephemeral Diffie-Hellman key from a
//! configured group, writes `ServerDHParams` and signs it with its RSA key.
//! The client side parses the message, checks the signature against the
//! server certificate key and only then adopts the DH parameters.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dhe_kx::{build_server_key_exchange, parse_server_key_exchange};
//! use dhe_kx::{Buf, Config, ProtocolVersion, Random, ReadCursor, Session, WriteCursor};
//! use dhe_kx::crypto::RsaSigningKey;
//!
//! # fn run(key_pem: &[u8]) -> Result<(), dhe_kx::Error> {
//! let key = RsaSigningKey::from_bytes(key_pem)?;
//! let peer_key = key.verifying_key();
//! let config = Arc::new(Config::builder().signing_key(key).build()?);
//!
//! let client_random = Random::new();
//! let server_random = Random::new();
//!
//! // Server
//! let mut server = Session::new(
//!     config.clone(),
//!     ProtocolVersion::TLS1_2,
//!     client_random,
//!     server_random,
//! );
//! let mut buf = Buf::new();
//! let mut out = WriteCursor::new(&mut buf, config.max_message_size());
//! build_server_key_exchange(&mut server, &mut out)?;
//!
//! // Client
//! let mut client = Session::new(config, ProtocolVersion::TLS1_2, client_random, server_random);
//! client.set_peer_public_key(peer_key);
//! parse_server_key_exchange(&mut client, &mut ReadCursor::new(&buf))?;
//! # Ok(())
//! # }
//! # fn main() {}
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]
// #![deny(missing_docs)]

#[macro_use]
extern crate log;

mod buffer;
pub use buffer::Buf;

mod config;
pub use config::{Config, ConfigBuilder};

mod cursor;
pub use cursor::{ReadCursor, WriteCursor};

pub mod crypto;

mod error;
pub use error::Error;

pub mod message;
pub use message::{ProtocolVersion, Random};

mod session;
pub use session::Session;

pub mod state;
pub use state::HandshakeState;

mod client;
pub use client::parse_server_key_exchange;

mod server;
pub use server::build_server_key_exchange;
