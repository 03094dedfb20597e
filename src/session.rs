use std::sync::Arc;

use crate::crypto::{DhParams, DigestAlgorithm, RsaVerifyingKey};
use crate::message::{ProtocolVersion, Random};
use crate::state::HandshakeState;
use crate::{Config, Error};

/// Negotiated, not yet active, state of one connection.
///
/// A session is driven by one caller at a time; the key exchange entry
/// points take it by `&mut`.
#[derive(Debug)]
pub struct Session {
    config: Arc<Config>,
    protocol_version: ProtocolVersion,
    client_random: Random,
    server_random: Random,
    digest_algorithm: DigestAlgorithm,
    dh_params: Option<DhParams>,
    peer_public_key: Option<RsaVerifyingKey>,
    handshake_state: HandshakeState,
}

impl Session {
    /// Create a session positioned at ServerKeyExchange.
    ///
    /// The digest algorithm starts at the version default, see
    /// [`DigestAlgorithm::default_for`].
    pub fn new(
        config: Arc<Config>,
        protocol_version: ProtocolVersion,
        client_random: Random,
        server_random: Random,
    ) -> Self {
        let digest_algorithm =
            DigestAlgorithm::default_for(protocol_version.requires_signature_algorithms());

        Session {
            config,
            protocol_version,
            client_random,
            server_random,
            digest_algorithm,
            dh_params: None,
            peer_public_key: None,
            handshake_state: HandshakeState::ServerKeyExchange,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    pub fn client_random(&self) -> &Random {
        &self.client_random
    }

    pub fn server_random(&self) -> &Random {
        &self.server_random
    }

    pub fn digest_algorithm(&self) -> DigestAlgorithm {
        self.digest_algorithm
    }

    /// Override the digest chosen earlier in the handshake.
    pub fn set_digest_algorithm(&mut self, algorithm: DigestAlgorithm) {
        self.digest_algorithm = algorithm;
    }

    pub fn handshake_state(&self) -> HandshakeState {
        self.handshake_state
    }

    pub fn set_handshake_state(&mut self, state: HandshakeState) {
        self.handshake_state = state;
    }

    /// DH state, once a key exchange has succeeded.
    pub fn dh_params(&self) -> Option<&DhParams> {
        self.dh_params.as_ref()
    }

    /// Take the DH state out, e.g. to compute the premaster secret.
    pub fn take_dh_params(&mut self) -> Option<DhParams> {
        self.dh_params.take()
    }

    /// Set the server key, as extracted from its certificate.
    pub fn set_peer_public_key(&mut self, key: RsaVerifyingKey) {
        self.peer_public_key = Some(key);
    }

    pub fn has_peer_public_key(&self) -> bool {
        self.peer_public_key.is_some()
    }

    pub(crate) fn take_peer_public_key(&mut self) -> Option<RsaVerifyingKey> {
        self.peer_public_key.take()
    }

    /// Store the DH state and move past ServerKeyExchange.
    pub(crate) fn complete_key_exchange(&mut self, dh_params: DhParams) {
        self.dh_params = Some(dh_params);
        self.handshake_state = HandshakeState::AFTER_KEY_EXCHANGE;
        debug!("Handshake state: {:?}", self.handshake_state);
    }

    pub(crate) fn expect_state(&self, state: HandshakeState) -> Result<(), Error> {
        if self.handshake_state != state {
            return Err(Error::UnexpectedMessage(format!(
                "ServerKeyExchange in state {:?}, expected {:?}",
                self.handshake_state, state
            )));
        }
        Ok(())
    }
}
