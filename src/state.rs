/// Position in the full handshake, from the point of view of the messages
/// leading up to ServerHelloDone.
///
/// Only the `ServerKeyExchange -> ServerHelloDone` transition is driven
/// from this crate. The others belong to the surrounding state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    ClientHello,
    ServerHello,
    ServerCert,
    ServerKeyExchange,
    ServerHelloDone,
}

impl HandshakeState {
    /// The state following a successful ServerKeyExchange.
    pub const AFTER_KEY_EXCHANGE: HandshakeState = HandshakeState::ServerHelloDone;
}
