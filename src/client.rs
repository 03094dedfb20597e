// Client side of the DHE_RSA ServerKeyExchange.
//
// The server's DH parameters are only trusted once the RSA signature over
// client_random || server_random || params verifies with the key from the
// server certificate. Until then nothing is written to the session.

use crate::crypto::{signed_params_digest, DhParams};
use crate::cursor::ReadCursor;
use crate::message::ServerKeyExchange;
use crate::session::Session;
use crate::state::HandshakeState;
use crate::Error;

/// Decode and verify a ServerKeyExchange body.
///
/// On success the server's DH parameters are in the session's DH slot and
/// the handshake state is [`HandshakeState::ServerHelloDone`]. Once the
/// message parses and the algorithm is accepted, the peer public key is
/// consumed by the verification regardless of its outcome.
///
/// The DH values are only checked after the signature verifies, so any
/// change to the signed bytes reports [`Error::InvalidSignature`].
///
/// On error the DH slot and handshake state are untouched and the caller
/// must abort the connection.
pub fn parse_server_key_exchange(
    session: &mut Session,
    cursor: &mut ReadCursor<'_>,
) -> Result<(), Error> {
    session.expect_state(HandshakeState::ServerKeyExchange)?;

    let version = session.protocol_version();
    let ske = ServerKeyExchange::parse(cursor, version)?;

    trace!(
        "ServerKeyExchange: p={} g={} Ys={} signature={} bytes",
        ske.params.p.len(),
        ske.params.g.len(),
        ske.params.ys.len(),
        ske.signed.signature.len()
    );

    let digest_algorithm = session.digest_algorithm();
    if let Some(algorithm) = ske.signed.algorithm {
        if digest_algorithm.hash_algorithm() != Some(algorithm.hash) {
            debug!(
                "Signed hash uses negotiated {:?} while the wire says {:?}",
                digest_algorithm, algorithm.hash
            );
        }
    }

    let digest = signed_params_digest(
        digest_algorithm,
        session.client_random(),
        session.server_random(),
        ske.transcript,
    );

    let Some(public_key) = session.take_peer_public_key() else {
        return Err(Error::UnexpectedMessage(
            "No server public key to verify ServerKeyExchange".to_string(),
        ));
    };

    if let Err(e) = public_key.verify(digest_algorithm, &digest, ske.signed.signature) {
        warn!("ServerKeyExchange signature did not verify");
        return Err(e);
    }
    trace!("ServerKeyExchange signature verified: {:?}", digest_algorithm);

    // Signed, but the server may still have sent a weak or degenerate group.
    let params = ske.params;
    let dh_params = DhParams::import(
        params.p,
        params.g,
        params.ys,
        session.config().min_dh_prime_bits(),
    )?;

    session.complete_key_exchange(dh_params);

    Ok(())
}
