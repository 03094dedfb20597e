// Server side of the DHE_RSA ServerKeyExchange.
//
// Every call draws a fresh ephemeral key from the configured group, writes
// the params, then signs exactly the bytes it just wrote.

use crate::crypto::{signed_params_digest, DhParams};
use crate::cursor::WriteCursor;
use crate::message::DigitallySigned;
use crate::session::Session;
use crate::state::HandshakeState;
use crate::Error;

/// Build and sign a ServerKeyExchange body into `out`.
///
/// On success the session holds the ephemeral DH state (with its private
/// key) and the handshake state is [`HandshakeState::ServerHelloDone`].
///
/// On error the session is untouched. `out` may contain a partial message
/// and must be discarded.
pub fn build_server_key_exchange(
    session: &mut Session,
    out: &mut WriteCursor<'_>,
) -> Result<(), Error> {
    session.expect_state(HandshakeState::ServerKeyExchange)?;

    let config = session.config();
    let Some(signing_key) = config.signing_key() else {
        return Err(Error::ConfigError(
            "No signing key configured for ServerKeyExchange".to_string(),
        ));
    };

    let mut dh_params = DhParams::copy_template(config.dh_params());
    dh_params.generate_ephemeral();

    let params_range = dh_params.export(out)?;

    let version = session.protocol_version();
    DigitallySigned::write_algorithm(out, version)?;

    let digest_algorithm = session.digest_algorithm();
    let digest = signed_params_digest(
        digest_algorithm,
        session.client_random(),
        session.server_random(),
        out.written(params_range.clone()),
    );

    let signature = DigitallySigned::reserve_signature(out, signing_key.signature_size())?;
    signing_key.sign_into(digest_algorithm, &digest, signature)?;

    trace!(
        "Signed ServerKeyExchange: {} param bytes, {:?}",
        params_range.len(),
        digest_algorithm
    );

    session.complete_key_exchange(dh_params);

    Ok(())
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::buffer::Buf;
    use crate::crypto::{modp1024, server_key, DigestAlgorithm};
    use crate::cursor::ReadCursor;
    use crate::message::{ProtocolVersion, Random, ServerKeyExchange};
    use crate::Config;

    fn config() -> Arc<Config> {
        Arc::new(
            Config::builder()
                .dh_params(modp1024())
                .min_dh_prime_bits(1024)
                .signing_key(server_key())
                .build()
                .unwrap(),
        )
    }

    fn session(config: Arc<Config>, version: ProtocolVersion) -> Session {
        Session::new(
            config,
            version,
            Random::from_bytes([0xC1; 32]),
            Random::from_bytes([0x5E; 32]),
        )
    }

    fn build(session: &mut Session) -> Result<Vec<u8>, Error> {
        let mut buf = Buf::new();
        let mut out = WriteCursor::new(&mut buf, 4096);
        build_server_key_exchange(session, &mut out)?;
        Ok(buf.into_vec())
    }

    #[test]
    fn builds_tls12_message() {
        let mut session = session(config(), ProtocolVersion::TLS1_2);
        let message = build(&mut session).unwrap();

        let mut cursor = ReadCursor::new(&message);
        let ske = ServerKeyExchange::parse(&mut cursor, ProtocolVersion::TLS1_2).unwrap();
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(ske.signed.algorithm.unwrap().as_u16(), 0x0201);
        assert_eq!(ske.signed.signature.len(), 256);
        assert_eq!(ske.params.p, &crate::crypto::MODP1024_P[..]);
        assert_eq!(ske.params.g, &[2]);

        let dh = session.dh_params().unwrap();
        assert!(dh.has_private_key());
        assert_eq!(dh.public_key_bytes().unwrap(), ske.params.ys);
        assert_eq!(session.handshake_state(), HandshakeState::ServerHelloDone);
    }

    #[test]
    fn tls10_has_no_algorithm() {
        let mut session = session(config(), ProtocolVersion::TLS1_0);
        let message = build(&mut session).unwrap();

        let mut cursor = ReadCursor::new(&message);
        let ske = ServerKeyExchange::parse(&mut cursor, ProtocolVersion::TLS1_0).unwrap();
        assert_eq!(cursor.remaining(), 0);
        assert!(ske.signed.algorithm.is_none());
    }

    #[test]
    fn signature_covers_randoms_and_params() {
        let mut session = session(config(), ProtocolVersion::TLS1_2);
        let message = build(&mut session).unwrap();

        let mut cursor = ReadCursor::new(&message);
        let ske = ServerKeyExchange::parse(&mut cursor, ProtocolVersion::TLS1_2).unwrap();
        assert_eq!(ske.transcript, &message[..ske.params.encoded_len()]);

        let digest = signed_params_digest(
            DigestAlgorithm::Sha1,
            &Random::from_bytes([0xC1; 32]),
            &Random::from_bytes([0x5E; 32]),
            ske.transcript,
        );
        server_key()
            .verifying_key()
            .verify(DigestAlgorithm::Sha1, &digest, ske.signed.signature)
            .unwrap();
    }

    #[test]
    fn fresh_key_every_time() {
        let config = config();
        let mut first = session(config.clone(), ProtocolVersion::TLS1_2);
        let mut second = session(config, ProtocolVersion::TLS1_2);
        let a = build(&mut first).unwrap();
        let b = build(&mut second).unwrap();

        let a = ServerKeyExchange::parse(&mut ReadCursor::new(&a), ProtocolVersion::TLS1_2)
            .unwrap()
            .params;
        let b = ServerKeyExchange::parse(&mut ReadCursor::new(&b), ProtocolVersion::TLS1_2)
            .unwrap()
            .params;
        assert_eq!(a.p, b.p);
        assert_eq!(a.g, b.g);
        assert_ne!(a.ys, b.ys);
    }

    #[test]
    fn appends_after_existing_output() {
        let mut session = session(config(), ProtocolVersion::TLS1_2);
        let mut buf = Buf::from_slice(&[0x0C, 0x00, 0x00, 0x00]);
        let mut out = WriteCursor::new(&mut buf, 4096);
        build_server_key_exchange(&mut session, &mut out).unwrap();

        assert_eq!(&buf[..4], &[0x0C, 0x00, 0x00, 0x00]);
        let mut cursor = ReadCursor::new(&buf[4..]);
        ServerKeyExchange::parse(&mut cursor, ProtocolVersion::TLS1_2).unwrap();
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn output_limit_is_allocation_failure() {
        let mut session = session(config(), ProtocolVersion::TLS1_2);
        let mut buf = Buf::new();
        // Room for the params but not the signature.
        let mut out = WriteCursor::new(&mut buf, 300);

        let err = build_server_key_exchange(&mut session, &mut out).unwrap_err();
        assert!(matches!(err, Error::AllocationFailure(_)));
        assert!(session.dh_params().is_none());
        assert_eq!(session.handshake_state(), HandshakeState::ServerKeyExchange);
    }

    #[test]
    fn missing_signing_key() {
        let config = Config::builder()
            .dh_params(modp1024())
            .min_dh_prime_bits(1024)
            .build()
            .unwrap();
        let mut session = session(Arc::new(config), ProtocolVersion::TLS1_2);

        let err = build(&mut session).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert_eq!(session.handshake_state(), HandshakeState::ServerKeyExchange);
    }

    #[test]
    fn wrong_state() {
        let mut session = session(config(), ProtocolVersion::TLS1_2);
        session.set_handshake_state(HandshakeState::ServerHello);

        let err = build(&mut session).unwrap_err();
        assert!(matches!(err, Error::UnexpectedMessage(_)));
        assert!(session.dh_params().is_none());
    }
}
