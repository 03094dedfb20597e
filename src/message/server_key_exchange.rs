use std::ops::Range;

use super::{DigitallySigned, ProtocolVersion};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::Error;

/// ServerKeyExchange for DHE_RSA (RFC 5246 7.4.3).
///
/// ```text
/// struct {
///     ServerDHParams params;
///     digitally-signed struct { ... } signed_params;
/// } ServerKeyExchange;
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct ServerKeyExchange<'a> {
    pub params: ServerDhParams<'a>,
    /// The literal wire bytes of `params`. This, not a re-encoding of the
    /// parsed fields, is what the signature covers.
    pub transcript: &'a [u8],
    pub signed: DigitallySigned<'a>,
}

impl<'a> ServerKeyExchange<'a> {
    pub fn parse(
        cursor: &mut ReadCursor<'a>,
        version: ProtocolVersion,
    ) -> Result<ServerKeyExchange<'a>, Error> {
        let (params, range) = ServerDhParams::parse(cursor)?;
        let transcript = cursor.consumed(range);
        let signed = DigitallySigned::parse(cursor, version)?;

        Ok(ServerKeyExchange {
            params,
            transcript,
            signed,
        })
    }

    pub fn serialize(&self, out: &mut WriteCursor) -> Result<(), Error> {
        self.params.serialize(out)?;
        self.signed.serialize(out)
    }
}

/// The server's ephemeral DH group and public value, each an opaque
/// big-endian integer with a u16 length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerDhParams<'a> {
    pub p: &'a [u8],
    pub g: &'a [u8],
    pub ys: &'a [u8],
}

impl<'a> ServerDhParams<'a> {
    pub fn new(p: &'a [u8], g: &'a [u8], ys: &'a [u8]) -> Self {
        ServerDhParams { p, g, ys }
    }

    /// Parse the three fields, returning the range of input they occupied.
    pub fn parse(
        cursor: &mut ReadCursor<'a>,
    ) -> Result<(ServerDhParams<'a>, Range<usize>), Error> {
        let start = cursor.position();

        let p = cursor.read_vector16()?;
        let g = cursor.read_vector16()?;
        let ys = cursor.read_vector16()?;

        let range = start..cursor.position();
        debug_assert_eq!(range.len(), 2 + p.len() + 2 + g.len() + 2 + ys.len());

        Ok((ServerDhParams { p, g, ys }, range))
    }

    /// Write the three fields, returning the range of output they occupy.
    pub fn serialize(&self, out: &mut WriteCursor) -> Result<Range<usize>, Error> {
        let start = out.position();
        out.write_vector16(self.p)?;
        out.write_vector16(self.g)?;
        out.write_vector16(self.ys)?;
        Ok(start..out.position())
    }

    /// Length of the encoded structure.
    pub fn encoded_len(&self) -> usize {
        2 + self.p.len() + 2 + self.g.len() + 2 + self.ys.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::buffer::Buf;
    use crate::message::SignatureAndHashAlgorithm;

    const MESSAGE_DH_PARAMS: &[u8] = &[
        0x00, 0x03, // p length
        0x00, 0xFF, 0x17, // p (leading zero kept as sent)
        0x00, 0x01, // g length
        0x02, // g
        0x00, 0x02, // Ys length
        0x0A, 0x0B, // Ys
    ];

    const SIGNED: &[u8] = &[
        0x02, 0x01, // SHA1 + RSA
        0x00, 0x04, // signature length
        0x05, 0x06, 0x07, 0x08, // signature
    ];

    fn message() -> Vec<u8> {
        let mut m = MESSAGE_DH_PARAMS.to_vec();
        m.extend_from_slice(SIGNED);
        m
    }

    #[test]
    fn parse_borrows_fields() {
        let message = message();
        let mut cursor = ReadCursor::new(&message);
        let ske = ServerKeyExchange::parse(&mut cursor, ProtocolVersion::TLS1_2).unwrap();

        assert_eq!(ske.params.p, &[0x00, 0xFF, 0x17]);
        assert_eq!(ske.params.g, &[0x02]);
        assert_eq!(ske.params.ys, &[0x0A, 0x0B]);
        assert_eq!(ske.params.p.as_ptr(), message[2..].as_ptr());

        assert_eq!(ske.transcript, MESSAGE_DH_PARAMS);
        assert_eq!(ske.transcript.as_ptr(), message.as_ptr());
        assert_eq!(ske.transcript.len(), ske.params.encoded_len());

        assert_eq!(
            ske.signed.algorithm,
            Some(SignatureAndHashAlgorithm::supported())
        );
        assert_eq!(ske.signed.signature, &[0x05, 0x06, 0x07, 0x08]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn transcript_starts_at_cursor_position() {
        // A preceding byte already consumed by the caller is not part of it.
        let mut input = vec![0xEE];
        input.extend_from_slice(&message());
        let mut cursor = ReadCursor::new(&input);
        cursor.read_u8().unwrap();

        let ske = ServerKeyExchange::parse(&mut cursor, ProtocolVersion::TLS1_2).unwrap();
        assert_eq!(ske.transcript, MESSAGE_DH_PARAMS);
    }

    #[test]
    fn roundtrip() {
        let message = message();
        let mut cursor = ReadCursor::new(&message);
        let parsed = ServerKeyExchange::parse(&mut cursor, ProtocolVersion::TLS1_2).unwrap();

        let mut serialized = Buf::new();
        parsed
            .serialize(&mut WriteCursor::new(&mut serialized, 1024))
            .unwrap();
        assert_eq!(&*serialized, &message[..]);
    }

    #[test]
    fn serialize_reports_transcript_range() {
        let params = ServerDhParams::new(&[0x00, 0xFF, 0x17], &[0x02], &[0x0A, 0x0B]);
        let mut buf = Buf::new();
        let mut out = WriteCursor::new(&mut buf, 1024);
        out.write_u8(0xEE).unwrap();
        let range = params.serialize(&mut out).unwrap();
        assert_eq!(range, 1..1 + MESSAGE_DH_PARAMS.len());
        assert_eq!(out.written(range), MESSAGE_DH_PARAMS);
    }

    #[test]
    fn every_truncation_is_rejected() {
        let message = message();
        for len in 0..message.len() {
            let mut cursor = ReadCursor::new(&message[..len]);
            let result = ServerKeyExchange::parse(&mut cursor, ProtocolVersion::TLS1_2);
            assert!(
                matches!(result, Err(Error::TruncatedInput(_))),
                "length {} parsed",
                len
            );
        }
    }

    #[test]
    fn declared_length_beyond_input() {
        let message = [0xFF, 0xFF, 0x01, 0x02];
        let mut cursor = ReadCursor::new(&message);
        assert!(matches!(
            ServerDhParams::parse(&mut cursor),
            Err(Error::TruncatedInput(_))
        ));
    }
}
