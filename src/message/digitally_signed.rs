use super::{HashAlgorithm, ProtocolVersion, SignatureAlgorithm, SignatureAndHashAlgorithm};
use super::{SUPPORTED_HASH_ALGORITHM, SUPPORTED_SIGNATURE_ALGORITHM};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::Error;

/// Trailing signature of a signed handshake structure.
///
/// The algorithm pair is only present on the wire when the negotiated
/// version requires it. The signature borrows from the parsed input.
#[derive(Debug, PartialEq, Eq)]
pub struct DigitallySigned<'a> {
    pub algorithm: Option<SignatureAndHashAlgorithm>,
    pub signature: &'a [u8],
}

impl<'a> DigitallySigned<'a> {
    pub fn new(algorithm: Option<SignatureAndHashAlgorithm>, signature: &'a [u8]) -> Self {
        DigitallySigned {
            algorithm,
            signature,
        }
    }

    pub fn parse(
        cursor: &mut ReadCursor<'a>,
        version: ProtocolVersion,
    ) -> Result<DigitallySigned<'a>, Error> {
        let algorithm = Self::parse_algorithm(cursor, version)?;
        let signature = cursor.read_vector16()?;
        Ok(DigitallySigned {
            algorithm,
            signature,
        })
    }

    /// Read and gate the explicit algorithm pair, if the version has one.
    pub fn parse_algorithm(
        cursor: &mut ReadCursor<'a>,
        version: ProtocolVersion,
    ) -> Result<Option<SignatureAndHashAlgorithm>, Error> {
        if !version.requires_signature_algorithms() {
            return Ok(None);
        }

        let hash = HashAlgorithm::from_u8(cursor.read_u8()?);
        let signature = SignatureAlgorithm::from_u8(cursor.read_u8()?);

        // Signature before hash, so a non-RSA peer is reported as such.
        if signature != SUPPORTED_SIGNATURE_ALGORITHM {
            return Err(Error::UnsupportedAlgorithm(format!(
                "Unsupported non-RSA signature algorithm: {:?}",
                signature
            )));
        }
        if hash != SUPPORTED_HASH_ALGORITHM {
            return Err(Error::UnsupportedAlgorithm(format!(
                "Unsupported non-SHA1 hash algorithm: {:?}",
                hash
            )));
        }

        Ok(Some(SignatureAndHashAlgorithm::new(hash, signature)))
    }

    /// Write the fixed algorithm pair, if the version has one.
    pub fn write_algorithm(out: &mut WriteCursor, version: ProtocolVersion) -> Result<(), Error> {
        if version.requires_signature_algorithms() {
            out.write_u8(SUPPORTED_HASH_ALGORITHM.as_u8())?;
            out.write_u8(SUPPORTED_SIGNATURE_ALGORITHM.as_u8())?;
        }
        Ok(())
    }

    /// Write the signature length and reserve the span to sign into.
    pub fn reserve_signature<'c>(
        out: &'c mut WriteCursor<'_>,
        len: usize,
    ) -> Result<&'c mut [u8], Error> {
        let len16 = u16::try_from(len).map_err(|_| {
            Error::AllocationFailure(format!("Signature of {} bytes does not fit u16", len))
        })?;
        out.write_u16(len16)?;
        out.write_raw(len)
    }

    pub fn serialize(&self, out: &mut WriteCursor) -> Result<(), Error> {
        if let Some(algorithm) = self.algorithm {
            out.write_u16(algorithm.as_u16())?;
        }
        out.write_vector16(self.signature)
    }
}
