//! Finite field Diffie-Hellman for the DHE key exchange.
//!
//! A [`DhGroup`] is the read-only template held by the config. Each
//! connection copies it into its own [`DhParams`], which then either gets a
//! fresh ephemeral key (server) or the peer's public value (client).

use std::fmt;
use std::ops::Range;

use der::asn1::UintRef;
use der::{Decode, Document, Sequence};
use num_bigint::{BigUint, RandBigInt};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::cursor::WriteCursor;
use crate::message::ServerDhParams;
use crate::Error;

/// RFC 7919 ffdhe2048 prime.
const FFDHE2048_P: [u8; 256] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xAD, 0xF8, 0x54, 0x58, 0xA2, 0xBB, 0x4A, 0x9A,
    0xAF, 0xDC, 0x56, 0x20, 0x27, 0x3D, 0x3C, 0xF1, 0xD8, 0xB9, 0xC5, 0x83, 0xCE, 0x2D, 0x36, 0x95,
    0xA9, 0xE1, 0x36, 0x41, 0x14, 0x64, 0x33, 0xFB, 0xCC, 0x93, 0x9D, 0xCE, 0x24, 0x9B, 0x3E, 0xF9,
    0x7D, 0x2F, 0xE3, 0x63, 0x63, 0x0C, 0x75, 0xD8, 0xF6, 0x81, 0xB2, 0x02, 0xAE, 0xC4, 0x61, 0x7A,
    0xD3, 0xDF, 0x1E, 0xD5, 0xD5, 0xFD, 0x65, 0x61, 0x24, 0x33, 0xF5, 0x1F, 0x5F, 0x06, 0x6E, 0xD0,
    0x85, 0x63, 0x65, 0x55, 0x3D, 0xED, 0x1A, 0xF3, 0xB5, 0x57, 0x13, 0x5E, 0x7F, 0x57, 0xC9, 0x35,
    0x98, 0x4F, 0x0C, 0x70, 0xE0, 0xE6, 0x8B, 0x77, 0xE2, 0xA6, 0x89, 0xDA, 0xF3, 0xEF, 0xE8, 0x72,
    0x1D, 0xF1, 0x58, 0xA1, 0x36, 0xAD, 0xE7, 0x35, 0x30, 0xAC, 0xCA, 0x4F, 0x48, 0x3A, 0x79, 0x7A,
    0xBC, 0x0A, 0xB1, 0x82, 0xB3, 0x24, 0xFB, 0x61, 0xD1, 0x08, 0xA9, 0x4B, 0xB2, 0xC8, 0xE3, 0xFB,
    0xB9, 0x6A, 0xDA, 0xB7, 0x60, 0xD7, 0xF4, 0x68, 0x1D, 0x4F, 0x42, 0xA3, 0xDE, 0x39, 0x4D, 0xF4,
    0xAE, 0x56, 0xED, 0xE7, 0x63, 0x72, 0xBB, 0x19, 0x0B, 0x07, 0xA7, 0xC8, 0xEE, 0x0A, 0x6D, 0x70,
    0x9E, 0x02, 0xFC, 0xE1, 0xCD, 0xF7, 0xE2, 0xEC, 0xC0, 0x34, 0x04, 0xCD, 0x28, 0x34, 0x2F, 0x61,
    0x91, 0x72, 0xFE, 0x9C, 0xE9, 0x85, 0x83, 0xFF, 0x8E, 0x4F, 0x12, 0x32, 0xEE, 0xF2, 0x81, 0x83,
    0xC3, 0xFE, 0x3B, 0x1B, 0x4C, 0x6F, 0xAD, 0x73, 0x3B, 0xB5, 0xFC, 0xBC, 0x2E, 0xC2, 0x20, 0x05,
    0xC5, 0x8E, 0xF1, 0x83, 0x7D, 0x16, 0x83, 0xB2, 0xC6, 0xF3, 0x4A, 0x26, 0xC1, 0xB2, 0xEF, 0xFA,
    0x88, 0x6B, 0x42, 0x38, 0x61, 0x28, 0x5C, 0x97, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

static FFDHE2048: Lazy<DhGroup> = Lazy::new(|| DhGroup {
    p: BigUint::from_bytes_be(&FFDHE2048_P),
    g: BigUint::from(2_u32),
});

/// PKCS#3 `DHParameter`.
#[derive(Sequence)]
struct DhParameter<'a> {
    prime: UintRef<'a>,
    base: UintRef<'a>,
    #[asn1(optional = "true")]
    private_value_length: Option<u32>,
}

/// A DH group `(p, g)` used as the template for ephemeral keys.
#[derive(Clone, PartialEq, Eq)]
pub struct DhGroup {
    p: BigUint,
    g: BigUint,
}

impl DhGroup {
    /// Group from big-endian `p` and `g`.
    pub fn new(p: &[u8], g: &[u8]) -> Result<Self, Error> {
        let group = DhGroup {
            p: BigUint::from_bytes_be(p),
            g: BigUint::from_bytes_be(g),
        };
        group.check(0)?;
        Ok(group)
    }

    /// The RFC 7919 ffdhe2048 group.
    pub fn ffdhe2048() -> Self {
        FFDHE2048.clone()
    }

    /// Parse a DER encoded PKCS#3 `DHParameter`.
    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        let params = DhParameter::from_der(der)
            .map_err(|e| Error::ConfigError(format!("Failed to parse DH parameters: {}", e)))?;
        Self::new(params.prime.as_bytes(), params.base.as_bytes())
    }

    /// Parse a PEM `DH PARAMETERS` block as written by `openssl dhparam`.
    pub fn from_pem(pem: &str) -> Result<Self, Error> {
        let (label, doc) = Document::from_pem(pem)
            .map_err(|e| Error::ConfigError(format!("Invalid PEM: {}", e)))?;
        if label != "DH PARAMETERS" {
            return Err(Error::ConfigError(format!(
                "Expected DH PARAMETERS, got {}",
                label
            )));
        }
        Self::from_der(doc.as_bytes())
    }

    pub fn prime_bits(&self) -> u64 {
        self.p.bits()
    }

    /// Sanity check the group: odd `p` of at least `min_bits`, `1 < g < p-1`.
    pub fn check(&self, min_bits: u64) -> Result<(), Error> {
        check_group(&self.p, &self.g, min_bits)
    }
}

impl fmt::Debug for DhGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DhGroup")
            .field("bits", &self.p.bits())
            .field("g", &self.g)
            .finish()
    }
}

/// Connection owned DH state.
pub struct DhParams {
    p: BigUint,
    g: BigUint,
    /// Ys for the server, or the peer's Ys once imported by the client.
    public_key: Option<BigUint>,
    private_key: Option<Zeroizing<Vec<u8>>>,
}

impl DhParams {
    /// Fresh working copy of a configured group, without any key.
    pub fn copy_template(group: &DhGroup) -> Self {
        DhParams {
            p: group.p.clone(),
            g: group.g.clone(),
            public_key: None,
            private_key: None,
        }
    }

    /// Build from the wire triple, rejecting degenerate values.
    pub fn import(p: &[u8], g: &[u8], ys: &[u8], min_bits: u64) -> Result<Self, Error> {
        if p.is_empty() || g.is_empty() || ys.is_empty() {
            return Err(Error::InvalidDhParams("Empty DH parameter".to_string()));
        }

        let p = BigUint::from_bytes_be(p);
        let g = BigUint::from_bytes_be(g);
        check_group(&p, &g, min_bits)?;

        let ys = BigUint::from_bytes_be(ys);
        check_public_value(&p, &ys)?;

        Ok(DhParams {
            p,
            g,
            public_key: Some(ys),
            private_key: None,
        })
    }

    /// Generate a new private exponent and the matching `Ys = g^x mod p`.
    ///
    /// Replaces any key generated before.
    pub fn generate_ephemeral(&mut self) {
        let two = BigUint::from(2_u32);
        let upper = &self.p - 1_u32;
        let private_key = OsRng.gen_biguint_range(&two, &upper);

        let public_key = self.g.modpow(&private_key, &self.p);
        trace!("Generated DH ephemeral key ({} bit group)", self.p.bits());

        self.private_key = Some(Zeroizing::new(private_key.to_bytes_be()));
        self.public_key = Some(public_key);
    }

    /// Write `p`, `g` and `Ys` and return the range they occupy.
    pub fn export(&self, out: &mut WriteCursor) -> Result<Range<usize>, Error> {
        let Some(public_key) = self.public_key_bytes() else {
            return Err(Error::CryptoError("DH key not generated".to_string()));
        };
        let p = self.p_bytes();
        let g = self.g_bytes();
        ServerDhParams::new(&p, &g, &public_key).serialize(out)
    }

    /// Shared secret `peer^x mod p`, big-endian with leading zeros stripped
    /// (RFC 5246 8.1.2).
    pub fn compute_shared_secret(&self, peer_public_key: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
        let Some(private_key) = &self.private_key else {
            return Err(Error::CryptoError("DH private key not generated".to_string()));
        };

        let peer = BigUint::from_bytes_be(peer_public_key);
        check_public_value(&self.p, &peer)?;

        let private_key = BigUint::from_bytes_be(private_key);
        let shared = peer.modpow(&private_key, &self.p);
        Ok(Zeroizing::new(shared.to_bytes_be()))
    }

    pub fn p_bytes(&self) -> Vec<u8> {
        self.p.to_bytes_be()
    }

    pub fn g_bytes(&self) -> Vec<u8> {
        self.g.to_bytes_be()
    }

    pub fn public_key_bytes(&self) -> Option<Vec<u8>> {
        self.public_key.as_ref().map(|k| k.to_bytes_be())
    }

    pub fn prime_bits(&self) -> u64 {
        self.p.bits()
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }
}

impl fmt::Debug for DhParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DhParams")
            .field("bits", &self.p.bits())
            .field("has_public_key", &self.public_key.is_some())
            .field("has_private_key", &self.private_key.is_some())
            .finish()
    }
}

fn check_group(p: &BigUint, g: &BigUint, min_bits: u64) -> Result<(), Error> {
    if p.bits() < min_bits {
        return Err(Error::InvalidDhParams(format!(
            "DH prime of {} bits is below the {} bit minimum",
            p.bits(),
            min_bits
        )));
    }
    // Even covers p = 0 and p = 2.
    if !p.bit(0) || p.bits() < 3 {
        return Err(Error::InvalidDhParams("DH prime must be odd".to_string()));
    }
    let one = BigUint::from(1_u32);
    if *g <= one || *g >= p - 1_u32 {
        return Err(Error::InvalidDhParams(
            "DH generator out of range".to_string(),
        ));
    }
    Ok(())
}

fn check_public_value(p: &BigUint, y: &BigUint) -> Result<(), Error> {
    let one = BigUint::from(1_u32);
    if *y <= one || *y >= p - 1_u32 {
        return Err(Error::InvalidDhParams(
            "DH public value out of range".to_string(),
        ));
    }
    Ok(())
}
