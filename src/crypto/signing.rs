//! RSA PKCS#1 v1.5 signing and verification of handshake digests.

use std::fmt;
use std::str;

use der::{Decode, Encode};
use pkcs8::DecodePrivateKey;
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha256, Sha384};
use spki::DecodePublicKey;
use x509_cert::Certificate as X509Certificate;

use super::DigestAlgorithm;
use crate::Error;

fn padding(algorithm: DigestAlgorithm) -> Pkcs1v15Sign {
    match algorithm {
        // TLS 1.0/1.1 sign the raw 36 byte MD5 ‖ SHA1 without DigestInfo.
        DigestAlgorithm::Md5Sha1 => Pkcs1v15Sign::new_unprefixed(),
        DigestAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        DigestAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        DigestAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
    }
}

/// Private key used by the server to sign its key exchange parameters.
pub struct RsaSigningKey {
    key: RsaPrivateKey,
}

impl RsaSigningKey {
    pub fn new(key: RsaPrivateKey) -> Self {
        RsaSigningKey { key }
    }

    /// Load a private key from PKCS#8 or PKCS#1, DER or PEM.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if let Ok(key) = RsaPrivateKey::from_pkcs8_der(data) {
            return Ok(Self::new(key));
        }
        if let Ok(key) = RsaPrivateKey::from_pkcs1_der(data) {
            return Ok(Self::new(key));
        }

        let pem = str::from_utf8(data)
            .map_err(|e| Error::ConfigError(format!("Invalid UTF-8 in private key: {}", e)))?;
        if let Ok(key) = RsaPrivateKey::from_pkcs8_pem(pem) {
            return Ok(Self::new(key));
        }
        RsaPrivateKey::from_pkcs1_pem(pem)
            .map(Self::new)
            .map_err(|e| Error::ConfigError(format!("Failed to parse RSA private key: {}", e)))
    }

    /// Length in bytes of every signature this key produces.
    pub fn signature_size(&self) -> usize {
        self.key.size()
    }

    /// The matching public key.
    pub fn verifying_key(&self) -> RsaVerifyingKey {
        RsaVerifyingKey::new(self.key.to_public_key())
    }

    /// Sign an already computed digest.
    pub fn sign(&self, algorithm: DigestAlgorithm, digest: &[u8]) -> Result<Vec<u8>, Error> {
        self.key
            .sign_with_rng(&mut OsRng, padding(algorithm), digest)
            .map_err(|e| Error::SigningFailure(format!("Failed to sign DH parameters: {}", e)))
    }

    /// Sign into a span of exactly [`signature_size`](Self::signature_size) bytes.
    pub fn sign_into(
        &self,
        algorithm: DigestAlgorithm,
        digest: &[u8],
        out: &mut [u8],
    ) -> Result<(), Error> {
        let signature = self.sign(algorithm, digest)?;
        if signature.len() != out.len() {
            return Err(Error::SigningFailure(format!(
                "Signature is {} bytes, expected {}",
                signature.len(),
                out.len()
            )));
        }
        out.copy_from_slice(&signature);
        Ok(())
    }
}

impl fmt::Debug for RsaSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigningKey")
            .field("bits", &(self.key.size() * 8))
            .finish_non_exhaustive()
    }
}

/// The peer's public key. Verification consumes it.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaVerifyingKey {
    key: RsaPublicKey,
}

impl RsaVerifyingKey {
    pub fn new(key: RsaPublicKey) -> Self {
        RsaVerifyingKey { key }
    }

    /// Load a public key from SubjectPublicKeyInfo or PKCS#1, DER or PEM.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if let Ok(key) = RsaPublicKey::from_public_key_der(data) {
            return Ok(Self::new(key));
        }
        if let Ok(key) = RsaPublicKey::from_pkcs1_der(data) {
            return Ok(Self::new(key));
        }

        let pem = str::from_utf8(data)
            .map_err(|e| Error::ConfigError(format!("Invalid UTF-8 in public key: {}", e)))?;
        if let Ok(key) = RsaPublicKey::from_public_key_pem(pem) {
            return Ok(Self::new(key));
        }
        RsaPublicKey::from_pkcs1_pem(pem)
            .map(Self::new)
            .map_err(|e| Error::ConfigError(format!("Failed to parse RSA public key: {}", e)))
    }

    /// Take the subject public key out of a DER certificate.
    ///
    /// The certificate itself is not validated.
    pub fn from_certificate_der(cert_der: &[u8]) -> Result<Self, Error> {
        let cert = X509Certificate::from_der(cert_der)
            .map_err(|e| Error::ConfigError(format!("Failed to parse certificate: {}", e)))?;
        let spki_der = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| Error::ConfigError(format!("Failed to encode public key: {}", e)))?;
        RsaPublicKey::from_public_key_der(&spki_der)
            .map(Self::new)
            .map_err(|e| Error::ConfigError(format!("Certificate key is not RSA: {}", e)))
    }

    /// Verify `signature` over `digest`, consuming the key.
    pub fn verify(
        self,
        algorithm: DigestAlgorithm,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<(), Error> {
        self.key
            .verify(padding(algorithm), digest, signature)
            .map_err(|_| Error::InvalidSignature("Server signature is invalid".to_string()))
    }
}

impl fmt::Debug for RsaVerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaVerifyingKey")
            .field("bits", &(self.key.size() * 8))
            .finish()
    }
}
