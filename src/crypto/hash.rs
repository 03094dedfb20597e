use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384};

use crate::message::{HashAlgorithm, Random};

/// Digest used to build the signed hash of key exchange parameters.
///
/// This is the algorithm negotiated for the pending session, which is a
/// separate thing from the hash identifier carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// Concatenated MD5 and SHA1 digests, 36 bytes. TLS 1.1 and earlier.
    Md5Sha1,
    Sha1,
    Sha256,
    Sha384,
}

impl DigestAlgorithm {
    /// The digest a version signs with unless negotiated otherwise.
    pub fn default_for(requires_signature_algorithms: bool) -> Self {
        if requires_signature_algorithms {
            DigestAlgorithm::Sha1
        } else {
            DigestAlgorithm::Md5Sha1
        }
    }

    /// Wire identifier, if this digest has one.
    pub fn hash_algorithm(&self) -> Option<HashAlgorithm> {
        match self {
            DigestAlgorithm::Md5Sha1 => None,
            DigestAlgorithm::Sha1 => Some(HashAlgorithm::SHA1),
            DigestAlgorithm::Sha256 => Some(HashAlgorithm::SHA256),
            DigestAlgorithm::Sha384 => Some(HashAlgorithm::SHA384),
        }
    }
}

/// A hash context over one of the [`DigestAlgorithm`]s.
#[derive(Clone)]
pub enum Hash {
    Md5Sha1(Md5, Sha1),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha384(Sha384),
}

impl Hash {
    /// Create a new hash context with the specified algorithm
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Md5Sha1 => Hash::Md5Sha1(Md5::new(), Sha1::new()),
            DigestAlgorithm::Sha1 => Hash::Sha1(Sha1::new()),
            DigestAlgorithm::Sha256 => Hash::Sha256(Sha256::new()),
            DigestAlgorithm::Sha384 => Hash::Sha384(Sha384::new()),
        }
    }

    /// Update the hash with new data
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Hash::Md5Sha1(md5, sha1) => {
                md5.update(data);
                sha1.update(data);
            }
            Hash::Sha1(hasher) => hasher.update(data),
            Hash::Sha256(hasher) => hasher.update(data),
            Hash::Sha384(hasher) => hasher.update(data),
        }
    }

    /// Finalize the hash and return the result.
    pub fn finalize(self) -> Vec<u8> {
        match self {
            Hash::Md5Sha1(md5, sha1) => {
                let mut out = md5.finalize().to_vec();
                out.extend_from_slice(&sha1.finalize());
                out
            }
            Hash::Sha1(hasher) => hasher.finalize().to_vec(),
            Hash::Sha256(hasher) => hasher.finalize().to_vec(),
            Hash::Sha384(hasher) => hasher.finalize().to_vec(),
        }
    }
}

/// Digest over `client_random ‖ server_random ‖ params`, the input of the
/// ServerKeyExchange signature.
pub fn signed_params_digest(
    algorithm: DigestAlgorithm,
    client_random: &Random,
    server_random: &Random,
    params: &[u8],
) -> Vec<u8> {
    let mut hash = Hash::new(algorithm);
    hash.update(&client_random.to_bytes());
    hash.update(&server_random.to_bytes());
    hash.update(params);
    hash.finalize()
}
