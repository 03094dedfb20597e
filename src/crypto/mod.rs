//! Cryptographic primitives used by the key exchange.

mod dh;
mod hash;
mod signing;

pub use dh::{DhGroup, DhParams};
pub use hash::{signed_params_digest, DigestAlgorithm, Hash};
pub use signing::{RsaSigningKey, RsaVerifyingKey};

#[cfg(test)]
pub(crate) use dh::test::{modp1024, MODP1024_P};
#[cfg(test)]
pub(crate) use signing::test::{server_key, OTHER_KEY_PEM};
