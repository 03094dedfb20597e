use std::sync::Arc;

use crate::crypto::{DhGroup, RsaSigningKey};
use crate::Error;

/// Key exchange configuration, shared between connections.
#[derive(Clone, Debug)]
pub struct Config {
    dh_params: DhGroup,
    signing_key: Option<Arc<RsaSigningKey>>,
    min_dh_prime_bits: u64,
    max_message_size: usize,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            dh_params: DhGroup::ffdhe2048(),
            signing_key: None,
            min_dh_prime_bits: 2048,
            max_message_size: 16_384,
        }
    }

    /// DH group template copied into every connection that sends a
    /// ServerKeyExchange.
    #[inline(always)]
    pub fn dh_params(&self) -> &DhGroup {
        &self.dh_params
    }

    /// Server private key used to sign the DH parameters.
    #[inline(always)]
    pub fn signing_key(&self) -> Option<&RsaSigningKey> {
        self.signing_key.as_deref()
    }

    /// Smallest DH prime accepted from a peer, and allowed in our own group.
    #[inline(always)]
    pub fn min_dh_prime_bits(&self) -> u64 {
        self.min_dh_prime_bits
    }

    /// Largest handshake message body we are willing to write.
    #[inline(always)]
    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }
}

impl Default for Config {
    fn default() -> Self {
        // ffdhe2048 meets the default minimum, nothing to check.
        Config::builder().into_config()
    }
}

/// Builder for [`Config`].
pub struct ConfigBuilder {
    dh_params: DhGroup,
    signing_key: Option<Arc<RsaSigningKey>>,
    min_dh_prime_bits: u64,
    max_message_size: usize,
}

impl ConfigBuilder {
    /// Set the DH group template.
    ///
    /// Defaults to RFC 7919 ffdhe2048.
    pub fn dh_params(mut self, group: DhGroup) -> Self {
        self.dh_params = group;
        self
    }

    /// Set the private key used to sign ServerKeyExchange.
    pub fn signing_key(mut self, key: RsaSigningKey) -> Self {
        self.signing_key = Some(Arc::new(key));
        self
    }

    /// Set the smallest acceptable DH prime in bits.
    ///
    /// Defaults to 2048.
    pub fn min_dh_prime_bits(mut self, bits: u64) -> Self {
        self.min_dh_prime_bits = bits;
        self
    }

    /// Set the largest message body we write.
    ///
    /// Defaults to 16384.
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Build the configuration, checking the DH group against the minimum.
    pub fn build(self) -> Result<Config, Error> {
        self.dh_params
            .check(self.min_dh_prime_bits)
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        Ok(self.into_config())
    }

    fn into_config(self) -> Config {
        Config {
            dh_params: self.dh_params,
            signing_key: self.signing_key,
            min_dh_prime_bits: self.min_dh_prime_bits,
            max_message_size: self.max_message_size,
        }
    }
}
