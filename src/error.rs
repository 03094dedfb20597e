use thiserror::Error;

/// Errors from decoding or encoding a ServerKeyExchange.
///
/// Every error is fatal for the connection. The caller is expected to
/// abort the handshake and discard the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A declared or fixed size field exceeds the remaining bytes.
    #[error("Truncated input: {0}")]
    TruncatedInput(String),

    /// Hash or signature identifier outside the single supported pair.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The peer's signature over the DH parameters did not verify.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Producing our own signature failed.
    #[error("Signing failure: {0}")]
    SigningFailure(String),

    /// An output span could not be reserved.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// DH group or public value failed the sanity checks.
    #[error("Invalid DH parameters: {0}")]
    InvalidDhParams(String),

    /// The session is not in a state where this message is allowed.
    #[error("Unexpected message: {0}")]
    UnexpectedMessage(String),

    /// Key or group material could not be loaded.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Some other cryptographic operation failed.
    #[error("Crypto error: {0}")]
    CryptoError(String),
}
