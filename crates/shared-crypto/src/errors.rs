//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Recovery id (`v`) outside `{27, 28}`.
    #[error("invalid v of signature(r, s, v): {0}")]
    InvalidRecoveryId(u8),

    /// `r`/`s` do not form a valid secp256k1 signature.
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Public key recovery failed.
    #[error("Public key recovery failed")]
    RecoveryFailed,

    /// Input of the wrong length for a fixed-size primitive.
    #[error("Invalid input length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },
}
