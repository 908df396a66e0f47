//! # Domain Errors
//!
//! Signature-set failures and the crate-level wrapper.

use fb_01_view_parsers::ViewError;
use fb_02_header_store::ChainError;
use thiserror::Error;

/// Multisig failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Blob empty or not a whole number of 65-byte records.
    #[error("invalid signatures length: {len}")]
    InvalidLength {
        /// Blob length
        len: usize,
    },

    /// Not enough signatures for the threshold.
    #[error("insufficient signatures: required {required}, got {got}")]
    BelowThreshold {
        /// Multisig threshold
        required: u64,
        /// Signatures supplied (or distinct valid signers)
        got: u64,
    },

    /// `v` outside {27, 28}.
    #[error("invalid v of signature(r, s, v): {0}")]
    InvalidRecoveryId(u8),

    /// Malformed `(r, s)` or no key recoverable.
    #[error("signature recovery failed")]
    RecoveryFailed,

    /// Recovered address is not a validator.
    #[error("signer is not a validator: {0}")]
    UnknownSigner(String),

    /// Same validator signed twice.
    #[error("duplicate signer: {0}")]
    DuplicateSigner(String),
}

/// Header ingestion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    /// Chain or governance-state failure.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Signature-set failure.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Malformed input bytes.
    #[error(transparent)]
    View(#[from] ViewError),

    /// Rejected configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
