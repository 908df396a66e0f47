//! # Domain Errors
//!
//! Proof and balance failures plus the crate-level wrapper.

use fb_01_view_parsers::ViewError;
use fb_04_header_ingestion::IngestionError;
use primitive_types::U256;
use thiserror::Error;

/// A burn proof was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Inclusion path does not reach the committed root.
    #[error("burn tx not proven in block {block_number}")]
    NotProven {
        /// Claimed block
        block_number: u64,
    },

    /// Block is no longer retained and no trusted summary covers the proof.
    #[error("block {block_number} outside any trusted history root")]
    RangeNotTrusted {
        /// Claimed block
        block_number: u64,
    },

    /// Burn tx already unlocked (earlier or in this batch).
    #[error("burn tx already used: {0}")]
    ProofReplayed(String),

    /// Supplied SPV source is not the trusted one.
    #[error("untrusted spv source: expected {expected}, got {got}")]
    UntrustedSpvSource {
        /// Trusted source
        expected: String,
        /// Supplied source
        got: String,
    },

    /// Burn tx does not decode as a recipient cell.
    #[error("malformed burn tx: {0}")]
    MalformedBurnTx(String),

    /// Output 0 does not carry the configured recipient typescript.
    #[error("recipient typescript mismatch")]
    WrongRecipientTypescript,

    /// Burn is addressed to another locker.
    #[error("burn tx addressed to lock contract {0}")]
    WrongLockContract(String),

    /// `bridgeFee >= bridgeAmount`.
    #[error("bridge fee {fee} not below amount {amount}")]
    FeeNotBelowAmount {
        /// Bridge amount
        amount: u128,
        /// Bridge fee
        fee: u128,
    },
}

/// Value accounting failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// Attached native value differs from what the call requires.
    #[error("value mismatch: expected {expected}, got {got}")]
    ValueMismatch {
        /// Required value
        expected: U256,
        /// Attached value
        got: U256,
    },

    /// Holder cannot cover a transfer.
    #[error("insufficient balance of {token} for {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        /// Asset
        token: String,
        /// Debited account
        holder: String,
        /// Requested amount
        needed: U256,
        /// Available amount
        available: U256,
    },

    /// Locked balance cannot cover an unlock.
    #[error("insufficient locked {token}: need {needed}, locked {locked}")]
    InsufficientLocked {
        /// Asset
        token: String,
        /// Requested amount
        needed: U256,
        /// Locked amount
        locked: U256,
    },

    /// Arithmetic overflow.
    #[error("balance overflow")]
    Overflow,
}

/// Token locker errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockerError {
    /// Burn proof rejected.
    #[error(transparent)]
    Proof(#[from] ProofError),

    /// Value accounting failure.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Signature or nonce failure on a governed action.
    #[error(transparent)]
    Governance(#[from] IngestionError),

    /// Malformed proof envelope.
    #[error(transparent)]
    View(#[from] ViewError),

    /// Lock request rejected before any transfer.
    #[error("invalid lock: {0}")]
    InvalidLock(String),

    /// Rejected configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
