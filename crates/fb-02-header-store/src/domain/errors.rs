//! # Domain Errors
//!
//! Chain-consistency failures raised by the header store and by the
//! governance layer on top of it.

use thiserror::Error;

/// Chain error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Store used before `init_with_header`.
    #[error("header store not initialized")]
    NotInitialized,

    /// `init_with_header` called twice.
    #[error("header store already initialized")]
    AlreadyInitialized,

    /// GC thresholds out of order.
    #[error("invalid gc thresholds: finalized {finalized} > canonical {canonical}")]
    InvalidThresholds {
        /// Finalized threshold
        finalized: u64,
        /// Canonical threshold
        canonical: u64,
    },

    /// Supplied hash is not the content hash of the header.
    #[error("header hash mismatch")]
    HashMismatch,

    /// Empty header batch.
    #[error("empty header batch")]
    EmptyBatch,

    /// Block numbers do not follow on.
    #[error("non-contiguous header: expected number {expected}, got {got}")]
    NonContiguous {
        /// Expected block number
        expected: u64,
        /// Received block number
        got: u64,
    },

    /// Parent hash does not link to the previous header.
    #[error("parent hash mismatch at block {number}")]
    ParentMismatch {
        /// Block whose parent link is broken
        number: u64,
    },

    /// Batch does not extend the chain past the current tip.
    #[error("header batch ends at {last}, not above tip {tip}")]
    BelowTip {
        /// Current tip
        tip: u64,
        /// Last number in the batch
        last: u64,
    },

    /// Batch would replace a header that is no longer in the canonical tier.
    #[error("cannot replace block {number}: already finalized")]
    ReorgTooDeep {
        /// Oldest block the batch tried to replace
        number: u64,
    },

    /// Auxiliary proof-of-work check failed.
    #[error("invalid proof of work at block {number}")]
    InvalidPow {
        /// Offending block
        number: u64,
    },

    /// History root does not start where the previous one ended.
    #[error("history root must start at {expected}, got {got}")]
    HistoryRangeMismatch {
        /// Required start block
        expected: u64,
        /// Supplied start block
        got: u64,
    },

    /// History root range is empty or inverted.
    #[error("invalid history range [{start}, {end}]")]
    InvalidHistoryRange {
        /// Start block
        start: u64,
        /// End block
        end: u64,
    },

    /// History root covers blocks that are not finalized yet.
    #[error("history range end {end} not finalized at tip {tip}")]
    HistoryNotFinalized {
        /// End block of the range
        end: u64,
        /// Current tip
        tip: u64,
    },

    /// Governance nonce is not the expected next value.
    #[error("invalid {action} nonce: expected {expected}, got {got}")]
    InvalidNonce {
        /// Action name
        action: &'static str,
        /// Expected nonce
        expected: u64,
        /// Supplied nonce
        got: u64,
    },

    /// Validator set or threshold is unusable.
    #[error("invalid validator set: {0}")]
    InvalidValidatorSet(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_contiguous_message() {
        let err = ChainError::NonContiguous {
            expected: 11,
            got: 13,
        };
        let msg = err.to_string();
        assert!(msg.contains("11"));
        assert!(msg.contains("13"));
    }

    #[test]
    fn test_invalid_nonce_message() {
        let err = ChainError::InvalidNonce {
            action: "setNewCkbSpv",
            expected: 1,
            got: 0,
        };
        assert_eq!(
            err.to_string(),
            "invalid setNewCkbSpv nonce: expected 1, got 0"
        );
    }
}
