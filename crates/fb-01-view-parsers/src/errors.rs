//! # View Errors
//!
//! Format errors raised while decoding molecule-encoded buffers.

use thiserror::Error;

/// Malformed input. Every variant is a hard failure of the enclosing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Buffer too short to hold even the size header.
    #[error("{name}: buffer too short: need {needed} bytes, got {actual}")]
    Truncated {
        /// Schema name
        name: &'static str,
        /// Minimum bytes required
        needed: usize,
        /// Bytes available
        actual: usize,
    },

    /// Declared length disagrees with the buffer length.
    #[error("{name}: declared size {declared} != actual size {actual}")]
    SizeMismatch {
        /// Schema name
        name: &'static str,
        /// Size declared by the header (or implied by the item count)
        declared: usize,
        /// Buffer length
        actual: usize,
    },

    /// Offset misaligned, non-monotonic or past the end of the buffer.
    #[error("{name}: invalid offset {offset} at slot {slot}")]
    InvalidOffset {
        /// Schema name
        name: &'static str,
        /// Offset slot index
        slot: usize,
        /// Offending offset value
        offset: usize,
    },

    /// Table carries fewer fields than the schema requires.
    #[error("{name}: expected at least {expected} fields, found {actual}")]
    FieldCountMismatch {
        /// Schema name
        name: &'static str,
        /// Fields required
        expected: usize,
        /// Fields present
        actual: usize,
    },

    /// Positional access past the end of a vector.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Vector length
        len: usize,
    },
}
