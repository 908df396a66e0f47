//! # Domain Invariants
//!
//! Rules every header batch and history root must satisfy before the store
//! mutates anything.

use super::entities::{GcThresholds, StoredHeader};
use super::errors::ChainError;

/// Invariant: thresholds are ordered, `finalized ≤ canonical`.
pub fn invariant_thresholds(thresholds: &GcThresholds) -> Result<(), ChainError> {
    if thresholds.finalized_gc_threshold > thresholds.canonical_gc_threshold {
        return Err(ChainError::InvalidThresholds {
            finalized: thresholds.finalized_gc_threshold,
            canonical: thresholds.canonical_gc_threshold,
        });
    }
    Ok(())
}

/// Invariant: a header run is internally contiguous.
///
/// Each header's number is its predecessor's plus one and its parent hash is
/// the predecessor's hash.
pub fn invariant_contiguous_run(headers: &[StoredHeader]) -> Result<(), ChainError> {
    if headers.is_empty() {
        return Err(ChainError::EmptyBatch);
    }
    for pair in headers.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.number.checked_add(1) != Some(next.number) {
            return Err(ChainError::NonContiguous {
                expected: prev.number.saturating_add(1),
                got: next.number,
            });
        }
        if next.parent_hash != prev.hash {
            return Err(ChainError::ParentMismatch {
                number: next.number,
            });
        }
    }
    Ok(())
}

/// Invariant: a history range is non-empty and follows on from the last one.
pub fn invariant_history_range(
    expected_start: u64,
    start: u64,
    end: u64,
) -> Result<(), ChainError> {
    if start != expected_start {
        return Err(ChainError::HistoryRangeMismatch {
            expected: expected_start,
            got: start,
        });
    }
    if start > end {
        return Err(ChainError::InvalidHistoryRange { start, end });
    }
    Ok(())
}
