//! # Tiered Garbage Collection
//!
//! Headers age through three committed tiers as the tip advances:
//!
//! 1. **Canonical**: `tip - number ≤ finalized_gc_threshold`. Replaceable
//!    by a reorg batch.
//! 2. **Finalized**: older than that. Immutable; full content retained so
//!    direct SPV proofs still work.
//! 3. **Summarized**: `tip - number > canonical_gc_threshold` AND covered
//!    by a history root. Content dropped; only the root proves inclusion.
//!
//! A finalized header that no history root covers yet is never dropped, so
//! every block number at or above the init header stays provable.

use crate::domain::{GcThresholds, HeaderState};
use shared_types::BlockNumber;

/// Exclusive upper bound of the finalized tier at `tip`, if any.
pub fn finalized_below(tip: BlockNumber, thresholds: &GcThresholds) -> Option<BlockNumber> {
    tip.checked_sub(thresholds.finalized_gc_threshold)
}

/// Exclusive upper bound of the summarizable age at `tip`, if any.
pub fn summarizable_below(tip: BlockNumber, thresholds: &GcThresholds) -> Option<BlockNumber> {
    tip.checked_sub(thresholds.canonical_gc_threshold)
}

/// Tier of a committed header.
pub fn classify(
    number: BlockNumber,
    tip: BlockNumber,
    thresholds: &GcThresholds,
    covered_by_history: bool,
) -> HeaderState {
    let below = |bound: Option<BlockNumber>| bound.is_some_and(|b| number < b);

    if covered_by_history && below(summarizable_below(tip, thresholds)) {
        HeaderState::Summarized
    } else if below(finalized_below(tip, thresholds)) {
        HeaderState::Finalized
    } else {
        HeaderState::Canonical
    }
}
