//! # Domain Entities
//!
//! Headers as the store keeps them, their retention tier, and the history
//! summaries that replace pruned headers.

use fb_01_view_parsers::HeaderView;
use serde::{Deserialize, Serialize};
use shared_types::{BlockNumber, Hash};

/// A decoded CKB header plus its raw bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHeader {
    /// Block number.
    pub number: BlockNumber,
    /// Header hash (content hash of `raw`).
    pub hash: Hash,
    /// Parent header hash.
    pub parent_hash: Hash,
    /// Timestamp in milliseconds.
    pub timestamp: u64,
    /// Packed epoch.
    pub epoch: u64,
    /// `merge(raw_transactions_root, witnesses_root)`.
    pub transactions_root: Hash,
    /// Uncles (extra) hash.
    pub uncles_hash: Hash,
    /// Compact difficulty target.
    pub compact_target: u32,
    /// Header version.
    pub version: u32,
    /// PoW nonce.
    pub nonce: u128,
    /// Serialized 208-byte header.
    pub raw: Vec<u8>,
}

impl StoredHeader {
    /// Decode from a header view, computing its hash.
    pub fn from_view(view: HeaderView<'_>) -> Self {
        let raw = view.raw();
        Self {
            number: raw.number(),
            hash: view.calc_hash(),
            parent_hash: raw.parent_hash(),
            timestamp: raw.timestamp(),
            epoch: raw.epoch(),
            transactions_root: raw.transactions_root(),
            uncles_hash: raw.extra_hash(),
            compact_target: raw.compact_target(),
            version: raw.version(),
            nonce: view.nonce(),
            raw: view.as_slice().to_vec(),
        }
    }
}

/// Retention tier of a header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderState {
    /// Staged in an incoming batch, awaiting its PoW check. Never committed.
    Pending,
    /// Within `finalized_gc_threshold` of the tip; may still be replaced.
    Canonical,
    /// Older than `finalized_gc_threshold`; immutable, content retained.
    Finalized,
    /// Older than `canonical_gc_threshold` and covered by a history root;
    /// content dropped.
    Summarized,
}

/// A header in the arena together with its tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSlot {
    /// The header.
    pub header: StoredHeader,
    /// Its tier.
    pub state: HeaderState,
}

/// Aggregated commitment over the tiny headers of `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTxRootEntry {
    /// First block covered.
    pub start_block_number: BlockNumber,
    /// Last block covered.
    pub end_block_number: BlockNumber,
    /// CBMT root over the range's tiny headers.
    pub history_tx_root: Hash,
}

impl HistoryTxRootEntry {
    /// True if `number` lies within the entry's range.
    pub fn covers(&self, number: BlockNumber) -> bool {
        self.start_block_number <= number && number <= self.end_block_number
    }

    /// Number of leaves committed by the root.
    pub fn leaf_count(&self) -> u64 {
        self.end_block_number - self.start_block_number + 1
    }
}

/// Garbage-collection thresholds fixed at initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcThresholds {
    /// Age beyond which a header becomes `Finalized`.
    pub finalized_gc_threshold: u64,
    /// Age beyond which a covered header becomes `Summarized`.
    pub canonical_gc_threshold: u64,
}

/// Outcome of a committed header batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchOutcome {
    /// First block number of the batch.
    pub start: BlockNumber,
    /// New tip.
    pub tip: BlockNumber,
    /// Number of previously canonical headers that were replaced.
    pub replaced: u64,
}
