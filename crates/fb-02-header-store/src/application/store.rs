//! # Header Store
//!
//! Canonical header-by-number arena with tiered retention.
//!
//! Every mutating call validates its whole input first and only then
//! mutates, so a rejected call leaves the store exactly as it was.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use shared_crypto::verify_header_pow;
use shared_types::{to_hex, BlockNumber, Hash};
use tracing::{debug, info, warn};

use crate::algorithms::{classify, finalized_below};
use crate::config::HeaderStoreConfig;
use crate::domain::{
    invariant_contiguous_run, invariant_history_range, invariant_thresholds, BatchOutcome,
    ChainError, GcThresholds, HeaderSlot, HeaderState, HistoryTxRootEntry, StoredHeader,
};

/// Header store: exclusive owner of header and GC state.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderStore {
    /// Configuration.
    config: HeaderStoreConfig,
    /// Set by `init_with_header`.
    thresholds: Option<GcThresholds>,
    /// Number of the bootstrap header.
    init_block_number: BlockNumber,
    /// Highest committed block number.
    tip: BlockNumber,
    /// Headers whose content is retained, by number.
    by_number: BTreeMap<BlockNumber, HeaderSlot>,
    /// Hash → number index over `by_number`.
    #[serde_as(as = "Vec<(_, _)>")]
    by_hash: HashMap<Hash, BlockNumber>,
    /// Contiguous, append-only history summaries.
    history: Vec<HistoryTxRootEntry>,
}

impl HeaderStore {
    /// Create an empty, uninitialized store.
    pub fn new(config: HeaderStoreConfig) -> Self {
        Self {
            config,
            thresholds: None,
            init_block_number: 0,
            tip: 0,
            by_number: BTreeMap::new(),
            by_hash: HashMap::new(),
            history: Vec::new(),
        }
    }

    /// True once `init_with_header` succeeded.
    pub fn is_initialized(&self) -> bool {
        self.thresholds.is_some()
    }

    fn require_initialized(&self) -> Result<GcThresholds, ChainError> {
        self.thresholds.ok_or(ChainError::NotInitialized)
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Bootstrap the store with a trusted header.
    ///
    /// # Errors
    /// - `AlreadyInitialized` on a second call
    /// - `InvalidThresholds` if `finalized > canonical`
    /// - `HashMismatch` if `hash` is not the header's content hash
    pub fn init_with_header(
        &mut self,
        header: StoredHeader,
        hash: Hash,
        finalized_gc_threshold: u64,
        canonical_gc_threshold: u64,
    ) -> Result<(), ChainError> {
        if self.is_initialized() {
            return Err(ChainError::AlreadyInitialized);
        }
        let thresholds = GcThresholds {
            finalized_gc_threshold,
            canonical_gc_threshold,
        };
        invariant_thresholds(&thresholds)?;
        if header.hash != hash {
            return Err(ChainError::HashMismatch);
        }

        let number = header.number;
        self.insert(HeaderSlot {
            header,
            state: HeaderState::Canonical,
        });
        self.thresholds = Some(thresholds);
        self.init_block_number = number;
        self.tip = number;

        info!(
            number,
            hash = %to_hex(&hash),
            finalized_gc_threshold,
            canonical_gc_threshold,
            "[fb-02] Header store initialized"
        );
        Ok(())
    }

    /// Append (or, within the canonical tier, replace) a header run.
    ///
    /// The run is accepted when it extends the tip, or when it forks off a
    /// still-canonical header and ends above the current tip.
    ///
    /// # Errors
    /// - `EmptyBatch`, `NonContiguous`, `ParentMismatch` for a malformed run
    /// - `BelowTip` if the run does not end above the tip
    /// - `ReorgTooDeep` if it would replace a finalized header
    /// - `InvalidPow` if PoW checking is enabled and a header fails it
    pub fn add_headers(&mut self, headers: Vec<StoredHeader>) -> Result<BatchOutcome, ChainError> {
        self.require_initialized()?;
        invariant_contiguous_run(&headers)?;

        let (start, start_parent) = match headers.first() {
            Some(h) => (h.number, h.parent_hash),
            None => return Err(ChainError::EmptyBatch),
        };
        let last = headers.last().map(|h| h.number).unwrap_or(start);

        if last <= self.tip {
            return Err(ChainError::BelowTip {
                tip: self.tip,
                last,
            });
        }
        let next = self.tip.checked_add(1).ok_or(ChainError::NonContiguous {
            expected: self.tip,
            got: start,
        })?;
        if start > next {
            return Err(ChainError::NonContiguous {
                expected: next,
                got: start,
            });
        }

        let replaced = self.validate_placement(start, next, &start_parent)?;
        let staged = self.promote_staged(headers)?;

        if replaced > 0 {
            warn!(
                start,
                old_tip = self.tip,
                replaced,
                "[fb-02] Replacing canonical headers"
            );
            for number in start..=self.tip {
                self.remove(number);
            }
        }
        for slot in staged {
            self.insert(slot);
        }
        self.tip = last;
        self.collect_garbage();

        info!(start, tip = last, replaced, "[fb-02] Header batch committed");
        Ok(BatchOutcome {
            start,
            tip: last,
            replaced,
        })
    }

    /// Stage a placed run as `Pending` and promote it to `Canonical`.
    ///
    /// A header whose PoW fails (when checking is enabled) stays `Pending`
    /// and fails the whole run before anything is committed.
    fn promote_staged(&self, headers: Vec<StoredHeader>) -> Result<Vec<HeaderSlot>, ChainError> {
        let mut staged: Vec<HeaderSlot> = headers
            .into_iter()
            .map(|header| HeaderSlot {
                header,
                state: HeaderState::Pending,
            })
            .collect();

        for slot in &mut staged {
            if self.config.verify_pow && !verify_header_pow(&slot.header.raw).unwrap_or(false) {
                return Err(ChainError::InvalidPow {
                    number: slot.header.number,
                });
            }
            slot.state = HeaderState::Canonical;
        }
        Ok(staged)
    }

    /// Check where a contiguous run starting at `start` attaches, given the
    /// number `next` that would extend the tip.
    ///
    /// Returns the number of canonical headers it replaces.
    fn validate_placement(
        &self,
        start: BlockNumber,
        next: BlockNumber,
        parent: &Hash,
    ) -> Result<u64, ChainError> {
        if start == next {
            let tip_hash = self
                .canonical_header_hash(self.tip)
                .ok_or(ChainError::NotInitialized)?;
            if *parent != tip_hash {
                return Err(ChainError::ParentMismatch { number: start });
            }
            return Ok(0);
        }

        if start <= self.init_block_number {
            return Err(ChainError::ReorgTooDeep { number: start });
        }
        let anchor = self
            .by_number
            .get(&(start - 1))
            .ok_or(ChainError::ReorgTooDeep { number: start - 1 })?;
        if anchor.header.hash != *parent {
            return Err(ChainError::ParentMismatch { number: start });
        }
        for number in start..=self.tip {
            match self.by_number.get(&number) {
                Some(slot) if slot.state == HeaderState::Canonical => {}
                _ => return Err(ChainError::ReorgTooDeep { number }),
            }
        }
        Ok(self.tip - start + 1)
    }

    /// Append a history summary over `[start, end]`.
    ///
    /// # Errors
    /// - `HistoryRangeMismatch` unless `start` follows the previous entry
    ///   (or equals the init block number for the first entry)
    /// - `InvalidHistoryRange` if `start > end`
    /// - `HistoryNotFinalized` unless `end < tip - finalized_gc_threshold`
    pub fn add_history_tx_root(
        &mut self,
        start: BlockNumber,
        end: BlockNumber,
        history_tx_root: Hash,
    ) -> Result<(), ChainError> {
        let thresholds = self.require_initialized()?;
        invariant_history_range(self.next_history_start(), start, end)?;
        if !finalized_below(self.tip, &thresholds).is_some_and(|bound| end < bound) {
            return Err(ChainError::HistoryNotFinalized { end, tip: self.tip });
        }

        self.history.push(HistoryTxRootEntry {
            start_block_number: start,
            end_block_number: end,
            history_tx_root,
        });
        self.collect_garbage();

        info!(
            start,
            end,
            root = %to_hex(&history_tx_root),
            "[fb-02] History tx root appended"
        );
        Ok(())
    }

    /// Promote aged headers and drop summarized content.
    fn collect_garbage(&mut self) {
        let Some(thresholds) = self.thresholds else {
            return;
        };
        let Some(bound) = finalized_below(self.tip, &thresholds) else {
            return;
        };
        let covered_until = self.history.last().map(|e| e.end_block_number);

        let mut finalized = 0usize;
        let mut summarized = Vec::new();
        for (number, slot) in self.by_number.range_mut(..bound) {
            let covered = covered_until.is_some_and(|end| *number <= end);
            match classify(*number, self.tip, &thresholds, covered) {
                HeaderState::Summarized => summarized.push(*number),
                HeaderState::Finalized if slot.state != HeaderState::Finalized => {
                    slot.state = HeaderState::Finalized;
                    finalized += 1;
                }
                _ => {}
            }
        }
        for number in &summarized {
            self.remove(*number);
        }

        if finalized > 0 || !summarized.is_empty() {
            debug!(
                tip = self.tip,
                finalized,
                summarized = summarized.len(),
                "[fb-02] GC pass"
            );
        }
    }

    fn insert(&mut self, slot: HeaderSlot) {
        self.by_hash.insert(slot.header.hash, slot.header.number);
        self.by_number.insert(slot.header.number, slot);
    }

    fn remove(&mut self, number: BlockNumber) {
        if let Some(slot) = self.by_number.remove(&number) {
            self.by_hash.remove(&slot.header.hash);
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Highest committed block number.
    pub fn latest_block_number(&self) -> BlockNumber {
        self.tip
    }

    /// Epoch of the tip header.
    pub fn latest_epoch(&self) -> Option<u64> {
        self.by_number.get(&self.tip).map(|slot| slot.header.epoch)
    }

    /// Number of the bootstrap header.
    pub fn init_block_number(&self) -> BlockNumber {
        self.init_block_number
    }

    /// GC thresholds, once initialized.
    pub fn thresholds(&self) -> Option<GcThresholds> {
        self.thresholds
    }

    /// Canonical hash at `number`, if its content is retained.
    pub fn canonical_header_hash(&self, number: BlockNumber) -> Option<Hash> {
        self.by_number.get(&number).map(|slot| slot.header.hash)
    }

    /// Transactions root of the retained canonical header with `hash`.
    pub fn canonical_transactions_root(&self, hash: &Hash) -> Option<Hash> {
        self.by_hash
            .get(hash)
            .and_then(|number| self.by_number.get(number))
            .map(|slot| slot.header.transactions_root)
    }

    /// Retained header at `number`.
    pub fn header(&self, number: BlockNumber) -> Option<&StoredHeader> {
        self.by_number.get(&number).map(|slot| &slot.header)
    }

    /// Tier of `number`, or `None` if the store never held it.
    pub fn header_state(&self, number: BlockNumber) -> Option<HeaderState> {
        if let Some(slot) = self.by_number.get(&number) {
            return Some(slot.state);
        }
        self.history_entry_covering(number)
            .map(|_| HeaderState::Summarized)
    }

    /// True if the header at `number` can serve a direct SPV proof.
    pub fn is_retained(&self, number: BlockNumber) -> bool {
        self.by_number.contains_key(&number)
    }

    /// Lowest block number whose content is still retained.
    pub fn gc_boundary(&self) -> Option<BlockNumber> {
        self.by_number.keys().next().copied()
    }

    /// All history summaries, oldest first.
    pub fn history_entries(&self) -> &[HistoryTxRootEntry] {
        &self.history
    }

    /// The history summary covering `number`.
    pub fn history_entry_covering(&self, number: BlockNumber) -> Option<&HistoryTxRootEntry> {
        let idx = self
            .history
            .partition_point(|entry| entry.end_block_number < number);
        self.history.get(idx).filter(|entry| entry.covers(number))
    }

    /// The history summary with exactly the range `[start, end]`.
    pub fn history_entry_for_range(
        &self,
        start: BlockNumber,
        end: BlockNumber,
    ) -> Option<&HistoryTxRootEntry> {
        self.history_entry_covering(start)
            .filter(|entry| entry.start_block_number == start && entry.end_block_number == end)
    }

    /// Where the next history summary must start.
    pub fn next_history_start(&self) -> BlockNumber {
        self.history
            .last()
            .map(|entry| entry.end_block_number + 1)
            .unwrap_or(self.init_block_number)
    }
}

impl Default for HeaderStore {
    fn default() -> Self {
        Self::new(HeaderStoreConfig::default())
    }
}
