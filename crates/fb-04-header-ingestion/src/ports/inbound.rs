//! # Inbound Ports
//!
//! Governed mutations of the CKB header chain.

use fb_02_header_store::BatchOutcome;
use shared_types::{BlockNumber, Hash};

use crate::domain::IngestionError;

/// Header ingestion API - inbound port.
pub trait HeaderIngestionApi {
    /// Bootstrap the chain from a trusted 208-byte header.
    ///
    /// Deployment-time call; not signature gated.
    fn init_with_header(
        &mut self,
        header: &[u8],
        hash: Hash,
        finalized_gc_threshold: u64,
        canonical_gc_threshold: u64,
    ) -> Result<(), IngestionError>;

    /// Append or reorg a run of headers, encoded as a HeaderVec and signed
    /// as `AddHeaders(bytes data)`.
    fn add_headers(
        &mut self,
        header_vec: &[u8],
        signatures: &[u8],
    ) -> Result<BatchOutcome, IngestionError>;

    /// Append a history summary, signed as `AddHistoryTxRoot`.
    fn add_history_tx_root(
        &mut self,
        start_block_number: BlockNumber,
        end_block_number: BlockNumber,
        history_tx_root: Hash,
        signatures: &[u8],
    ) -> Result<(), IngestionError>;
}
