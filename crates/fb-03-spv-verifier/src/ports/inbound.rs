//! # Inbound Ports
//!
//! What a CKB SPV client can answer about a header store.

use fb_01_view_parsers::ViewError;
use shared_types::{BlockNumber, Hash, TinyHeader};

/// SPV API - inbound port.
///
/// Every method takes the encoded proof. A well-formed proof that does not
/// verify is a negative answer, not an error.
pub trait SpvApi {
    /// Prove a transaction against a retained header.
    ///
    /// `proof` is a `CkbTxProof`. The block must be at or below both
    /// `latest_block_number` and the store tip.
    fn prove_tx_exist(&self, proof: &[u8], latest_block_number: BlockNumber) -> Result<bool, ViewError>;

    /// Authenticate tiny headers against a stored history root.
    ///
    /// `proof` is a `CkbHistoryTxRootProof`.
    fn prove_tx_root_exist(&self, proof: &[u8]) -> Result<Option<Vec<TinyHeader>>, ViewError>;

    /// Prove a transaction against an authenticated block `tx_root`.
    ///
    /// `proof` is a `CkbHistoryTxProof`.
    fn prove_history_tx_exist(&self, proof: &[u8], tx_root: &Hash) -> Result<bool, ViewError>;
}
