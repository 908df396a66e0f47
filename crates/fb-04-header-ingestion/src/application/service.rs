//! # Header Ingestion Service
//!
//! Owns the header store and puts every mutation behind the validator
//! multisig.
//!
//! ## Flow
//!
//! ```text
//! headerVec bytes ──decode──▶ struct hash ──EIP-712──▶ digest
//!                                                       │
//!                            signatures ──recover──────▶ M-of-N check
//!                                                       │
//!                                              HeaderStore::add_headers
//! ```
//!
//! Decoding and signature checks complete before the store is touched, so
//! a rejected call changes nothing.

use fb_01_view_parsers::{HeaderVecView, HeaderView};
use fb_02_header_store::{BatchOutcome, HeaderStore, StoredHeader};
use shared_types::{to_hex, Address, BlockNumber, Hash};
use tracing::{info, warn};

use crate::application::MultisigGuard;
use crate::config::IngestionConfig;
use crate::domain::{
    add_headers_hash, add_history_tx_root_hash, domain_separator, IngestionError, NonceAction,
    ValidatorSet,
};
use crate::ports::HeaderIngestionApi;

/// Governed header ingestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderIngestionService {
    address: Address,
    store: HeaderStore,
    guard: MultisigGuard,
}

impl HeaderIngestionService {
    /// Create the service from a validated config.
    pub fn new(config: IngestionConfig) -> Result<Self, IngestionError> {
        let validators = config.validate()?;
        let separator = domain_separator(
            &config.domain_name,
            config.chain_id,
            &config.verifying_contract,
        );
        info!(
            contract = %to_hex(&config.verifying_contract),
            validators = validators.validators().len(),
            threshold = validators.multisig_threshold(),
            "[fb-04] Header ingestion service created"
        );
        Ok(Self {
            address: config.verifying_contract,
            store: HeaderStore::new(config.store),
            guard: MultisigGuard::new(separator, validators),
        })
    }

    /// Address of this service on the verifying ledger.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Read-only view of the header store.
    pub fn header_store(&self) -> &HeaderStore {
        &self.store
    }

    /// EIP-712 domain separator.
    pub fn domain_separator(&self) -> Hash {
        self.guard.domain_separator()
    }

    /// Expected nonce for a nonce-gated action.
    pub fn current_nonce(&self, action: NonceAction) -> u64 {
        self.guard.current_nonce(action)
    }

    /// Active validator set.
    pub fn validator_set(&self) -> &ValidatorSet {
        self.guard.validator_set()
    }

    /// Digest validators sign for `struct_hash` under this domain.
    pub fn digest(&self, struct_hash: &Hash) -> Hash {
        self.guard.digest(struct_hash)
    }

    /// Replace the validator set.
    pub fn set_validators(
        &mut self,
        validators: Vec<Address>,
        multisig_threshold: u64,
        nonce: u64,
        signatures: &[u8],
    ) -> Result<(), IngestionError> {
        self.guard
            .set_validators(validators, multisig_threshold, nonce, signatures)
    }
}

impl HeaderIngestionApi for HeaderIngestionService {
    fn init_with_header(
        &mut self,
        header: &[u8],
        hash: Hash,
        finalized_gc_threshold: u64,
        canonical_gc_threshold: u64,
    ) -> Result<(), IngestionError> {
        let view = HeaderView::from_slice(header)?;
        self.store.init_with_header(
            StoredHeader::from_view(view),
            hash,
            finalized_gc_threshold,
            canonical_gc_threshold,
        )?;
        Ok(())
    }

    fn add_headers(
        &mut self,
        header_vec: &[u8],
        signatures: &[u8],
    ) -> Result<BatchOutcome, IngestionError> {
        let headers = HeaderVecView::from_slice(header_vec)?;
        self.guard.authorize(&add_headers_hash(header_vec), signatures)?;

        let run: Vec<StoredHeader> = headers.iter().map(StoredHeader::from_view).collect();
        let outcome = self.store.add_headers(run).inspect_err(|e| {
            warn!(error = %e, "[fb-04] Signed header batch rejected by store");
        })?;

        info!(
            start = outcome.start,
            tip = outcome.tip,
            replaced = outcome.replaced,
            "[fb-04] Headers ingested"
        );
        Ok(outcome)
    }

    fn add_history_tx_root(
        &mut self,
        start_block_number: BlockNumber,
        end_block_number: BlockNumber,
        history_tx_root: Hash,
        signatures: &[u8],
    ) -> Result<(), IngestionError> {
        let struct_hash =
            add_history_tx_root_hash(start_block_number, end_block_number, &history_tx_root);
        self.guard.authorize(&struct_hash, signatures)?;
        self.store
            .add_history_tx_root(start_block_number, end_block_number, history_tx_root)?;
        Ok(())
    }
}
