//! # FB-04 Header Ingestion
//!
//! **Component ID:** 04
//! **Purpose:** Gate every header-chain mutation behind an M-of-N validator
//! multisig over EIP-712 typed data.
//!
//! ## Governed Actions
//!
//! | Action | Struct | Replay protection |
//! |--------|--------|-------------------|
//! | `add_headers` | `AddHeaders(bytes data)` | chain contiguity |
//! | `add_history_tx_root` | `AddHistoryTxRoot(uint64,uint64,bytes32)` | range contiguity |
//! | `set_validators` | `SetValidators(address[],uint64,uint256 nonce)` | nonce |
//! | `set_new_ckb_spv` (fb-05) | `SetNewCkbSpv(address,uint256 nonce)` | nonce |
//!
//! Nonce-gated actions check the nonce before recovering any signer.
//!
//! ## Module Structure
//!
//! ```text
//! fb-04-header-ingestion/
//! ├── domain/
//! │   ├── entities.rs     # ValidatorSet, NonceAction, NonceBook
//! │   ├── errors.rs       # SignatureError, IngestionError
//! │   └── typed_data.rs   # EIP-712 domain separator, struct hashes, digest
//! ├── algorithms/
//! │   └── multisig.rs     # Signature blob parsing, M-of-N recovery
//! ├── application/
//! │   ├── guard.rs        # MultisigGuard (shared with fb-05)
//! │   └── service.rs      # HeaderIngestionService
//! ├── ports/
//! │   └── inbound.rs      # HeaderIngestionApi
//! └── config.rs           # IngestionConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-exports
pub use algorithms::{parse_signatures, verify_signatures};
pub use application::{HeaderIngestionService, MultisigGuard};
pub use config::IngestionConfig;
pub use domain::{
    add_headers_hash, add_history_tx_root_hash, domain_separator, set_new_ckb_spv_hash,
    set_validators_hash, typed_data_digest, IngestionError, NonceAction, NonceBook,
    SignatureError, ValidatorSet, CKB_CHAIN_DOMAIN_NAME, TOKEN_LOCKER_DOMAIN_NAME,
};
pub use ports::HeaderIngestionApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
