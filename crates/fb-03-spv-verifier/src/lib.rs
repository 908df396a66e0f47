//! # fb-03 SPV Verifier
//!
//! **Subsystem ID:** 3
//! **Purpose:** Answer inclusion queries about CKB transactions using only
//! the headers held by `fb-02-header-store`.
//!
//! ## Module Structure
//!
//! ```text
//! fb-03-spv-verifier/
//! ├── algorithms/
//! │   └── cbmt.rs        # Complete Binary Merkle Tree: roots, paths, multi-proofs
//! ├── application/
//! │   └── verifier.rs    # SpvVerifier over a borrowed HeaderStore
//! └── ports/
//!     └── inbound.rs     # SpvApi trait
//! ```
//!
//! ## Proof Kinds
//!
//! | Proof | Checked against |
//! |-------|-----------------|
//! | `CkbTxProof` | `transactions_root` of a retained canonical header |
//! | `CkbHistoryTxRootProof` | a stored history root with the exact range |
//! | `CkbHistoryTxProof` | a caller-supplied, already-authenticated `tx_root` |
//!
//! The verifier never mutates the store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod ports;

pub use algorithms::{
    build_proof, build_root, is_left, merge, multi_proof_root, parent, sibling,
    single_proof_root, transactions_root, CbmtProof,
};
pub use application::SpvVerifier;
pub use ports::SpvApi;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
