//! # FB-01 View Parsers
//!
//! Zero-copy decoders for CKB's molecule encoding.
//!
//! **Component ID:** 01
//! **Architecture:** Pure library (no ports, no state)
//!
//! ## Purpose
//!
//! Every payload that crosses from the source chain (headers, SPV proofs,
//! burn transactions) arrives as molecule bytes. Views validate the frame
//! (declared lengths, offsets, field counts) once and then hand out slices
//! of the caller's buffer; nothing is copied except fixed-size scalars.
//!
//! ## Module Structure
//!
//! ```text
//! fb-01-view-parsers/
//! ├── molecule.rs     # table / fixvec / dynvec frames, scalar readers, builders
//! ├── header.rs       # RawHeader, Header, HeaderVec
//! ├── transaction.rs  # Script, CellInput, CellOutput, RawTransaction, RecipientCellData
//! ├── proof.rs        # CKBTxProof, CKBHistoryTxProof, CKBHistoryTxRootProof, CKBUnlockTokenParam
//! └── errors.rs       # ViewError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod header;
pub mod molecule;
pub mod proof;
pub mod transaction;

// Re-exports
pub use errors::ViewError;
pub use header::{
    pack_header_vec, Header, HeaderVecView, HeaderView, RawHeader, RawHeaderView, HEADER_SIZE,
    RAW_HEADER_SIZE,
};
pub use molecule::{pack_bytes, pack_fixvec, pack_table, FixVecView, TableView};
pub use proof::{
    CkbHistoryTxProof, CkbHistoryTxProofView, CkbHistoryTxRootProof, CkbHistoryTxRootProofView,
    CkbTxProof, CkbTxProofView, CkbUnlockTokenParam, CkbUnlockTokenParamView,
};
pub use transaction::{
    CellInput, CellOutput, CellOutputView, OutPoint, RawTransaction, RawTransactionView,
    RecipientCellData, Script, ScriptView,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
