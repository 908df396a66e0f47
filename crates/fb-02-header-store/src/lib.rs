//! # FB-02 Header Store
//!
//! Canonical CKB header chain with tiered garbage collection.
//!
//! **Component ID:** 02
//! **Architecture:** Hexagonal (domain + algorithms + application service)
//!
//! ## Purpose
//!
//! Keep just enough of the source chain to answer SPV queries:
//! - recent headers (Canonical tier) may still be replaced by a longer fork
//! - older headers (Finalized tier) are immutable and keep full content
//! - headers past the canonical GC horizon that a history root covers
//!   (Summarized tier) are dropped; the history root proves them instead
//!
//! ## Module Structure
//!
//! ```text
//! fb-02-header-store/
//! ├── domain/          # StoredHeader, HeaderState, HistoryTxRootEntry, ChainError, invariants
//! ├── algorithms/      # Tier classification
//! ├── application/     # HeaderStore
//! └── config.rs        # HeaderStoreConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-exports
pub use algorithms::classify;
pub use application::HeaderStore;
pub use config::HeaderStoreConfig;
pub use domain::{
    BatchOutcome, ChainError, GcThresholds, HeaderSlot, HeaderState, HistoryTxRootEntry,
    StoredHeader,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
