//! # Force Bridge Test Suite
//!
//! Cross-crate flows over the whole verification core.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs       # Bridge harness: validators, chain, locker
//!     ├── header_flows.rs   # Signed ingestion, reorgs, GC tiers, governance replay
//!     ├── spv_flows.rs      # Direct and aggregated inclusion proofs
//!     └── locker_flows.rs   # Lock/unlock round trips, replay, SPV rotation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p fb-tests
//! cargo test -p fb-tests integration::locker_flows::
//! ```

pub mod integration;
