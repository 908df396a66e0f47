//! # FB-05 Token Locker
//!
//! **Component ID:** 05
//! **Purpose:** Lock value on the verifying ledger for minting on CKB, and
//! release it again exactly once per proven CKB burn.
//!
//! ## Trust
//!
//! The locker trusts one SPV source at a time (a `CkbSpvSource`, normally the
//! `fb-04` ingestion service). Rotating it is a multisig + nonce action
//! signed as `SetNewCkbSpv(address newSpvAddress,uint256 nonce)` under the
//! `"Force Bridge TokenLocker"` domain.
//!
//! ## Module Structure
//!
//! ```text
//! fb-05-token-locker/
//! ├── domain/
//! │   ├── entities.rs        # LockRecord, UnlockRecord, LockerEvent, BurnProof
//! │   └── errors.rs          # ProofError, BalanceError, LockerError
//! ├── application/
//! │   └── locker.rs          # TokenLocker
//! ├── ports/
//! │   └── outbound.rs        # BalanceService, CkbSpvSource
//! ├── adapters/
//! │   └── memory_ledger.rs   # InMemoryBalanceLedger
//! └── config.rs              # LockerConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-exports
pub use adapters::InMemoryBalanceLedger;
pub use application::{LockerState, TokenLocker};
pub use config::LockerConfig;
pub use domain::{
    BalanceError, BurnProof, CallContext, LockRecord, LockRequest, LockerError, LockerEvent,
    ProofError, RecipientTypescript, UnlockRecord,
};
pub use ports::{BalanceService, CkbSpvSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
