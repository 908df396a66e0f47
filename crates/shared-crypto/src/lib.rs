//! # Shared Crypto - Bridge Hash and Signature Primitives
//!
//! Pure, stateless functions that every verifier in the workspace depends on.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | Blake2b-256 (`ckb-default-hash`), Keccak-256 | Header/tx hashing, Merkle merge, typed data |
//! | `pow` | Eaglesong, compact target | Optional proof-of-work check on CKB headers |
//! | `ecdsa` | secp256k1 recovery | Validator signature verification |
//!
//! ## Determinism
//!
//! Every function here is a bit-for-bit reimplementation of the source
//! chain's (or the target ledger's) primitive; outputs never depend on
//! platform or call history.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod pow;

// Re-exports
pub use ecdsa::{address_from_pubkey, recover_signer, RecoverableSignature, SIGNATURE_SIZE};
pub use errors::CryptoError;
pub use hashing::{content_hash, keccak256, CkbHasher, CKB_HASH_PERSONALIZATION};
pub use pow::{compact_to_target, pow_hash, pow_message, verify_header_pow};

#[cfg(any(test, feature = "test-helpers"))]
pub use ecdsa::test_helpers;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
