//! # Algorithms Module
//!
//! Signature-set verification.

pub mod multisig;

pub use multisig::{parse_signatures, verify_signatures};
