//! Application layer.

pub mod verifier;

pub use verifier::SpvVerifier;
