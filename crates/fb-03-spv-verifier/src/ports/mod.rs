//! # Ports Module
//!
//! Inbound API of the verifier. It has no outbound dependencies beyond the
//! borrowed header store.

pub mod inbound;

pub use inbound::*;
