//! # Domain Module
//!
//! Core domain types for the header store.

pub mod entities;
pub mod errors;
pub mod invariants;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
