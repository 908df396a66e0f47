//! # Domain Layer

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::{BalanceError, LockerError, ProofError};
