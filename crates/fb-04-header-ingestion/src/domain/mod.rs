//! # Domain Layer
//!
//! Governance state, typed-data hashing and error types.

pub mod entities;
pub mod errors;
pub mod typed_data;

pub use entities::{NonceAction, NonceBook, ValidatorSet};
pub use errors::{IngestionError, SignatureError};
pub use typed_data::*;
