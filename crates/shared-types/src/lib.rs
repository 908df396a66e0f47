//! # Shared Types Crate
//!
//! Value types used across the bridge verification core.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: hashes, addresses and block numbers are
//!   defined once here and re-exported by every component crate.
//! - **Plain data**: no behaviour beyond byte-level encoding lives here; hashing
//!   is the job of `shared-crypto`.

pub mod entities;

pub use entities::*;
