//! # Algorithms Module
//!
//! Retention-tier classification.

pub mod gc;

pub use gc::{classify, finalized_below, summarizable_below};
