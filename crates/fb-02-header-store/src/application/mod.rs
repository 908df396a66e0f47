//! # Application Module
//!
//! The header store service.

pub mod store;

pub use store::HeaderStore;
