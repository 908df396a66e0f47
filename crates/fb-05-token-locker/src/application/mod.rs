//! Application layer.

pub mod locker;

pub use locker::{LockerState, TokenLocker};
