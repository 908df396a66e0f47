//! Cross-crate integration flows.

pub mod fixtures;

mod header_flows;
mod locker_flows;
mod spv_flows;
