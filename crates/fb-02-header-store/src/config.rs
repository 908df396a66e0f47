//! # Header Store Configuration

use serde::{Deserialize, Serialize};

/// Header store configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderStoreConfig {
    /// Check Eaglesong PoW on every incoming header.
    ///
    /// The trust anchor is the validator multisig; this is an auxiliary
    /// check on top of it.
    pub verify_pow: bool,
}

impl Default for HeaderStoreConfig {
    fn default() -> Self {
        Self { verify_pow: true }
    }
}

impl HeaderStoreConfig {
    /// Create a config for testing (synthetic headers carry no real PoW).
    pub fn for_testing() -> Self {
        Self { verify_pow: false }
    }
}
