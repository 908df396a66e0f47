//! # Ingestion Configuration
//!
//! EIP-712 domain and initial validator set of the header-ingestion service.

use fb_02_header_store::HeaderStoreConfig;
use serde::{Deserialize, Serialize};
use shared_types::Address;

use crate::domain::{IngestionError, ValidatorSet, CKB_CHAIN_DOMAIN_NAME};

/// Header ingestion configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// EIP-712 domain name.
    pub domain_name: String,

    /// Chain id of the verifying ledger.
    pub chain_id: u64,

    /// Address of this service on the verifying ledger.
    pub verifying_contract: Address,

    /// Initial validators.
    pub validators: Vec<Address>,

    /// Initial multisig threshold.
    pub multisig_threshold: u64,

    /// Header store options.
    pub store: HeaderStoreConfig,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            domain_name: CKB_CHAIN_DOMAIN_NAME.to_string(),
            chain_id: 1,
            verifying_contract: [0u8; 20],
            validators: Vec::new(),
            multisig_threshold: 1,
            store: HeaderStoreConfig::default(),
        }
    }
}

impl IngestionConfig {
    /// Create a config for testing (PoW check off).
    pub fn for_testing() -> Self {
        Self {
            chain_id: 31337,
            verifying_contract: [0xC4; 20],
            store: HeaderStoreConfig::for_testing(),
            ..Self::default()
        }
    }

    /// Set the initial validator set.
    pub fn with_validators(mut self, validators: Vec<Address>, multisig_threshold: u64) -> Self {
        self.validators = validators;
        self.multisig_threshold = multisig_threshold;
        self
    }

    /// Validate and build the initial validator set.
    pub fn validate(&self) -> Result<ValidatorSet, IngestionError> {
        if self.domain_name.is_empty() {
            return Err(IngestionError::InvalidConfig("empty domain name".into()));
        }
        Ok(ValidatorSet::new(
            self.validators.clone(),
            self.multisig_threshold,
        )?)
    }
}
