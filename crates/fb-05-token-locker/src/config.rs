//! # Locker Configuration

use fb_04_header_ingestion::{IngestionError, ValidatorSet, TOKEN_LOCKER_DOMAIN_NAME};
use serde::{Deserialize, Serialize};
use shared_types::Address;

use crate::domain::{LockerError, RecipientTypescript};

/// Token locker configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerConfig {
    /// EIP-712 domain name.
    pub domain_name: String,

    /// Chain id of the verifying ledger.
    pub chain_id: u64,

    /// Address of the locker; burns must name it as `lockContractAddress`.
    pub contract_address: Address,

    /// Type script of the recipient cell in burn transactions.
    pub recipient_typescript: RecipientTypescript,

    /// Receiver of bridge fees. `None` pays the unlock caller.
    pub fee_sink: Option<Address>,

    /// Initial validators.
    pub validators: Vec<Address>,

    /// Initial multisig threshold.
    pub multisig_threshold: u64,

    /// Initially trusted SPV source.
    pub ckb_spv: Address,
}

impl Default for LockerConfig {
    fn default() -> Self {
        Self {
            domain_name: TOKEN_LOCKER_DOMAIN_NAME.to_string(),
            chain_id: 1,
            contract_address: [0u8; 20],
            recipient_typescript: RecipientTypescript::default(),
            fee_sink: None,
            validators: Vec::new(),
            multisig_threshold: 1,
            ckb_spv: [0u8; 20],
        }
    }
}

impl LockerConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            chain_id: 31337,
            contract_address: [0x10; 20],
            recipient_typescript: RecipientTypescript {
                code_hash: [0x5C; 32],
                hash_type: 0,
            },
            ckb_spv: [0xC4; 20],
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
    pub fn validate(&self) -> Result<ValidatorSet, LockerError> {
        if self.domain_name.is_empty() {
            return Err(LockerError::InvalidConfig("empty domain name".into()));
        }
        if self.contract_address == [0u8; 20] {
            return Err(LockerError::InvalidConfig("zero contract address".into()));
        }
        ValidatorSet::new(self.validators.clone(), self.multisig_threshold)
            .map_err(|e| IngestionError::from(e).into())
    }
}
