//! # Multisig Guard
//!
//! Domain separator, validator set and nonce book behind every governed
//! entry point. Shared by the header-ingestion service and the token locker.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash};
use tracing::{info, warn};

use crate::algorithms::verify_signatures;
use crate::domain::{
    set_validators_hash, typed_data_digest, IngestionError, NonceAction, NonceBook, ValidatorSet,
};

/// Signature and nonce gate for governed actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigGuard {
    domain_separator: Hash,
    validators: ValidatorSet,
    nonces: NonceBook,
}

impl MultisigGuard {
    /// Create a guard with fresh nonces.
    pub fn new(domain_separator: Hash, validators: ValidatorSet) -> Self {
        Self {
            domain_separator,
            validators,
            nonces: NonceBook::default(),
        }
    }

    /// EIP-712 domain separator.
    pub fn domain_separator(&self) -> Hash {
        self.domain_separator
    }

    /// Active validator set.
    pub fn validator_set(&self) -> &ValidatorSet {
        &self.validators
    }

    /// Expected nonce for `action`.
    pub fn current_nonce(&self, action: NonceAction) -> u64 {
        self.nonces.current(action)
    }

    /// Digest validators sign for `struct_hash`.
    pub fn digest(&self, struct_hash: &Hash) -> Hash {
        typed_data_digest(&self.domain_separator, struct_hash)
    }

    /// Require a qualifying signature set over `struct_hash`.
    pub fn authorize(
        &self,
        struct_hash: &Hash,
        signatures: &[u8],
    ) -> Result<Vec<Address>, IngestionError> {
        verify_signatures(&self.digest(struct_hash), signatures, &self.validators).map_err(|e| {
            warn!(error = %e, "[fb-04] Signature set rejected");
            e.into()
        })
    }

    /// Nonce check, then signature check, then consume the nonce.
    ///
    /// Nothing changes unless both checks pass.
    pub fn authorize_nonced(
        &mut self,
        action: NonceAction,
        nonce: u64,
        struct_hash: &Hash,
        signatures: &[u8],
    ) -> Result<(), IngestionError> {
        self.nonces.check(action, nonce).map_err(|e| {
            warn!(action = action.name(), error = %e, "[fb-04] Stale governance nonce");
            IngestionError::from(e)
        })?;
        self.authorize(struct_hash, signatures)?;

        let next = self.nonces.advance(action);
        info!(action = action.name(), nonce, next, "[fb-04] Governance nonce consumed");
        Ok(())
    }

    /// Replace the validator set under the current set's signatures.
    pub fn set_validators(
        &mut self,
        validators: Vec<Address>,
        multisig_threshold: u64,
        nonce: u64,
        signatures: &[u8],
    ) -> Result<(), IngestionError> {
        let struct_hash = set_validators_hash(&validators, multisig_threshold, nonce);
        let next_set = ValidatorSet::new(validators, multisig_threshold)?;
        self.authorize_nonced(NonceAction::SetValidators, nonce, &struct_hash, signatures)?;

        info!(
            validators = next_set.validators().len(),
            multisig_threshold,
            "[fb-04] Validator set rotated"
        );
        self.validators = next_set;
        Ok(())
    }
}
