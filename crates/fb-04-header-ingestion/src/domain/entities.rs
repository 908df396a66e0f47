//! # Governance State
//!
//! Validator set and per-action nonce counters.

use std::collections::{BTreeMap, HashSet};

use fb_02_header_store::ChainError;
use serde::{Deserialize, Serialize};
use shared_types::{to_hex, Address};

/// M-of-N validator set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSet {
    validators: Vec<Address>,
    multisig_threshold: u64,
}

impl ValidatorSet {
    /// Build a set; `1 ≤ threshold ≤ len`, no duplicate members.
    pub fn new(validators: Vec<Address>, multisig_threshold: u64) -> Result<Self, ChainError> {
        if validators.is_empty() {
            return Err(ChainError::InvalidValidatorSet("empty validator set".into()));
        }
        if multisig_threshold == 0 || multisig_threshold > validators.len() as u64 {
            return Err(ChainError::InvalidValidatorSet(format!(
                "threshold {} out of range 1..={}",
                multisig_threshold,
                validators.len()
            )));
        }
        let mut seen = HashSet::with_capacity(validators.len());
        for validator in &validators {
            if !seen.insert(*validator) {
                return Err(ChainError::InvalidValidatorSet(format!(
                    "duplicate validator {}",
                    to_hex(validator)
                )));
            }
        }
        Ok(Self {
            validators,
            multisig_threshold,
        })
    }

    /// Members in configuration order.
    pub fn validators(&self) -> &[Address] {
        &self.validators
    }

    /// Required distinct signers.
    pub fn multisig_threshold(&self) -> u64 {
        self.multisig_threshold
    }

    /// True if `address` is a member.
    pub fn contains(&self, address: &Address) -> bool {
        self.validators.contains(address)
    }
}

/// Nonce-gated governance actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NonceAction {
    /// Validator set rotation.
    SetValidators,
    /// Trusted SPV source rotation.
    SetNewCkbSpv,
}

impl NonceAction {
    /// Name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            NonceAction::SetValidators => "setValidators",
            NonceAction::SetNewCkbSpv => "setNewCkbSpv",
        }
    }
}

/// Expected next nonce per action. Missing entries start at zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceBook {
    next: BTreeMap<NonceAction, u64>,
}

impl NonceBook {
    /// Expected nonce for `action`.
    pub fn current(&self, action: NonceAction) -> u64 {
        self.next.get(&action).copied().unwrap_or(0)
    }

    /// Fail unless `nonce` is the expected one.
    pub fn check(&self, action: NonceAction, nonce: u64) -> Result<(), ChainError> {
        let expected = self.current(action);
        if nonce != expected {
            return Err(ChainError::InvalidNonce {
                action: action.name(),
                expected,
                got: nonce,
            });
        }
        Ok(())
    }

    /// Consume the current nonce.
    pub fn advance(&mut self, action: NonceAction) -> u64 {
        let slot = self.next.entry(action).or_insert(0);
        *slot += 1;
        *slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_set_bounds() {
        let members = vec![[1u8; 20], [2u8; 20], [3u8; 20]];
        assert!(ValidatorSet::new(members.clone(), 2).is_ok());
        assert!(ValidatorSet::new(members.clone(), 3).is_ok());
        assert!(ValidatorSet::new(members.clone(), 0).is_err());
        assert!(ValidatorSet::new(members, 4).is_err());
        assert!(ValidatorSet::new(vec![], 1).is_err());
    }

    #[test]
    fn test_validator_set_rejects_duplicates() {
        let err = ValidatorSet::new(vec![[1u8; 20], [1u8; 20]], 1).unwrap_err();
        assert!(matches!(err, ChainError::InvalidValidatorSet(_)));
    }

    #[test]
    fn test_nonce_book() {
        let mut book = NonceBook::default();
        assert_eq!(book.current(NonceAction::SetValidators), 0);
        assert!(book.check(NonceAction::SetValidators, 0).is_ok());

        assert_eq!(book.advance(NonceAction::SetValidators), 1);
        assert_eq!(
            book.check(NonceAction::SetValidators, 0),
            Err(ChainError::InvalidNonce {
                action: "setValidators",
                expected: 1,
                got: 0,
            })
        );
        // Counters are independent.
        assert_eq!(book.current(NonceAction::SetNewCkbSpv), 0);
    }

    #[test]
    fn test_nonce_book_serde() {
        let mut book = NonceBook::default();
        book.advance(NonceAction::SetNewCkbSpv);
        let json = serde_json::to_string(&book).unwrap();
        let back: NonceBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
    }
}
