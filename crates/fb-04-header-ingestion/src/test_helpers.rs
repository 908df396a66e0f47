//! Validator keys and signature blobs.

use k256::ecdsa::SigningKey;
use shared_crypto::test_helpers::{generate_keypair, sign};
use shared_types::Hash;

use crate::domain::ValidatorSet;

/// `count` fresh validator keys and their set with `threshold`.
pub fn validator_keys(count: usize, threshold: u64) -> (Vec<SigningKey>, ValidatorSet) {
    let (keys, addresses): (Vec<_>, Vec<_>) = (0..count).map(|_| generate_keypair()).unzip();
    let set = ValidatorSet::new(addresses, threshold).expect("fixture validator set");
    (keys, set)
}

/// Concatenated `r ‖ s ‖ v` records of `keys` over `digest`.
pub fn sign_blob(digest: &Hash, keys: &[SigningKey]) -> Vec<u8> {
    keys.iter()
        .flat_map(|key| sign(digest, key).to_bytes())
        .collect()
}
