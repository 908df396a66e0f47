//! # Content Hashing
//!
//! CKB's Blake2b-256 ("ckb-default-hash" personalization) for headers,
//! transactions and Merkle nodes, and Keccak-256 for the target ledger's
//! typed-data digests.

use blake2b_simd::{Params, State};
use sha3::{Digest, Keccak256};
use shared_types::Hash;

/// Blake2b personalization used by every CKB content hash.
pub const CKB_HASH_PERSONALIZATION: &[u8; 16] = b"ckb-default-hash";

/// Stateful CKB Blake2b-256 hasher.
pub struct CkbHasher {
    inner: State,
}

impl CkbHasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Params::new()
                .hash_length(32)
                .personal(CKB_HASH_PERSONALIZATION)
                .to_state(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(&self) -> Hash {
        let mut out = [0u8; 32];
        out.copy_from_slice(self.inner.finalize().as_bytes());
        out
    }
}

impl Default for CkbHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// CKB content hash (one-shot).
pub fn content_hash(data: &[u8]) -> Hash {
    let mut hasher = CkbHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Keccak-256.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}
