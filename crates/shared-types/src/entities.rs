//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Source chain**: `Hash`, `BlockNumber`, `TinyHeader`
//! - **Target ledger**: `Address`, `U256`, `NATIVE_TOKEN`

use serde::{Deserialize, Serialize};

// Re-export U256 from primitive-types for use across all components
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: SOURCE CHAIN
// =============================================================================

/// A 32-byte hash (CKB Blake2b content hash or Keccak-256 digest).
pub type Hash = [u8; 32];

/// The all-zero hash, used as the root of an empty Merkle tree.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Source-chain block number.
pub type BlockNumber = u64;

/// Serialized size of a [`TinyHeader`] molecule struct.
pub const TINY_HEADER_SIZE: usize = 72;

/// Compact per-block leaf committed by an aggregated history root.
///
/// Molecule layout: `number: u64 LE ‖ block_hash: Byte32 ‖ tx_root: Byte32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TinyHeader {
    /// Block number.
    pub number: BlockNumber,
    /// Header hash of the block.
    pub block_hash: Hash,
    /// The block's `transactions_root`.
    pub tx_root: Hash,
}

impl TinyHeader {
    /// Create a new tiny header.
    pub fn new(number: BlockNumber, block_hash: Hash, tx_root: Hash) -> Self {
        Self {
            number,
            block_hash,
            tx_root,
        }
    }

    /// Serialize into the 72-byte molecule struct.
    pub fn to_bytes(&self) -> [u8; TINY_HEADER_SIZE] {
        let mut out = [0u8; TINY_HEADER_SIZE];
        out[..8].copy_from_slice(&self.number.to_le_bytes());
        out[8..40].copy_from_slice(&self.block_hash);
        out[40..].copy_from_slice(&self.tx_root);
        out
    }

    /// Parse from exactly 72 bytes. Returns `None` on any other length.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != TINY_HEADER_SIZE {
            return None;
        }
        let mut number = [0u8; 8];
        number.copy_from_slice(&bytes[..8]);
        let mut block_hash = [0u8; 32];
        block_hash.copy_from_slice(&bytes[8..40]);
        let mut tx_root = [0u8; 32];
        tx_root.copy_from_slice(&bytes[40..]);
        Some(Self {
            number: u64::from_le_bytes(number),
            block_hash,
            tx_root,
        })
    }
}

// =============================================================================
// CLUSTER B: TARGET LEDGER
// =============================================================================

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Token address denoting the ledger's native asset.
pub const NATIVE_TOKEN: Address = [0u8; 20];

/// Render a byte string as `0x`-prefixed lowercase hex, for log fields.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
