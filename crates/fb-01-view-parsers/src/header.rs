//! # Header Views
//!
//! CKB headers are fixed-size molecule structs:
//!
//! ```text
//! RawHeader (192 bytes)
//! ├── version           u32     [0..4]
//! ├── compact_target    u32     [4..8]
//! ├── timestamp         u64     [8..16]
//! ├── number            u64     [16..24]
//! ├── epoch             u64     [24..32]
//! ├── parent_hash       Byte32  [32..64]
//! ├── transactions_root Byte32  [64..96]
//! ├── proposals_hash    Byte32  [96..128]
//! ├── extra_hash        Byte32  [128..160]   (uncles hash)
//! └── dao               Byte32  [160..192]
//! Header (208 bytes) = RawHeader ‖ nonce u128 [192..208]
//! ```
//!
//! A header batch travels as a fixvec of 208-byte headers.

use crate::molecule::{pack_fixvec, FixVecView};
use crate::ViewError;
use shared_crypto::content_hash;
use shared_types::{BlockNumber, Hash};

/// Size of a raw header struct.
pub const RAW_HEADER_SIZE: usize = 192;
/// Size of a header struct.
pub const HEADER_SIZE: usize = 208;

fn le_u32(data: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[at..at + 4]);
    u32::from_le_bytes(buf)
}

fn le_u64(data: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[at..at + 8]);
    u64::from_le_bytes(buf)
}

fn byte32_at(data: &[u8], at: usize) -> Hash {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&data[at..at + 32]);
    buf
}

/// View over a 192-byte raw header.
#[derive(Clone, Copy, Debug)]
pub struct RawHeaderView<'a>(&'a [u8]);

impl<'a> RawHeaderView<'a> {
    /// Wrap exactly 192 bytes.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, ViewError> {
        if data.len() != RAW_HEADER_SIZE {
            return Err(ViewError::SizeMismatch {
                name: "RawHeader",
                declared: RAW_HEADER_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self(data))
    }

    /// Header version.
    pub fn version(&self) -> u32 {
        le_u32(self.0, 0)
    }

    /// Compact difficulty target.
    pub fn compact_target(&self) -> u32 {
        le_u32(self.0, 4)
    }

    /// Unix timestamp in milliseconds.
    pub fn timestamp(&self) -> u64 {
        le_u64(self.0, 8)
    }

    /// Block number.
    pub fn number(&self) -> BlockNumber {
        le_u64(self.0, 16)
    }

    /// Packed epoch (number, index, length).
    pub fn epoch(&self) -> u64 {
        le_u64(self.0, 24)
    }

    /// Parent header hash.
    pub fn parent_hash(&self) -> Hash {
        byte32_at(self.0, 32)
    }

    /// `merge(raw_transactions_root, witnesses_root)`.
    pub fn transactions_root(&self) -> Hash {
        byte32_at(self.0, 64)
    }

    /// Proposals hash.
    pub fn proposals_hash(&self) -> Hash {
        byte32_at(self.0, 96)
    }

    /// Extra hash (uncles hash).
    pub fn extra_hash(&self) -> Hash {
        byte32_at(self.0, 128)
    }

    /// DAO field.
    pub fn dao(&self) -> Hash {
        byte32_at(self.0, 160)
    }

    /// Underlying bytes.
    pub fn as_slice(&self) -> &'a [u8] {
        self.0
    }
}

/// View over a 208-byte header.
#[derive(Clone, Copy, Debug)]
pub struct HeaderView<'a>(&'a [u8]);

impl<'a> HeaderView<'a> {
    /// Wrap exactly 208 bytes.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, ViewError> {
        if data.len() != HEADER_SIZE {
            return Err(ViewError::SizeMismatch {
                name: "Header",
                declared: HEADER_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self(data))
    }

    /// The raw header part.
    pub fn raw(&self) -> RawHeaderView<'a> {
        RawHeaderView(&self.0[..RAW_HEADER_SIZE])
    }

    /// PoW nonce.
    pub fn nonce(&self) -> u128 {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&self.0[RAW_HEADER_SIZE..]);
        u128::from_le_bytes(buf)
    }

    /// Header hash: content hash of the full 208 bytes.
    pub fn calc_hash(&self) -> Hash {
        content_hash(self.0)
    }

    /// Underlying bytes.
    pub fn as_slice(&self) -> &'a [u8] {
        self.0
    }
}

/// View over a fixvec of headers.
#[derive(Clone, Copy, Debug)]
pub struct HeaderVecView<'a>(FixVecView<'a>);

impl<'a> HeaderVecView<'a> {
    /// Validate a header fixvec.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, ViewError> {
        Ok(Self(FixVecView::parse("HeaderVec", data, HEADER_SIZE)?))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Header at `index`.
    pub fn get(&self, index: usize) -> Result<HeaderView<'a>, ViewError> {
        Ok(HeaderView(self.0.get(index)?))
    }

    /// Iterate over headers in order.
    pub fn iter(&self) -> impl Iterator<Item = HeaderView<'a>> + 'a {
        self.0.iter().map(HeaderView)
    }
}

// =============================================================================
// OWNED BUILDERS
// =============================================================================

/// Owned raw header, for building fixtures and relayer payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawHeader {
    /// Header version.
    pub version: u32,
    /// Compact difficulty target.
    pub compact_target: u32,
    /// Timestamp in milliseconds.
    pub timestamp: u64,
    /// Block number.
    pub number: BlockNumber,
    /// Packed epoch.
    pub epoch: u64,
    /// Parent header hash.
    pub parent_hash: Hash,
    /// Transactions root.
    pub transactions_root: Hash,
    /// Proposals hash.
    pub proposals_hash: Hash,
    /// Extra (uncles) hash.
    pub extra_hash: Hash,
    /// DAO field.
    pub dao: Hash,
}

impl RawHeader {
    /// Serialize to 192 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(RAW_HEADER_SIZE);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.compact_target.to_le_bytes());
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.number.to_le_bytes());
        out.extend_from_slice(&self.epoch.to_le_bytes());
        out.extend_from_slice(&self.parent_hash);
        out.extend_from_slice(&self.transactions_root);
        out.extend_from_slice(&self.proposals_hash);
        out.extend_from_slice(&self.extra_hash);
        out.extend_from_slice(&self.dao);
        out
    }
}

/// Owned header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// Raw header.
    pub raw: RawHeader,
    /// PoW nonce.
    pub nonce: u128,
}

impl Header {
    /// Serialize to 208 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.raw.to_bytes();
        out.extend_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Header hash.
    pub fn calc_hash(&self) -> Hash {
        content_hash(&self.to_bytes())
    }
}

/// Encode a header batch.
pub fn pack_header_vec(headers: &[Header]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = headers.iter().map(Header::to_bytes).collect();
    pack_fixvec(&encoded)
}
