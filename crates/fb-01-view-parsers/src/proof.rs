//! # SPV Proof Views
//!
//! ```text
//! CKBTxProof (table)              direct inclusion proof
//! ├── tx_merkle_index   Uint16
//! ├── block_number      Uint64
//! ├── block_hash        Byte32
//! ├── tx_hash           Byte32
//! ├── witnesses_root    Byte32
//! └── lemmas            Byte32Vec
//!
//! CKBHistoryTxProof (table)       inclusion proof carrying the raw tx
//! ├── block_number      Uint64
//! ├── tx_merkle_index   Uint16
//! ├── witnesses_root    Byte32
//! ├── lemmas            Byte32Vec
//! └── raw_transaction   Bytes
//!
//! CKBHistoryTxRootProof (table)   multi-leaf proof against a history root
//! ├── init_block_number   Uint64
//! ├── latest_block_number Uint64
//! ├── indices             Uint64Vec
//! ├── proof_leaves        TinyHeaderVec (fixvec, 72-byte items)
//! └── lemmas              Byte32Vec
//!
//! CKBUnlockTokenParam (table)
//! ├── history_tx_root_proof CKBHistoryTxRootProof
//! └── tx_proofs             CKBHistoryTxProofVec (dynvec)
//! ```

use crate::molecule::{
    pack_bytes, pack_fixvec, pack_table, read_byte32, read_byte32_vec, read_bytes, read_u16,
    read_u64, read_u64_vec, FixVecView, TableView,
};
use crate::transaction::RawTransactionView;
use crate::ViewError;
use shared_types::{BlockNumber, Hash, TinyHeader, TINY_HEADER_SIZE};

// =============================================================================
// DIRECT PROOF
// =============================================================================

/// View over a direct `CKBTxProof`.
#[derive(Clone, Debug)]
pub struct CkbTxProofView {
    tx_merkle_index: u16,
    block_number: BlockNumber,
    block_hash: Hash,
    tx_hash: Hash,
    witnesses_root: Hash,
    lemmas: Vec<Hash>,
}

impl CkbTxProofView {
    /// Decode a `CKBTxProof` table.
    pub fn from_slice(data: &[u8]) -> Result<Self, ViewError> {
        let table = TableView::parse("CKBTxProof", data, 6)?;
        Ok(Self {
            tx_merkle_index: read_u16("tx_merkle_index", table.field(0)?)?,
            block_number: read_u64("block_number", table.field(1)?)?,
            block_hash: read_byte32("block_hash", table.field(2)?)?,
            tx_hash: read_byte32("tx_hash", table.field(3)?)?,
            witnesses_root: read_byte32("witnesses_root", table.field(4)?)?,
            lemmas: read_byte32_vec("lemmas", table.field(5)?)?,
        })
    }

    /// Node index of the transaction in its block's CBMT.
    pub fn tx_merkle_index(&self) -> u16 {
        self.tx_merkle_index
    }

    /// Block number.
    pub fn block_number(&self) -> BlockNumber {
        self.block_number
    }

    /// Block hash.
    pub fn block_hash(&self) -> Hash {
        self.block_hash
    }

    /// Transaction hash.
    pub fn tx_hash(&self) -> Hash {
        self.tx_hash
    }

    /// Witnesses root of the block.
    pub fn witnesses_root(&self) -> Hash {
        self.witnesses_root
    }

    /// Sibling hashes, bottom-up.
    pub fn lemmas(&self) -> &[Hash] {
        &self.lemmas
    }
}

/// Owned `CKBTxProof`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CkbTxProof {
    /// Node index of the transaction.
    pub tx_merkle_index: u16,
    /// Block number.
    pub block_number: BlockNumber,
    /// Block hash.
    pub block_hash: Hash,
    /// Transaction hash.
    pub tx_hash: Hash,
    /// Witnesses root.
    pub witnesses_root: Hash,
    /// Sibling hashes.
    pub lemmas: Vec<Hash>,
}

impl CkbTxProof {
    /// Serialize to a table.
    pub fn to_bytes(&self) -> Vec<u8> {
        pack_table(&[
            self.tx_merkle_index.to_le_bytes().to_vec(),
            self.block_number.to_le_bytes().to_vec(),
            self.block_hash.to_vec(),
            self.tx_hash.to_vec(),
            self.witnesses_root.to_vec(),
            pack_fixvec(&self.lemmas),
        ])
    }
}

// =============================================================================
// HISTORY TX PROOF
// =============================================================================

/// View over a `CKBHistoryTxProof`.
#[derive(Clone, Debug)]
pub struct CkbHistoryTxProofView<'a> {
    block_number: BlockNumber,
    tx_merkle_index: u16,
    witnesses_root: Hash,
    lemmas: Vec<Hash>,
    raw_transaction: &'a [u8],
}

impl<'a> CkbHistoryTxProofView<'a> {
    /// Decode a `CKBHistoryTxProof` table.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, ViewError> {
        let table = TableView::parse("CKBHistoryTxProof", data, 5)?;
        Ok(Self {
            block_number: read_u64("block_number", table.field(0)?)?,
            tx_merkle_index: read_u16("tx_merkle_index", table.field(1)?)?,
            witnesses_root: read_byte32("witnesses_root", table.field(2)?)?,
            lemmas: read_byte32_vec("lemmas", table.field(3)?)?,
            raw_transaction: read_bytes("raw_transaction", table.field(4)?)?,
        })
    }

    /// Block number.
    pub fn block_number(&self) -> BlockNumber {
        self.block_number
    }

    /// Node index of the transaction.
    pub fn tx_merkle_index(&self) -> u16 {
        self.tx_merkle_index
    }

    /// Witnesses root of the block.
    pub fn witnesses_root(&self) -> Hash {
        self.witnesses_root
    }

    /// Sibling hashes, bottom-up.
    pub fn lemmas(&self) -> &[Hash] {
        &self.lemmas
    }

    /// Embedded raw transaction bytes.
    pub fn raw_transaction_bytes(&self) -> &'a [u8] {
        self.raw_transaction
    }

    /// Embedded raw transaction, decoded.
    pub fn raw_transaction(&self) -> Result<RawTransactionView<'a>, ViewError> {
        RawTransactionView::from_slice(self.raw_transaction)
    }
}

/// Owned `CKBHistoryTxProof`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CkbHistoryTxProof {
    /// Block number.
    pub block_number: BlockNumber,
    /// Node index of the transaction.
    pub tx_merkle_index: u16,
    /// Witnesses root.
    pub witnesses_root: Hash,
    /// Sibling hashes.
    pub lemmas: Vec<Hash>,
    /// Encoded raw transaction.
    pub raw_transaction: Vec<u8>,
}

impl CkbHistoryTxProof {
    /// Serialize to a table.
    pub fn to_bytes(&self) -> Vec<u8> {
        pack_table(&[
            self.block_number.to_le_bytes().to_vec(),
            self.tx_merkle_index.to_le_bytes().to_vec(),
            self.witnesses_root.to_vec(),
            pack_fixvec(&self.lemmas),
            pack_bytes(&self.raw_transaction),
        ])
    }
}

// =============================================================================
// HISTORY TX ROOT PROOF
// =============================================================================

/// View over a `CKBHistoryTxRootProof`.
#[derive(Clone, Debug)]
pub struct CkbHistoryTxRootProofView {
    init_block_number: BlockNumber,
    latest_block_number: BlockNumber,
    indices: Vec<u64>,
    proof_leaves: Vec<TinyHeader>,
    lemmas: Vec<Hash>,
}

impl CkbHistoryTxRootProofView {
    /// Decode a `CKBHistoryTxRootProof` table.
    pub fn from_slice(data: &[u8]) -> Result<Self, ViewError> {
        let table = TableView::parse("CKBHistoryTxRootProof", data, 5)?;
        let leaves = FixVecView::parse("TinyHeaderVec", table.field(3)?, TINY_HEADER_SIZE)?;
        let proof_leaves = leaves
            .iter()
            .map(|item| {
                TinyHeader::from_slice(item).ok_or(ViewError::SizeMismatch {
                    name: "TinyHeader",
                    declared: TINY_HEADER_SIZE,
                    actual: item.len(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            init_block_number: read_u64("init_block_number", table.field(0)?)?,
            latest_block_number: read_u64("latest_block_number", table.field(1)?)?,
            indices: read_u64_vec("indices", table.field(2)?)?,
            proof_leaves,
            lemmas: read_byte32_vec("lemmas", table.field(4)?)?,
        })
    }

    /// First block covered by the history root.
    pub fn init_block_number(&self) -> BlockNumber {
        self.init_block_number
    }

    /// Last block covered by the history root.
    pub fn latest_block_number(&self) -> BlockNumber {
        self.latest_block_number
    }

    /// CBMT node indices of the proven leaves.
    pub fn indices(&self) -> &[u64] {
        &self.indices
    }

    /// Proven tiny headers.
    pub fn proof_leaves(&self) -> &[TinyHeader] {
        &self.proof_leaves
    }

    /// Multi-proof lemmas.
    pub fn lemmas(&self) -> &[Hash] {
        &self.lemmas
    }
}

/// Owned `CKBHistoryTxRootProof`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CkbHistoryTxRootProof {
    /// First block covered.
    pub init_block_number: BlockNumber,
    /// Last block covered.
    pub latest_block_number: BlockNumber,
    /// CBMT node indices of the proven leaves.
    pub indices: Vec<u64>,
    /// Proven tiny headers.
    pub proof_leaves: Vec<TinyHeader>,
    /// Multi-proof lemmas.
    pub lemmas: Vec<Hash>,
}

impl CkbHistoryTxRootProof {
    /// Serialize to a table.
    pub fn to_bytes(&self) -> Vec<u8> {
        let indices: Vec<[u8; 8]> = self.indices.iter().map(|i| i.to_le_bytes()).collect();
        let leaves: Vec<[u8; TINY_HEADER_SIZE]> =
            self.proof_leaves.iter().map(TinyHeader::to_bytes).collect();
        pack_table(&[
            self.init_block_number.to_le_bytes().to_vec(),
            self.latest_block_number.to_le_bytes().to_vec(),
            pack_fixvec(&indices),
            pack_fixvec(&leaves),
            pack_fixvec(&self.lemmas),
        ])
    }
}

// =============================================================================
// UNLOCK PARAM
// =============================================================================

/// View over a `CKBUnlockTokenParam`.
#[derive(Clone, Debug)]
pub struct CkbUnlockTokenParamView<'a> {
    history_tx_root_proof: CkbHistoryTxRootProofView,
    tx_proofs: TableView<'a>,
}

impl<'a> CkbUnlockTokenParamView<'a> {
    /// Decode a `CKBUnlockTokenParam` table.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, ViewError> {
        let table = TableView::parse("CKBUnlockTokenParam", data, 2)?;
        Ok(Self {
            history_tx_root_proof: CkbHistoryTxRootProofView::from_slice(table.field(0)?)?,
            tx_proofs: TableView::parse("CKBHistoryTxProofVec", table.field(1)?, 0)?,
        })
    }

    /// Aggregated root proof shared by all transaction proofs.
    pub fn history_tx_root_proof(&self) -> &CkbHistoryTxRootProofView {
        &self.history_tx_root_proof
    }

    /// Number of transaction proofs.
    pub fn tx_proofs_len(&self) -> usize {
        self.tx_proofs.len()
    }

    /// Transaction proof at `index`.
    pub fn tx_proof(&self, index: usize) -> Result<CkbHistoryTxProofView<'a>, ViewError> {
        CkbHistoryTxProofView::from_slice(self.tx_proofs.field(index)?)
    }
}

/// Owned `CKBUnlockTokenParam`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CkbUnlockTokenParam {
    /// Aggregated root proof.
    pub history_tx_root_proof: CkbHistoryTxRootProof,
    /// Transaction proofs.
    pub tx_proofs: Vec<CkbHistoryTxProof>,
}

impl CkbUnlockTokenParam {
    /// Serialize to a table.
    pub fn to_bytes(&self) -> Vec<u8> {
        let proofs: Vec<Vec<u8>> = self.tx_proofs.iter().map(CkbHistoryTxProof::to_bytes).collect();
        pack_table(&[self.history_tx_root_proof.to_bytes(), pack_table(&proofs)])
    }
}
