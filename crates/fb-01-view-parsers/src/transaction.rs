//! # Transaction Views
//!
//! ```text
//! RawTransaction (table)
//! ├── version       Uint32
//! ├── cell_deps     CellDepVec    (fixvec, 37-byte items)
//! ├── header_deps   Byte32Vec
//! ├── inputs        CellInputVec  (fixvec, 44-byte items)
//! ├── outputs       CellOutputVec (dynvec)
//! └── outputs_data  BytesVec      (dynvec)
//!
//! CellOutput (table): capacity Uint64, lock Script, type ScriptOpt
//! Script (table):     code_hash Byte32, hash_type byte, args Bytes
//! CellInput (struct): since Uint64, previous_output OutPoint
//! OutPoint (struct):  tx_hash Byte32, index Uint32
//! ```
//!
//! A transaction's hash is the content hash of its raw-transaction bytes.

use crate::molecule::{
    pack_bytes, pack_fixvec, pack_table, read_address, read_byte, read_byte32, read_bytes,
    read_u128, read_u32, read_u64, FixVecView, TableView,
};
use crate::ViewError;
use shared_crypto::content_hash;
use shared_types::{Address, Hash};

/// Size of an OutPoint struct.
pub const OUT_POINT_SIZE: usize = 36;
/// Size of a CellInput struct.
pub const CELL_INPUT_SIZE: usize = 44;
/// Size of a CellDep struct.
pub const CELL_DEP_SIZE: usize = 37;

// =============================================================================
// STRUCTS
// =============================================================================

/// Decoded OutPoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutPoint {
    /// Transaction hash.
    pub tx_hash: Hash,
    /// Output index.
    pub index: u32,
}

impl OutPoint {
    /// Decode a 36-byte OutPoint.
    pub fn from_slice(data: &[u8]) -> Result<Self, ViewError> {
        if data.len() != OUT_POINT_SIZE {
            return Err(ViewError::SizeMismatch {
                name: "OutPoint",
                declared: OUT_POINT_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self {
            tx_hash: read_byte32("OutPoint.tx_hash", &data[..32])?,
            index: read_u32("OutPoint.index", &data[32..])?,
        })
    }

    /// Serialize to 36 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.tx_hash.to_vec();
        out.extend_from_slice(&self.index.to_le_bytes());
        out
    }
}

/// Decoded CellInput.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellInput {
    /// Since constraint.
    pub since: u64,
    /// Spent cell.
    pub previous_output: OutPoint,
}

impl CellInput {
    /// Decode a 44-byte CellInput.
    pub fn from_slice(data: &[u8]) -> Result<Self, ViewError> {
        if data.len() != CELL_INPUT_SIZE {
            return Err(ViewError::SizeMismatch {
                name: "CellInput",
                declared: CELL_INPUT_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self {
            since: read_u64("CellInput.since", &data[..8])?,
            previous_output: OutPoint::from_slice(&data[8..])?,
        })
    }

    /// Serialize to 44 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.since.to_le_bytes().to_vec();
        out.extend_from_slice(&self.previous_output.to_bytes());
        out
    }
}

// =============================================================================
// SCRIPT
// =============================================================================

/// View over a Script table.
#[derive(Clone, Copy, Debug)]
pub struct ScriptView<'a> {
    code_hash: Hash,
    hash_type: u8,
    args: &'a [u8],
    raw: &'a [u8],
}

impl<'a> ScriptView<'a> {
    /// Validate a Script table.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, ViewError> {
        let table = TableView::parse("Script", data, 3)?;
        Ok(Self {
            code_hash: read_byte32("Script.code_hash", table.field(0)?)?,
            hash_type: read_byte("Script.hash_type", table.field(1)?)?,
            args: read_bytes("Script.args", table.field(2)?)?,
            raw: data,
        })
    }

    /// Code hash.
    pub fn code_hash(&self) -> Hash {
        self.code_hash
    }

    /// Hash type (0 = data, 1 = type, 2 = data1).
    pub fn hash_type(&self) -> u8 {
        self.hash_type
    }

    /// Script args.
    pub fn args(&self) -> &'a [u8] {
        self.args
    }

    /// Script hash.
    pub fn calc_hash(&self) -> Hash {
        content_hash(self.raw)
    }

    /// Underlying bytes.
    pub fn as_slice(&self) -> &'a [u8] {
        self.raw
    }
}

/// Owned Script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    /// Code hash.
    pub code_hash: Hash,
    /// Hash type.
    pub hash_type: u8,
    /// Args.
    pub args: Vec<u8>,
}

impl Script {
    /// Serialize to a Script table.
    pub fn to_bytes(&self) -> Vec<u8> {
        pack_table(&[
            self.code_hash.to_vec(),
            vec![self.hash_type],
            pack_bytes(&self.args),
        ])
    }
}

// =============================================================================
// CELL OUTPUT
// =============================================================================

/// View over a CellOutput table.
#[derive(Clone, Copy, Debug)]
pub struct CellOutputView<'a> {
    capacity: u64,
    lock: ScriptView<'a>,
    type_: Option<ScriptView<'a>>,
}

impl<'a> CellOutputView<'a> {
    /// Validate a CellOutput table.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, ViewError> {
        let table = TableView::parse("CellOutput", data, 3)?;
        let type_field = table.field(2)?;
        Ok(Self {
            capacity: read_u64("CellOutput.capacity", table.field(0)?)?,
            lock: ScriptView::from_slice(table.field(1)?)?,
            type_: if type_field.is_empty() {
                None
            } else {
                Some(ScriptView::from_slice(type_field)?)
            },
        })
    }

    /// Capacity in shannons.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Lock script.
    pub fn lock(&self) -> ScriptView<'a> {
        self.lock
    }

    /// Optional type script.
    pub fn type_script(&self) -> Option<ScriptView<'a>> {
        self.type_
    }
}

/// Owned CellOutput.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellOutput {
    /// Capacity.
    pub capacity: u64,
    /// Lock script.
    pub lock: Script,
    /// Optional type script.
    pub type_: Option<Script>,
}

impl CellOutput {
    /// Serialize to a CellOutput table.
    pub fn to_bytes(&self) -> Vec<u8> {
        pack_table(&[
            self.capacity.to_le_bytes().to_vec(),
            self.lock.to_bytes(),
            self.type_.as_ref().map(Script::to_bytes).unwrap_or_default(),
        ])
    }
}

// =============================================================================
// RAW TRANSACTION
// =============================================================================

/// View over a RawTransaction table.
#[derive(Clone, Copy, Debug)]
pub struct RawTransactionView<'a> {
    version: u32,
    cell_deps: FixVecView<'a>,
    header_deps: FixVecView<'a>,
    inputs: FixVecView<'a>,
    outputs: TableView<'a>,
    outputs_data: TableView<'a>,
    raw: &'a [u8],
}

impl<'a> RawTransactionView<'a> {
    /// Validate a RawTransaction table.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, ViewError> {
        let table = TableView::parse("RawTransaction", data, 6)?;
        Ok(Self {
            version: read_u32("RawTransaction.version", table.field(0)?)?,
            cell_deps: FixVecView::parse("CellDepVec", table.field(1)?, CELL_DEP_SIZE)?,
            header_deps: FixVecView::parse("Byte32Vec", table.field(2)?, 32)?,
            inputs: FixVecView::parse("CellInputVec", table.field(3)?, CELL_INPUT_SIZE)?,
            outputs: TableView::parse("CellOutputVec", table.field(4)?, 0)?,
            outputs_data: TableView::parse("BytesVec", table.field(5)?, 0)?,
            raw: data,
        })
    }

    /// Transaction version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Number of cell deps.
    pub fn cell_deps_len(&self) -> usize {
        self.cell_deps.len()
    }

    /// Number of header deps.
    pub fn header_deps_len(&self) -> usize {
        self.header_deps.len()
    }

    /// Number of inputs.
    pub fn inputs_len(&self) -> usize {
        self.inputs.len()
    }

    /// Input at `index`.
    pub fn input(&self, index: usize) -> Result<CellInput, ViewError> {
        CellInput::from_slice(self.inputs.get(index)?)
    }

    /// Number of outputs.
    pub fn outputs_len(&self) -> usize {
        self.outputs.len()
    }

    /// Output at `index`.
    pub fn output(&self, index: usize) -> Result<CellOutputView<'a>, ViewError> {
        CellOutputView::from_slice(self.outputs.field(index)?)
    }

    /// Output data at `index`.
    pub fn output_data(&self, index: usize) -> Result<&'a [u8], ViewError> {
        read_bytes("Bytes", self.outputs_data.field(index)?)
    }

    /// Transaction hash.
    pub fn calc_tx_hash(&self) -> Hash {
        content_hash(self.raw)
    }

    /// Underlying bytes.
    pub fn as_slice(&self) -> &'a [u8] {
        self.raw
    }
}

/// Owned RawTransaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTransaction {
    /// Version.
    pub version: u32,
    /// Encoded 37-byte cell deps.
    pub cell_deps: Vec<[u8; CELL_DEP_SIZE]>,
    /// Header deps.
    pub header_deps: Vec<Hash>,
    /// Inputs.
    pub inputs: Vec<CellInput>,
    /// Outputs.
    pub outputs: Vec<CellOutput>,
    /// Output data, parallel to `outputs`.
    pub outputs_data: Vec<Vec<u8>>,
}

impl RawTransaction {
    /// Serialize to a RawTransaction table.
    pub fn to_bytes(&self) -> Vec<u8> {
        let inputs: Vec<Vec<u8>> = self.inputs.iter().map(CellInput::to_bytes).collect();
        let outputs: Vec<Vec<u8>> = self.outputs.iter().map(CellOutput::to_bytes).collect();
        let outputs_data: Vec<Vec<u8>> = self.outputs_data.iter().map(|d| pack_bytes(d)).collect();
        pack_table(&[
            self.version.to_le_bytes().to_vec(),
            pack_fixvec(&self.cell_deps),
            pack_fixvec(&self.header_deps),
            pack_fixvec(&inputs),
            pack_table(&outputs),
            pack_table(&outputs_data),
        ])
    }

    /// Transaction hash.
    pub fn calc_tx_hash(&self) -> Hash {
        content_hash(&self.to_bytes())
    }
}

// =============================================================================
// RECIPIENT CELL DATA
// =============================================================================

/// Data carried by the burn transaction's recipient cell.
///
/// Table fields: recipient address, token address, lock contract address
/// (20 bytes each), bridge amount and bridge fee (`Uint128`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecipientCellData {
    /// Who receives the unlocked asset on the target ledger.
    pub recipient_address: Address,
    /// Asset to release (`NATIVE_TOKEN` for the native asset).
    pub token_address: Address,
    /// Locker contract the burn is addressed to.
    pub lock_contract_address: Address,
    /// Gross amount burned on the source chain.
    pub bridge_amount: u128,
    /// Fee taken out of `bridge_amount`.
    pub bridge_fee: u128,
}

impl RecipientCellData {
    /// Decode a recipient-cell data table.
    pub fn from_slice(data: &[u8]) -> Result<Self, ViewError> {
        let table = TableView::parse("RecipientCellData", data, 5)?;
        Ok(Self {
            recipient_address: read_address("recipient_address", table.field(0)?)?,
            token_address: read_address("token_address", table.field(1)?)?,
            lock_contract_address: read_address("lock_contract_address", table.field(2)?)?,
            bridge_amount: read_u128("bridge_amount", table.field(3)?)?,
            bridge_fee: read_u128("bridge_fee", table.field(4)?)?,
        })
    }

    /// Serialize to a table.
    pub fn to_bytes(&self) -> Vec<u8> {
        pack_table(&[
            self.recipient_address.to_vec(),
            self.token_address.to_vec(),
            self.lock_contract_address.to_vec(),
            self.bridge_amount.to_le_bytes().to_vec(),
            self.bridge_fee.to_le_bytes().to_vec(),
        ])
    }
}
