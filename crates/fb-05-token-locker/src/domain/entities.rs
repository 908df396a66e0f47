//! # Locker Entities

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use shared_types::{Address, BlockNumber, Hash};

/// Caller and attached native value of an entry-point call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Message sender.
    pub caller: Address,
    /// Native value sent with the call.
    pub value: U256,
}

impl CallContext {
    /// Call without attached value.
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::zero(),
        }
    }

    /// Call with attached native value.
    pub fn with_value(caller: Address, value: U256) -> Self {
        Self { caller, value }
    }
}

/// Arguments of a `lock` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRequest {
    /// Asset to lock (`NATIVE_TOKEN` for the native asset).
    pub token: Address,
    /// Gross amount.
    pub amount: U256,
    /// Fee for the bridge relayer, taken out of `amount` on the source chain.
    pub bridge_fee: U256,
    /// Recipient lock script on CKB (molecule Script).
    pub recipient_lockscript: Vec<u8>,
    /// Outpoint consumed on CKB so the mint happens once.
    pub replay_resist_outpoint: Vec<u8>,
    /// Opaque data for the minted sUDT cell.
    pub sudt_extra_data: Vec<u8>,
}

/// Append-only record of an accepted lock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Sequential id.
    pub id: u64,
    /// Locking account.
    pub sender: Address,
    /// Asset.
    pub token: Address,
    /// Gross amount.
    pub amount: U256,
    /// Bridge fee.
    pub bridge_fee: U256,
    /// Recipient lock script on CKB.
    pub recipient_lockscript: Vec<u8>,
    /// Replay-resist outpoint on CKB.
    pub replay_resist_outpoint: Vec<u8>,
    /// Opaque sUDT data.
    pub sudt_extra_data: Vec<u8>,
}

/// Outcome of one accepted burn proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRecord {
    /// Burn transaction hash (now permanently used).
    pub burn_tx_hash: Hash,
    /// Block that includes the burn.
    pub block_number: BlockNumber,
    /// Asset released.
    pub token: Address,
    /// Recipient.
    pub recipient: Address,
    /// Amount received by the recipient (`bridgeAmount - bridgeFee`).
    pub received_amount: U256,
    /// Fee paid to `fee_receiver`.
    pub bridge_fee: U256,
    /// Account credited with the fee.
    pub fee_receiver: Address,
}

/// Events emitted by the locker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockerEvent {
    /// A lock was accepted.
    Locked(LockRecord),
    /// A burn proof was honoured.
    Unlocked(UnlockRecord),
}

/// One burn proof submitted to `unlock`.
///
/// `history_root_proof` is needed only once the block's header content has
/// been summarized away.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BurnProof {
    /// Encoded `CkbHistoryTxProof`.
    pub tx_proof: Vec<u8>,
    /// Encoded `CkbHistoryTxRootProof` covering the tx's block.
    pub history_root_proof: Option<Vec<u8>>,
}

impl BurnProof {
    /// Proof for a block whose header is still retained.
    pub fn direct(tx_proof: Vec<u8>) -> Self {
        Self {
            tx_proof,
            history_root_proof: None,
        }
    }

    /// Proof through a history root.
    pub fn aggregated(tx_proof: Vec<u8>, history_root_proof: Vec<u8>) -> Self {
        Self {
            tx_proof,
            history_root_proof: Some(history_root_proof),
        }
    }
}

/// Type script a burn's recipient cell must carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientTypescript {
    /// Code hash.
    pub code_hash: Hash,
    /// Hash type.
    pub hash_type: u8,
}
