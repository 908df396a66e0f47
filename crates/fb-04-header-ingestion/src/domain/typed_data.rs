//! # EIP-712 Typed Data
//!
//! Every governance action is signed as an EIP-712 struct under a
//! per-contract domain:
//!
//! ```text
//! digest = keccak256(0x19 ‖ 0x01 ‖ domainSeparator ‖ structHash)
//! ```
//!
//! Struct hashes use ABI encoding: every static field is one 32-byte word,
//! `bytes` and arrays are replaced by the keccak of their encoding.

use primitive_types::U256;
use shared_crypto::keccak256;
use shared_types::{Address, BlockNumber, Hash};

/// Domain type string.
pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Domain version committed in every separator.
pub const DOMAIN_VERSION: &str = "1";

/// Domain name of the header-ingestion contract.
pub const CKB_CHAIN_DOMAIN_NAME: &str = "Force Bridge CKBChain";

/// Domain name of the token locker.
pub const TOKEN_LOCKER_DOMAIN_NAME: &str = "Force Bridge TokenLocker";

/// `AddHeaders` type string.
pub const ADD_HEADERS_TYPE: &str = "AddHeaders(bytes data)";

/// `AddHistoryTxRoot` type string.
///
/// Unlike the other type strings this one keeps a space after each comma;
/// relayers sign against its hash `0eeee1be…0524ca10`.
pub const ADD_HISTORY_TX_ROOT_TYPE: &str =
    "AddHistoryTxRoot(uint64 startBlockNumber, uint64 endBlockNumber, bytes32 historyTxRoot)";

/// `SetValidators` type string.
pub const SET_VALIDATORS_TYPE: &str =
    "SetValidators(address[] validators,uint64 multisigThreshold,uint256 nonce)";

/// `SetNewCkbSpv` type string.
pub const SET_NEW_CKB_SPV_TYPE: &str = "SetNewCkbSpv(address newSpvAddress,uint256 nonce)";

/// ABI word for an unsigned integer.
pub fn word_u256(value: U256) -> Hash {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// ABI word for a `uint64` (or a nonce encoded as `uint256`).
pub fn word_u64(value: u64) -> Hash {
    word_u256(U256::from(value))
}

/// ABI word for an address (left-padded).
pub fn word_address(address: &Address) -> Hash {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address);
    word
}

fn hash_words(words: &[Hash]) -> Hash {
    keccak256(&words.concat())
}

/// `keccak256(abi.encode(DOMAIN_TYPEHASH, keccak(name), keccak("1"), chainId, verifyingContract))`.
pub fn domain_separator(name: &str, chain_id: u64, verifying_contract: &Address) -> Hash {
    hash_words(&[
        keccak256(EIP712_DOMAIN_TYPE.as_bytes()),
        keccak256(name.as_bytes()),
        keccak256(DOMAIN_VERSION.as_bytes()),
        word_u64(chain_id),
        word_address(verifying_contract),
    ])
}

/// Struct hash of `AddHeaders(bytes data)`; `data` is the encoded HeaderVec.
pub fn add_headers_hash(data: &[u8]) -> Hash {
    hash_words(&[keccak256(ADD_HEADERS_TYPE.as_bytes()), keccak256(data)])
}

/// Struct hash of `AddHistoryTxRoot`.
pub fn add_history_tx_root_hash(
    start_block_number: BlockNumber,
    end_block_number: BlockNumber,
    history_tx_root: &Hash,
) -> Hash {
    hash_words(&[
        keccak256(ADD_HISTORY_TX_ROOT_TYPE.as_bytes()),
        word_u64(start_block_number),
        word_u64(end_block_number),
        *history_tx_root,
    ])
}

/// Struct hash of `SetValidators`.
pub fn set_validators_hash(validators: &[Address], multisig_threshold: u64, nonce: u64) -> Hash {
    let members: Vec<Hash> = validators.iter().map(word_address).collect();
    hash_words(&[
        keccak256(SET_VALIDATORS_TYPE.as_bytes()),
        hash_words(&members),
        word_u64(multisig_threshold),
        word_u64(nonce),
    ])
}

/// Struct hash of `SetNewCkbSpv`.
pub fn set_new_ckb_spv_hash(new_spv_address: &Address, nonce: u64) -> Hash {
    hash_words(&[
        keccak256(SET_NEW_CKB_SPV_TYPE.as_bytes()),
        word_address(new_spv_address),
        word_u64(nonce),
    ])
}

/// Final digest signed by validators.
pub fn typed_data_digest(domain_separator: &Hash, struct_hash: &Hash) -> Hash {
    let mut preimage = Vec::with_capacity(2 + 64);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(domain_separator);
    preimage.extend_from_slice(struct_hash);
    keccak256(&preimage)
}
