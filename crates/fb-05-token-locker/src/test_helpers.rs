//! Burn-transaction and block fixtures.

use fb_01_view_parsers::{
    CellOutput, CkbHistoryTxProof, CkbHistoryTxRootProof, Header, RawTransaction,
    RecipientCellData, Script,
};
use fb_02_header_store::test_helpers::child_with_tx_root;
use fb_03_spv_verifier::{build_proof, build_root, transactions_root};
use shared_crypto::content_hash;
use shared_types::{Hash, TinyHeader};

use crate::domain::RecipientTypescript;

/// Witnesses root committed by every fixture block.
pub const WITNESSES_ROOT: Hash = [0x77; 32];

/// A burn transaction whose output 0 is the recipient cell.
///
/// `salt` makes otherwise identical burns hash differently.
pub fn burn_tx(
    typescript: &RecipientTypescript,
    data: &RecipientCellData,
    salt: u32,
) -> RawTransaction {
    RawTransaction {
        version: salt,
        outputs: vec![CellOutput {
            capacity: 200_0000_0000,
            lock: Script {
                code_hash: [0x11; 32],
                hash_type: 1,
                args: vec![0xAB; 20],
            },
            type_: Some(Script {
                code_hash: typescript.code_hash,
                hash_type: typescript.hash_type,
                args: vec![],
            }),
        }],
        outputs_data: vec![data.to_bytes()],
        ..Default::default()
    }
}

/// A block header committing to a list of transactions.
#[derive(Clone, Debug)]
pub struct TxBlock {
    /// Header (unsigned, no PoW).
    pub header: Header,
    /// Transactions in block order.
    pub txs: Vec<RawTransaction>,
    /// Their hashes.
    pub tx_hashes: Vec<Hash>,
}

impl TxBlock {
    /// Build the child of `parent` carrying `txs`.
    pub fn new(parent: &Header, txs: Vec<RawTransaction>) -> Self {
        let tx_hashes: Vec<Hash> = txs.iter().map(RawTransaction::calc_tx_hash).collect();
        let root = transactions_root(&build_root(&tx_hashes), &WITNESSES_ROOT);
        Self {
            header: child_with_tx_root(parent, root),
            txs,
            tx_hashes,
        }
    }

    /// Inclusion proof of transaction `index`.
    pub fn tx_proof(&self, index: usize) -> CkbHistoryTxProof {
        let proof = build_proof(&self.tx_hashes, &[index as u64]).expect("tx index in block");
        CkbHistoryTxProof {
            block_number: self.header.raw.number,
            tx_merkle_index: proof.indices[0] as u16,
            witnesses_root: WITNESSES_ROOT,
            lemmas: proof.lemmas,
            raw_transaction: self.txs[index].to_bytes(),
        }
    }
}

/// Tiny headers of a contiguous header run.
pub fn tiny_headers(headers: &[Header]) -> Vec<TinyHeader> {
    headers
        .iter()
        .map(|h| TinyHeader::new(h.raw.number, h.calc_hash(), h.raw.transactions_root))
        .collect()
}

fn leaves(tiny: &[TinyHeader]) -> Vec<Hash> {
    tiny.iter().map(|t| content_hash(&t.to_bytes())).collect()
}

/// History root over `tiny`.
pub fn history_root(tiny: &[TinyHeader]) -> Hash {
    build_root(&leaves(tiny))
}

/// Multi-leaf proof of positions `picks` in the history range `tiny`.
pub fn history_root_proof(tiny: &[TinyHeader], picks: &[u64]) -> CkbHistoryTxRootProof {
    let proof = build_proof(&leaves(tiny), picks).expect("picks within range");
    let first = tiny[0].number;
    let offset = tiny.len() as u64 - 1;
    CkbHistoryTxRootProof {
        init_block_number: first,
        latest_block_number: tiny[tiny.len() - 1].number,
        proof_leaves: proof
            .indices
            .iter()
            .map(|index| tiny[(index - offset) as usize])
            .collect(),
        indices: proof.indices,
        lemmas: proof.lemmas,
    }
}
