//! # SPV Verifier
//!
//! Read-only inclusion checks against a borrowed [`HeaderStore`].
//!
//! Two paths:
//! - **Direct**: the block is still retained; walk the transaction's CBMT
//!   path and compare with the stored header's `transactions_root`.
//! - **Aggregated**: the block may be summarized; first authenticate its
//!   tiny header against a stored history root, then walk the transaction's
//!   path against the tiny header's `tx_root`.
//!
//! "Not proven" is `Ok(false)` / `Ok(None)`. Only malformed bytes are errors.

use fb_01_view_parsers::{
    CkbHistoryTxProofView, CkbHistoryTxRootProofView, CkbTxProofView, ViewError,
};
use fb_02_header_store::HeaderStore;
use shared_crypto::content_hash;
use shared_types::{to_hex, BlockNumber, Hash, TinyHeader};
use tracing::debug;

use crate::algorithms::{multi_proof_root, single_proof_root, transactions_root};
use crate::ports::SpvApi;

/// SPV verifier over an immutably borrowed header store.
#[derive(Clone, Copy, Debug)]
pub struct SpvVerifier<'a> {
    store: &'a HeaderStore,
}

impl<'a> SpvVerifier<'a> {
    /// Create a verifier.
    pub fn new(store: &'a HeaderStore) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &'a HeaderStore {
        self.store
    }

    /// Direct proof, already decoded.
    pub fn verify_tx_proof(&self, proof: &CkbTxProofView, latest_block_number: BlockNumber) -> bool {
        let number = proof.block_number();
        if number > latest_block_number || number > self.store.latest_block_number() {
            debug!(number, latest_block_number, "[fb-03] Proof block above limit");
            return false;
        }

        let Some(canonical) = self.store.canonical_header_hash(number) else {
            debug!(number, "[fb-03] Proof block not retained");
            return false;
        };
        if canonical != proof.block_hash() {
            debug!(
                number,
                expected = %to_hex(&canonical),
                got = %to_hex(&proof.block_hash()),
                "[fb-03] Proof block hash is not canonical"
            );
            return false;
        }
        let Some(expected) = self.store.canonical_transactions_root(&canonical) else {
            return false;
        };

        tx_path_matches(
            &proof.tx_hash(),
            u64::from(proof.tx_merkle_index()),
            proof.lemmas(),
            &proof.witnesses_root(),
            &expected,
        )
    }

    /// Aggregated root proof, already decoded.
    ///
    /// Returns the authenticated tiny headers.
    pub fn verify_history_root_proof(
        &self,
        proof: &CkbHistoryTxRootProofView,
    ) -> Option<Vec<TinyHeader>> {
        let start = proof.init_block_number();
        let end = proof.latest_block_number();
        let Some(entry) = self.store.history_entry_for_range(start, end) else {
            debug!(start, end, "[fb-03] No history root for range");
            return None;
        };

        let leaves = proof.proof_leaves();
        let indices = proof.indices();
        if leaves.is_empty() || leaves.len() != indices.len() {
            return None;
        }

        let leaf_count = entry.leaf_count();
        let mut hashes = Vec::with_capacity(leaves.len());
        for (leaf, index) in leaves.iter().zip(indices) {
            if !entry.covers(leaf.number) {
                return None;
            }
            let expected_index = (leaf.number - start) + leaf_count - 1;
            if *index != expected_index {
                debug!(
                    number = leaf.number,
                    index,
                    expected_index,
                    "[fb-03] Leaf index does not match block number"
                );
                return None;
            }
            hashes.push(content_hash(&leaf.to_bytes()));
        }

        let root = multi_proof_root(indices, &hashes, proof.lemmas())?;
        if root != entry.history_tx_root {
            debug!(start, end, "[fb-03] History root mismatch");
            return None;
        }
        Some(leaves.to_vec())
    }

    /// Transaction proof against an already-authenticated `tx_root`.
    pub fn verify_history_tx(
        &self,
        proof: &CkbHistoryTxProofView<'_>,
        tx_root: &Hash,
    ) -> Result<bool, ViewError> {
        let raw = proof.raw_transaction()?;
        Ok(tx_path_matches(
            &raw.calc_tx_hash(),
            u64::from(proof.tx_merkle_index()),
            proof.lemmas(),
            &proof.witnesses_root(),
            tx_root,
        ))
    }

    /// Transaction proof against the retained header of its block.
    ///
    /// `Ok(false)` if the block's content is no longer retained.
    pub fn verify_retained_history_tx(
        &self,
        proof: &CkbHistoryTxProofView<'_>,
    ) -> Result<bool, ViewError> {
        match self.store.header(proof.block_number()) {
            Some(header) => self.verify_history_tx(proof, &header.transactions_root),
            None => Ok(false),
        }
    }
}

impl SpvApi for SpvVerifier<'_> {
    fn prove_tx_exist(&self, proof: &[u8], latest_block_number: BlockNumber) -> Result<bool, ViewError> {
        let proof = CkbTxProofView::from_slice(proof)?;
        Ok(self.verify_tx_proof(&proof, latest_block_number))
    }

    fn prove_tx_root_exist(&self, proof: &[u8]) -> Result<Option<Vec<TinyHeader>>, ViewError> {
        let proof = CkbHistoryTxRootProofView::from_slice(proof)?;
        Ok(self.verify_history_root_proof(&proof))
    }

    fn prove_history_tx_exist(&self, proof: &[u8], tx_root: &Hash) -> Result<bool, ViewError> {
        let proof = CkbHistoryTxProofView::from_slice(proof)?;
        self.verify_history_tx(&proof, tx_root)
    }
}

/// `merge(path_root(tx_hash), witnesses_root) == expected`.
fn tx_path_matches(
    tx_hash: &Hash,
    index: u64,
    lemmas: &[Hash],
    witnesses_root: &Hash,
    expected: &Hash,
) -> bool {
    match single_proof_root(tx_hash, index, lemmas) {
        Some(raw_root) => transactions_root(&raw_root, witnesses_root) == *expected,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{build_proof, build_root};
    use fb_01_view_parsers::{
        CkbHistoryTxProof, CkbHistoryTxRootProof, CkbTxProof, Header, RawTransaction,
    };
    use fb_02_header_store::test_helpers::*;
    use fb_02_header_store::HeaderStoreConfig;

    const WITNESSES_ROOT: Hash = [0x77; 32];

    fn raw_tx(tag: u32) -> RawTransaction {
        RawTransaction {
            version: tag,
            ..Default::default()
        }
    }

    /// Block with `count` transactions; returns header, tx hashes.
    fn block_with_txs(parent: &Header, count: u32) -> (Header, Vec<Hash>) {
        let hashes: Vec<Hash> = (0..count).map(|i| raw_tx(i).calc_tx_hash()).collect();
        let root = transactions_root(&build_root(&hashes), &WITNESSES_ROOT);
        (child_with_tx_root(parent, root), hashes)
    }

    fn store_with(headers: &[Header], root: &Header) -> HeaderStore {
        let mut store = HeaderStore::new(HeaderStoreConfig::for_testing());
        let s = stored(root);
        let hash = s.hash;
        store.init_with_header(s, hash, 3, 6).unwrap();
        store.add_headers(to_stored(headers)).unwrap();
        store
    }

    fn direct_proof(header: &Header, hashes: &[Hash], tx: u64) -> CkbTxProof {
        let proof = build_proof(hashes, &[tx]).unwrap();
        CkbTxProof {
            tx_merkle_index: proof.indices[0] as u16,
            block_number: header.raw.number,
            block_hash: header.calc_hash(),
            tx_hash: hashes[tx as usize],
            witnesses_root: WITNESSES_ROOT,
            lemmas: proof.lemmas,
        }
    }

    #[test]
    fn test_prove_tx_exist() {
        let root = genesis(10);
        let (block, hashes) = block_with_txs(&root, 5);
        let store = store_with(std::slice::from_ref(&block), &root);
        let verifier = SpvVerifier::new(&store);

        for tx in 0..5 {
            let proof = direct_proof(&block, &hashes, tx).to_bytes();
            assert!(verifier.prove_tx_exist(&proof, 11).unwrap());
        }
    }

    #[test]
    fn test_prove_tx_exist_tampered() {
        let root = genesis(10);
        let (block, hashes) = block_with_txs(&root, 5);
        let store = store_with(std::slice::from_ref(&block), &root);
        let verifier = SpvVerifier::new(&store);

        let mut bad_lemma = direct_proof(&block, &hashes, 3);
        bad_lemma.lemmas[0][0] ^= 0x01;
        assert!(!verifier.prove_tx_exist(&bad_lemma.to_bytes(), 11).unwrap());

        let mut bad_index = direct_proof(&block, &hashes, 3);
        bad_index.tx_merkle_index += 1;
        assert!(!verifier.prove_tx_exist(&bad_index.to_bytes(), 11).unwrap());

        let mut bad_hash = direct_proof(&block, &hashes, 3);
        bad_hash.block_hash[0] ^= 0x01;
        assert!(!verifier.prove_tx_exist(&bad_hash.to_bytes(), 11).unwrap());
    }

    #[test]
    fn test_prove_tx_exist_above_latest() {
        let root = genesis(10);
        let (block, hashes) = block_with_txs(&root, 2);
        let store = store_with(std::slice::from_ref(&block), &root);
        let verifier = SpvVerifier::new(&store);

        let proof = direct_proof(&block, &hashes, 0).to_bytes();
        assert!(!verifier.prove_tx_exist(&proof, 10).unwrap());
    }

    #[test]
    fn test_prove_tx_exist_malformed() {
        let store = HeaderStore::new(HeaderStoreConfig::for_testing());
        let verifier = SpvVerifier::new(&store);
        assert!(verifier.prove_tx_exist(&[1, 2, 3], 0).is_err());
    }

    /// Chain 11..=30 over root 10, every block carrying one tx; history root
    /// over [10, 20].
    fn history_fixture() -> (HeaderStore, Vec<Header>, Vec<TinyHeader>) {
        let root = genesis(10);
        let mut chain = Vec::new();
        let mut parent = root.clone();
        for _ in 0..20 {
            let (block, _) = block_with_txs(&parent, 1);
            parent = block.clone();
            chain.push(block);
        }
        let mut store = store_with(&chain, &root);

        let mut all = vec![root];
        all.extend(chain.iter().cloned());
        let tiny: Vec<TinyHeader> = all[..11]
            .iter()
            .map(|h| TinyHeader::new(h.raw.number, h.calc_hash(), h.raw.transactions_root))
            .collect();
        let leaf_hashes: Vec<Hash> = tiny.iter().map(|t| content_hash(&t.to_bytes())).collect();
        store
            .add_history_tx_root(10, 20, build_root(&leaf_hashes))
            .unwrap();
        (store, all, tiny)
    }

    fn root_proof(tiny: &[TinyHeader], picks: &[u64]) -> CkbHistoryTxRootProof {
        let leaf_hashes: Vec<Hash> = tiny.iter().map(|t| content_hash(&t.to_bytes())).collect();
        let proof = build_proof(&leaf_hashes, picks).unwrap();
        let n = tiny.len() as u64;
        CkbHistoryTxRootProof {
            init_block_number: 10,
            latest_block_number: 20,
            indices: proof.indices.clone(),
            proof_leaves: proof
                .indices
                .iter()
                .map(|i| tiny[(i - (n - 1)) as usize])
                .collect(),
            lemmas: proof.lemmas,
        }
    }

    #[test]
    fn test_prove_tx_root_exist() {
        let (store, _, tiny) = history_fixture();
        let verifier = SpvVerifier::new(&store);

        let proof = root_proof(&tiny, &[1, 4, 9]);
        let proven = verifier.prove_tx_root_exist(&proof.to_bytes()).unwrap().unwrap();
        assert_eq!(proven.len(), 3);
        assert!(proven.contains(&tiny[4]));
    }

    #[test]
    fn test_prove_tx_root_exist_wrong_range() {
        let (store, _, tiny) = history_fixture();
        let verifier = SpvVerifier::new(&store);

        let mut proof = root_proof(&tiny, &[2]);
        proof.latest_block_number = 19;
        assert_eq!(verifier.prove_tx_root_exist(&proof.to_bytes()).unwrap(), None);
    }

    #[test]
    fn test_prove_tx_root_exist_forged_leaf() {
        let (store, _, tiny) = history_fixture();
        let verifier = SpvVerifier::new(&store);

        let mut proof = root_proof(&tiny, &[2]);
        proof.proof_leaves[0].tx_root = [0xFF; 32];
        assert_eq!(verifier.prove_tx_root_exist(&proof.to_bytes()).unwrap(), None);

        // Leaf claims a different block number than its tree position.
        let mut proof = root_proof(&tiny, &[2]);
        proof.proof_leaves[0].number += 1;
        assert_eq!(verifier.prove_tx_root_exist(&proof.to_bytes()).unwrap(), None);
    }

    #[test]
    fn test_prove_history_tx_exist() {
        let root = genesis(10);
        let (block, hashes) = block_with_txs(&root, 4);
        let store = store_with(std::slice::from_ref(&block), &root);
        let verifier = SpvVerifier::new(&store);

        let proof = build_proof(&hashes, &[2]).unwrap();
        let history_proof = CkbHistoryTxProof {
            block_number: block.raw.number,
            tx_merkle_index: proof.indices[0] as u16,
            witnesses_root: WITNESSES_ROOT,
            lemmas: proof.lemmas,
            raw_transaction: raw_tx(2).to_bytes(),
        };
        let bytes = history_proof.to_bytes();

        assert!(verifier
            .prove_history_tx_exist(&bytes, &block.raw.transactions_root)
            .unwrap());
        assert!(!verifier.prove_history_tx_exist(&bytes, &[0u8; 32]).unwrap());

        let view = CkbHistoryTxProofView::from_slice(&bytes).unwrap();
        assert!(verifier.verify_retained_history_tx(&view).unwrap());
    }

    #[test]
    fn test_summarized_block_only_provable_via_history() {
        let (store, all, tiny) = history_fixture();
        let verifier = SpvVerifier::new(&store);

        // tip 30, canonical threshold 6: blocks below 24 that are covered
        // (<= 20) are summarized.
        let block = &all[5];
        assert!(!store.is_retained(block.raw.number));

        let history_proof = CkbHistoryTxProof {
            block_number: block.raw.number,
            tx_merkle_index: 0,
            witnesses_root: WITNESSES_ROOT,
            lemmas: vec![],
            raw_transaction: raw_tx(0).to_bytes(),
        };
        let bytes = history_proof.to_bytes();
        let view = CkbHistoryTxProofView::from_slice(&bytes).unwrap();
        assert!(!verifier.verify_retained_history_tx(&view).unwrap());

        let proven = verifier
            .prove_tx_root_exist(&root_proof(&tiny, &[5]).to_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(proven[0].number, block.raw.number);
        assert!(verifier.verify_history_tx(&view, &proven[0].tx_root).unwrap());
    }
}
