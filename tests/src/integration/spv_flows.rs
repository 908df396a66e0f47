//! # SPV Flows
//!
//! Inclusion proofs against a store fed through signed ingestion, on both
//! the direct path and the aggregated history-root path.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{Bridge, ERC20};
    use fb_01_view_parsers::CkbTxProof;
    use fb_03_spv_verifier::{SpvApi, SpvVerifier};
    use fb_05_token_locker::test_helpers::{history_root_proof, TxBlock, WITNESSES_ROOT};
    use proptest::prelude::*;
    use shared_types::TinyHeader;

    fn direct_proof(block: &TxBlock, index: usize) -> CkbTxProof {
        let history = block.tx_proof(index);
        CkbTxProof {
            tx_merkle_index: history.tx_merkle_index,
            block_number: block.header.raw.number,
            block_hash: block.header.calc_hash(),
            tx_hash: block.tx_hashes[index],
            witnesses_root: WITNESSES_ROOT,
            lemmas: history.lemmas,
        }
    }

    /// Bridge with burns in blocks 101 and 105, tip 120, history over [100, 110].
    fn summarized_bridge() -> (Bridge, TxBlock, TxBlock, Vec<TinyHeader>) {
        let mut bridge = Bridge::standard();
        let early = bridge.ingest_block(vec![bridge.burn(ERC20, 10, 1, 0)]);
        bridge.extend(3);
        let later = bridge.ingest_block(vec![
            bridge.burn(ERC20, 20, 1, 1),
            bridge.burn(ERC20, 30, 1, 2),
        ]);
        bridge.extend(15);
        let tiny = bridge.summarize(100, 110);
        (bridge, early, later, tiny)
    }

    // =========================================================================
    // DIRECT PATH
    // =========================================================================

    #[test]
    fn test_direct_proof_through_spv_api() {
        let mut bridge = Bridge::standard();
        let block = bridge.ingest_block(vec![
            bridge.burn(ERC20, 10, 1, 0),
            bridge.burn(ERC20, 20, 1, 1),
            bridge.burn(ERC20, 30, 1, 2),
        ]);
        bridge.extend(2);

        let verifier = SpvVerifier::new(bridge.store());
        let tip = bridge.store().latest_block_number();
        for index in 0..3 {
            let proof = direct_proof(&block, index).to_bytes();
            assert_eq!(verifier.prove_tx_exist(&proof, tip), Ok(true));
        }

        // The caller's bound applies as well as the store tip.
        let proof = direct_proof(&block, 1).to_bytes();
        assert_eq!(verifier.prove_tx_exist(&proof, 100), Ok(false));
    }

    #[test]
    fn test_direct_proof_rejections() {
        let mut bridge = Bridge::standard();
        let block = bridge.ingest_block(vec![
            bridge.burn(ERC20, 10, 1, 0),
            bridge.burn(ERC20, 20, 1, 1),
        ]);
        let verifier = SpvVerifier::new(bridge.store());
        let tip = bridge.store().latest_block_number();

        let mut bad_lemma = direct_proof(&block, 0);
        bad_lemma.lemmas[0][7] ^= 0x01;
        assert_eq!(verifier.prove_tx_exist(&bad_lemma.to_bytes(), tip), Ok(false));

        let mut bad_index = direct_proof(&block, 0);
        bad_index.tx_merkle_index ^= 1;
        assert_eq!(verifier.prove_tx_exist(&bad_index.to_bytes(), tip), Ok(false));

        let mut wrong_tx = direct_proof(&block, 0);
        wrong_tx.tx_hash = block.tx_hashes[1];
        assert_eq!(verifier.prove_tx_exist(&wrong_tx.to_bytes(), tip), Ok(false));

        let mut wrong_block = direct_proof(&block, 0);
        wrong_block.block_hash = [0x42; 32];
        assert_eq!(verifier.prove_tx_exist(&wrong_block.to_bytes(), tip), Ok(false));

        let mut wrong_witnesses = direct_proof(&block, 0);
        wrong_witnesses.witnesses_root = [0x00; 32];
        assert_eq!(verifier.prove_tx_exist(&wrong_witnesses.to_bytes(), tip), Ok(false));

        let mut extra_lemma = direct_proof(&block, 0);
        extra_lemma.lemmas.push([0x01; 32]);
        assert_eq!(verifier.prove_tx_exist(&extra_lemma.to_bytes(), tip), Ok(false));

        assert!(verifier.prove_tx_exist(&[0u8; 7], tip).is_err());
    }

    #[test]
    fn test_history_tx_against_retained_header() {
        let mut bridge = Bridge::standard();
        let block = bridge.ingest_block(vec![bridge.burn(ERC20, 10, 1, 0)]);
        let verifier = SpvVerifier::new(bridge.store());
        let proof = block.tx_proof(0).to_bytes();

        assert_eq!(
            verifier.prove_history_tx_exist(&proof, &block.header.raw.transactions_root),
            Ok(true)
        );
        assert_eq!(verifier.prove_history_tx_exist(&proof, &[0x13; 32]), Ok(false));
    }

    // =========================================================================
    // AGGREGATED PATH
    // =========================================================================

    #[test]
    fn test_aggregated_proof_after_summarization() {
        let (bridge, early, later, tiny) = summarized_bridge();
        let verifier = SpvVerifier::new(bridge.store());
        let tip = bridge.store().latest_block_number();

        // Content is gone; the direct path no longer answers.
        assert!(!bridge.store().is_retained(101));
        let direct = direct_proof(&early, 0).to_bytes();
        assert_eq!(verifier.prove_tx_exist(&direct, tip), Ok(false));

        let root_proof = history_root_proof(&tiny, &[1, 5, 9]).to_bytes();
        let leaves = verifier.prove_tx_root_exist(&root_proof).unwrap().unwrap();
        let mut numbers: Vec<u64> = leaves.iter().map(|t| t.number).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![101, 105, 109]);

        let tx_root = |number: u64| {
            leaves
                .iter()
                .find(|t| t.number == number)
                .map(|t| t.tx_root)
                .unwrap()
        };
        assert_eq!(
            verifier.prove_history_tx_exist(&early.tx_proof(0).to_bytes(), &tx_root(101)),
            Ok(true)
        );
        for index in 0..2 {
            assert_eq!(
                verifier.prove_history_tx_exist(&later.tx_proof(index).to_bytes(), &tx_root(105)),
                Ok(true)
            );
        }
        assert_eq!(
            verifier.prove_history_tx_exist(&early.tx_proof(0).to_bytes(), &tx_root(105)),
            Ok(false)
        );
    }

    #[test]
    fn test_aggregated_proof_rejections() {
        let (bridge, _, _, tiny) = summarized_bridge();
        let verifier = SpvVerifier::new(bridge.store());

        let mut forged = history_root_proof(&tiny, &[1]);
        forged.proof_leaves[0].tx_root = [0x66; 32];
        assert_eq!(verifier.prove_tx_root_exist(&forged.to_bytes()), Ok(None));

        // Leaf claiming a different block number than its position.
        let mut shifted = history_root_proof(&tiny, &[1]);
        shifted.proof_leaves[0].number = 102;
        assert_eq!(verifier.prove_tx_root_exist(&shifted.to_bytes()), Ok(None));

        // A range no history root was stored for.
        let partial = history_root_proof(&tiny[..10], &[1]);
        assert_eq!(verifier.prove_tx_root_exist(&partial.to_bytes()), Ok(None));

        let mut extra = history_root_proof(&tiny, &[1]);
        extra.lemmas.push([0x01; 32]);
        assert_eq!(verifier.prove_tx_root_exist(&extra.to_bytes()), Ok(None));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_any_leaf_subset_is_provable(
            picks in proptest::collection::btree_set(0u64..11, 1..6),
        ) {
            let (bridge, _, _, tiny) = summarized_bridge();
            let verifier = SpvVerifier::new(bridge.store());
            let picks: Vec<u64> = picks.into_iter().collect();

            let proof = history_root_proof(&tiny, &picks).to_bytes();
            let leaves = verifier.prove_tx_root_exist(&proof).unwrap().unwrap();
            prop_assert_eq!(leaves.len(), picks.len());
            for leaf in leaves {
                prop_assert_eq!(Some(&leaf), tiny.get((leaf.number - 100) as usize));
            }
        }
    }
}
