//! # Header Flows
//!
//! Signed header ingestion end to end: multisig gating, chain linkage,
//! canonical reorgs and tiered retention.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{Bridge, INIT_BLOCK};
    use fb_01_view_parsers::pack_header_vec;
    use fb_02_header_store::test_helpers::{child, extend};
    use fb_02_header_store::{BatchOutcome, ChainError, HeaderState};
    use fb_04_header_ingestion::test_helpers::{sign_blob, validator_keys};
    use fb_04_header_ingestion::{
        add_headers_hash, set_validators_hash, HeaderIngestionApi, IngestionError, NonceAction,
        SignatureError,
    };
    use shared_crypto::test_helpers::generate_keypair;

    // =========================================================================
    // INGESTION
    // =========================================================================

    #[test]
    fn test_signed_batches_advance_tip() {
        bridge_telemetry::init_test_logging();
        let mut bridge = Bridge::standard();

        let run = bridge.extend(5);
        assert_eq!(run.len(), 5);
        assert_eq!(bridge.store().latest_block_number(), INIT_BLOCK + 5);
        assert_eq!(bridge.store().latest_epoch(), Some(INIT_BLOCK + 5));

        for number in INIT_BLOCK..=INIT_BLOCK + 5 {
            assert_eq!(
                bridge.store().canonical_header_hash(number),
                Some(bridge.header_at(number).calc_hash())
            );
        }

        bridge.extend(2);
        assert_eq!(bridge.store().latest_block_number(), INIT_BLOCK + 7);
    }

    #[test]
    fn test_batch_outcome_reports_range() {
        let mut bridge = Bridge::standard();
        let run = extend(bridge.tip(), 4, 0);
        assert_eq!(
            bridge.ingest(&run),
            BatchOutcome {
                start: 101,
                tip: 104,
                replaced: 0
            }
        );
    }

    #[test]
    fn test_broken_linkage_leaves_store_unchanged() {
        let mut bridge = Bridge::standard();
        bridge.extend(2);
        let before = bridge.store().clone();

        let mut orphan = child(bridge.tip(), 1);
        orphan.raw.parent_hash = [0xAB; 32];
        assert_eq!(
            bridge.try_ingest(&[orphan]).unwrap_err(),
            IngestionError::Chain(ChainError::ParentMismatch { number: 103 })
        );

        let gapped = extend(bridge.tip(), 3, 1);
        assert_eq!(
            bridge.try_ingest(&gapped[1..]).unwrap_err(),
            IngestionError::Chain(ChainError::NonContiguous {
                expected: 103,
                got: 104
            })
        );

        assert_eq!(bridge.store(), &before);
    }

    // =========================================================================
    // MULTISIG
    // =========================================================================

    #[test]
    fn test_multisig_rejections() {
        let mut bridge = Bridge::new(4, 3, 3, 6);
        let run = extend(bridge.tip(), 2, 0);
        let data = pack_header_vec(&run);
        let digest = bridge.chain.digest(&add_headers_hash(&data));
        let (outsider, _) = generate_keypair();

        let too_few = sign_blob(&digest, &bridge.keys[..2]);
        assert_eq!(
            bridge.chain.add_headers(&data, &too_few).unwrap_err(),
            IngestionError::Signature(SignatureError::BelowThreshold {
                required: 3,
                got: 2
            })
        );

        let with_outsider = sign_blob(
            &digest,
            &[bridge.keys[0].clone(), bridge.keys[1].clone(), outsider],
        );
        assert!(matches!(
            bridge.chain.add_headers(&data, &with_outsider),
            Err(IngestionError::Signature(SignatureError::UnknownSigner(_)))
        ));

        let duplicated = sign_blob(
            &digest,
            &[bridge.keys[0].clone(), bridge.keys[1].clone(), bridge.keys[0].clone()],
        );
        assert!(matches!(
            bridge.chain.add_headers(&data, &duplicated),
            Err(IngestionError::Signature(SignatureError::DuplicateSigner(_)))
        ));

        assert_eq!(
            bridge.chain.add_headers(&data, &[0u8; 64]).unwrap_err(),
            IngestionError::Signature(SignatureError::InvalidLength { len: 64 })
        );

        assert_eq!(bridge.store().latest_block_number(), INIT_BLOCK);

        // Signatures over different headers do not carry over.
        let other = pack_header_vec(&extend(bridge.tip(), 2, 9));
        let sigs = sign_blob(&digest, &bridge.keys[..3]);
        assert!(matches!(
            bridge.chain.add_headers(&other, &sigs),
            Err(IngestionError::Signature(SignatureError::UnknownSigner(_)))
        ));

        bridge.chain.add_headers(&data, &sigs).unwrap();
        assert_eq!(bridge.store().latest_block_number(), INIT_BLOCK + 2);
    }

    #[test]
    fn test_validator_rotation_and_replay() {
        let mut bridge = Bridge::standard();
        let (next_keys, next_set) = validator_keys(2, 2);
        let members = next_set.validators().to_vec();

        let struct_hash = set_validators_hash(&members, 2, 0);
        let sigs = bridge.sign(&bridge.chain.digest(&struct_hash));
        bridge
            .chain
            .set_validators(members.clone(), 2, 0, &sigs)
            .unwrap();
        assert_eq!(bridge.chain.current_nonce(NonceAction::SetValidators), 1);
        assert_eq!(bridge.chain.validator_set().validators(), &members[..]);

        assert_eq!(
            bridge
                .chain
                .set_validators(members.clone(), 2, 0, &sigs)
                .unwrap_err(),
            IngestionError::Chain(ChainError::InvalidNonce {
                action: "setValidators",
                expected: 1,
                got: 0
            })
        );

        // The retired set can no longer sign headers.
        let run = extend(bridge.tip(), 1, 0);
        assert!(matches!(
            bridge.try_ingest(&run),
            Err(IngestionError::Signature(SignatureError::UnknownSigner(_)))
        ));

        bridge.keys = next_keys;
        bridge.ingest(&run);
        assert_eq!(bridge.store().latest_block_number(), INIT_BLOCK + 1);
    }

    // =========================================================================
    // REORGS
    // =========================================================================

    #[test]
    fn test_reorg_within_canonical_tier() {
        let mut bridge = Bridge::standard();
        bridge.extend(5);
        let replaced_hash = bridge.header_at(105).calc_hash();

        let fork = extend(bridge.header_at(103), 3, 7);
        let outcome = bridge.ingest(&fork);

        assert_eq!(
            outcome,
            BatchOutcome {
                start: 104,
                tip: 106,
                replaced: 2
            }
        );
        assert_eq!(
            bridge.store().canonical_header_hash(104),
            Some(fork[0].calc_hash())
        );
        assert_eq!(bridge.store().canonical_transactions_root(&replaced_hash), None);
    }

    #[test]
    fn test_reorg_rejections() {
        let mut bridge = Bridge::standard();
        bridge.extend(6);
        let before = bridge.store().clone();

        // 102 is finalized at tip 106.
        assert_eq!(bridge.store().header_state(102), Some(HeaderState::Finalized));
        let deep = extend(bridge.header_at(101), 6, 9);
        assert_eq!(
            bridge.try_ingest(&deep).unwrap_err(),
            IngestionError::Chain(ChainError::ReorgTooDeep { number: 102 })
        );

        let short = extend(bridge.header_at(103), 2, 9);
        assert_eq!(
            bridge.try_ingest(&short).unwrap_err(),
            IngestionError::Chain(ChainError::BelowTip { tip: 106, last: 105 })
        );

        assert_eq!(bridge.store(), &before);
    }

    // =========================================================================
    // RETENTION
    // =========================================================================

    #[test]
    fn test_retention_tiers() {
        let mut bridge = Bridge::standard();
        bridge.extend(20);

        let store = bridge.store();
        assert_eq!(store.header_state(100), Some(HeaderState::Finalized));
        assert_eq!(store.header_state(116), Some(HeaderState::Finalized));
        assert_eq!(store.header_state(117), Some(HeaderState::Canonical));
        assert_eq!(store.header_state(120), Some(HeaderState::Canonical));
        assert_eq!(store.header_state(121), None);
        assert_eq!(store.gc_boundary(), Some(100));

        bridge.summarize(100, 110);
        let store = bridge.store();
        assert!(!store.is_retained(105));
        assert_eq!(store.header_state(105), Some(HeaderState::Summarized));
        assert_eq!(store.header_state(111), Some(HeaderState::Finalized));
        assert_eq!(store.gc_boundary(), Some(111));
        assert_eq!(
            store
                .history_entry_covering(105)
                .map(|e| (e.start_block_number, e.end_block_number)),
            Some((100, 110))
        );

        // Covered but younger than the canonical threshold: kept.
        bridge.summarize(111, 116);
        assert_eq!(bridge.store().gc_boundary(), Some(114));
        assert_eq!(bridge.store().header_state(115), Some(HeaderState::Finalized));

        bridge.extend(3);
        assert_eq!(bridge.store().gc_boundary(), Some(117));
        assert_eq!(bridge.store().header_state(115), Some(HeaderState::Summarized));
    }

    #[test]
    fn test_history_root_rejections() {
        let mut bridge = Bridge::standard();
        bridge.extend(20);

        assert_eq!(
            bridge.try_summarize(101, 110).unwrap_err(),
            IngestionError::Chain(ChainError::HistoryRangeMismatch {
                expected: 100,
                got: 101
            })
        );
        assert_eq!(
            bridge.try_summarize(100, 117).unwrap_err(),
            IngestionError::Chain(ChainError::HistoryNotFinalized { end: 117, tip: 120 })
        );

        bridge.summarize(100, 110);
        assert_eq!(
            bridge.try_summarize(100, 110).unwrap_err(),
            IngestionError::Chain(ChainError::HistoryRangeMismatch {
                expected: 111,
                got: 100
            })
        );
        assert_eq!(bridge.store().next_history_start(), 111);
    }

    #[test]
    fn test_summarized_range_cannot_be_reorged() {
        let mut bridge = Bridge::standard();
        bridge.extend(20);
        bridge.summarize(100, 110);

        let fork = extend(bridge.header_at(109), 15, 3);
        assert!(matches!(
            bridge.try_ingest(&fork),
            Err(IngestionError::Chain(ChainError::ReorgTooDeep { .. }))
        ));
    }
}
