//! # Locker Flows
//!
//! Lock on the verifying ledger, burn on CKB, prove the burn through the
//! ingested header chain, unlock exactly once.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{Bridge, ALICE, ALICE_ERC20, BOB, ERC20, RELAYER};
    use fb_01_view_parsers::CkbUnlockTokenParam;
    use fb_02_header_store::test_helpers::extend;
    use fb_02_header_store::ChainError;
    use fb_04_header_ingestion::{set_new_ckb_spv_hash, IngestionError};
    use fb_05_token_locker::test_helpers::history_root_proof;
    use fb_05_token_locker::{
        BurnProof, CallContext, LockRequest, LockerError, LockerEvent, ProofError,
    };
    use primitive_types::U256;
    use shared_types::NATIVE_TOKEN;

    const ONE_POINT_TWO_ETH: u128 = 1_200_000_000_000_000_000;

    fn request(token: [u8; 20], amount: U256) -> LockRequest {
        LockRequest {
            token,
            amount,
            bridge_fee: U256::from(1u64),
            recipient_lockscript: vec![0x01; 53],
            replay_resist_outpoint: vec![0x02; 36],
            sudt_extra_data: vec![],
        }
    }

    // =========================================================================
    // ROUND TRIPS
    // =========================================================================

    #[test]
    fn test_native_round_trip_applies_once() {
        bridge_telemetry::init_test_logging();
        let mut bridge = Bridge::standard();

        let amount = U256::from(ONE_POINT_TWO_ETH);
        let record = bridge
            .locker
            .lock(
                CallContext::with_value(ALICE, amount),
                request(NATIVE_TOKEN, amount),
            )
            .unwrap();
        assert_eq!(record.token, NATIVE_TOKEN);
        assert_eq!(record.amount, amount);
        assert_eq!(record.replay_resist_outpoint, vec![0x02; 36]);
        assert_eq!(bridge.locker.locked_balance(NATIVE_TOKEN), amount);

        let fee = 3_000_000_000_000_000u128;
        let stated = ONE_POINT_TWO_ETH - fee;
        let block = bridge.ingest_block(vec![bridge.burn(NATIVE_TOKEN, stated, fee, 0)]);
        bridge.extend(2);
        let proof = BurnProof::direct(block.tx_proof(0).to_bytes());

        let before = bridge.locker.locked_balance(NATIVE_TOKEN);
        bridge
            .locker
            .unlock(CallContext::new(RELAYER), &bridge.chain, &[proof.clone()])
            .unwrap();
        let after = bridge.locker.locked_balance(NATIVE_TOKEN);
        assert_eq!(before - after, U256::from(stated));
        assert_eq!(bridge.balance(NATIVE_TOKEN, BOB), U256::from(stated - fee));
        assert_eq!(bridge.balance(NATIVE_TOKEN, RELAYER), U256::from(fee));

        let err = bridge
            .locker
            .unlock(CallContext::new(RELAYER), &bridge.chain, &[proof])
            .unwrap_err();
        assert!(matches!(err, LockerError::Proof(ProofError::ProofReplayed(_))));
        assert_eq!(bridge.locker.locked_balance(NATIVE_TOKEN), after);
        assert_eq!(bridge.balance(NATIVE_TOKEN, BOB), U256::from(stated - fee));
    }

    #[test]
    fn test_erc20_round_trip() {
        let mut bridge = Bridge::standard();
        bridge
            .locker
            .lock(CallContext::new(ALICE), request(ERC20, U256::from(4_000u64)))
            .unwrap();
        assert_eq!(
            bridge.balance(ERC20, ALICE),
            U256::from(ALICE_ERC20 - 4_000)
        );

        let block = bridge.ingest_block(vec![
            bridge.burn(ERC20, 1_500, 15, 0),
            bridge.burn(ERC20, 500, 5, 1),
        ]);
        bridge.locker.take_events();

        let unlocked = bridge
            .locker
            .unlock(
                CallContext::new(RELAYER),
                &bridge.chain,
                &[
                    BurnProof::direct(block.tx_proof(0).to_bytes()),
                    BurnProof::direct(block.tx_proof(1).to_bytes()),
                ],
            )
            .unwrap();

        assert_eq!(unlocked.len(), 2);
        assert_eq!(unlocked[0].burn_tx_hash, block.tx_hashes[0]);
        assert_eq!(bridge.balance(ERC20, BOB), U256::from(1_980u64));
        assert_eq!(bridge.balance(ERC20, RELAYER), U256::from(20u64));
        assert_eq!(bridge.locker.locked_balance(ERC20), U256::from(2_000u64));
        assert_eq!(
            bridge.locker.take_events(),
            unlocked
                .into_iter()
                .map(LockerEvent::Unlocked)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_burn_in_reorged_block_is_not_proven() {
        let mut bridge = Bridge::standard();
        bridge
            .locker
            .lock(CallContext::new(ALICE), request(ERC20, U256::from(100u64)))
            .unwrap();

        let block = bridge.ingest_block(vec![bridge.burn(ERC20, 50, 1, 0)]);
        let fork = extend(bridge.header_at(100), 3, 4);
        bridge.ingest(&fork);

        let err = bridge
            .locker
            .unlock(
                CallContext::new(RELAYER),
                &bridge.chain,
                &[BurnProof::direct(block.tx_proof(0).to_bytes())],
            )
            .unwrap_err();
        assert!(matches!(err, LockerError::Proof(ProofError::NotProven { .. })));
        assert_eq!(bridge.locker.locked_balance(ERC20), U256::from(100u64));
    }

    // =========================================================================
    // AGGREGATED UNLOCK
    // =========================================================================

    #[test]
    fn test_unlock_after_summarization() {
        let mut bridge = Bridge::standard();
        bridge
            .locker
            .lock(CallContext::new(ALICE), request(ERC20, U256::from(1_000u64)))
            .unwrap();

        let old = bridge.ingest_block(vec![bridge.burn(ERC20, 300, 3, 0)]);
        bridge.extend(18);
        let tiny = bridge.summarize(100, 110);
        let recent = bridge.ingest_block(vec![bridge.burn(ERC20, 200, 2, 1)]);
        assert!(!bridge.store().is_retained(old.header.raw.number));

        let param = CkbUnlockTokenParam {
            history_tx_root_proof: history_root_proof(&tiny, &[1]),
            tx_proofs: vec![old.tx_proof(0), recent.tx_proof(0)],
        };
        let unlocked = bridge
            .locker
            .unlock_param(CallContext::new(RELAYER), &bridge.chain, &param.to_bytes())
            .unwrap();

        assert_eq!(unlocked.len(), 2);
        assert_eq!(unlocked[0].block_number, 101);
        assert_eq!(bridge.balance(ERC20, BOB), U256::from(495u64));
        assert_eq!(bridge.locker.locked_balance(ERC20), U256::from(500u64));
        assert!(bridge.locker.is_proof_used(&old.tx_hashes[0]));
        assert!(bridge.locker.is_proof_used(&recent.tx_hashes[0]));

        // Either path replays the same burn hash.
        let err = bridge
            .locker
            .unlock(
                CallContext::new(RELAYER),
                &bridge.chain,
                &[BurnProof::direct(recent.tx_proof(0).to_bytes())],
            )
            .unwrap_err();
        assert!(matches!(err, LockerError::Proof(ProofError::ProofReplayed(_))));
    }

    // =========================================================================
    // SPV SOURCE ROTATION
    // =========================================================================

    #[test]
    fn test_spv_source_rotation() {
        let mut bridge = Bridge::standard();
        bridge
            .locker
            .lock(CallContext::new(ALICE), request(ERC20, U256::from(100u64)))
            .unwrap();
        let block = bridge.ingest_block(vec![bridge.burn(ERC20, 40, 1, 0)]);
        let proof = BurnProof::direct(block.tx_proof(0).to_bytes());
        let original = bridge.chain.address();

        let elsewhere = [0xD7; 20];
        let digest = bridge.locker.digest(&set_new_ckb_spv_hash(&elsewhere, 0));
        bridge
            .locker
            .set_new_ckb_spv(elsewhere, 0, &bridge.sign(&digest))
            .unwrap();
        assert_eq!(bridge.locker.ckb_spv(), elsewhere);

        let err = bridge
            .locker
            .unlock(CallContext::new(RELAYER), &bridge.chain, &[proof.clone()])
            .unwrap_err();
        assert!(matches!(
            err,
            LockerError::Proof(ProofError::UntrustedSpvSource { .. })
        ));

        // Replaying the rotation is rejected before signatures are checked.
        assert_eq!(
            bridge
                .locker
                .set_new_ckb_spv(original, 0, &[])
                .unwrap_err(),
            LockerError::Governance(IngestionError::Chain(ChainError::InvalidNonce {
                action: "setNewCkbSpv",
                expected: 1,
                got: 0
            }))
        );

        let digest = bridge.locker.digest(&set_new_ckb_spv_hash(&original, 1));
        bridge
            .locker
            .set_new_ckb_spv(original, 1, &bridge.sign(&digest))
            .unwrap();
        assert_eq!(bridge.locker.current_set_new_ckb_spv_nonce(), 2);

        bridge
            .locker
            .unlock(CallContext::new(RELAYER), &bridge.chain, &[proof])
            .unwrap();
        assert_eq!(bridge.balance(ERC20, BOB), U256::from(39u64));
    }

    #[test]
    fn test_ingestion_signatures_do_not_authorize_locker_actions() {
        let mut bridge = Bridge::standard();
        let target = [0xD7; 20];

        // Same validators, but signed under the ingestion domain.
        let digest = bridge.chain.digest(&set_new_ckb_spv_hash(&target, 0));
        assert!(matches!(
            bridge.locker.set_new_ckb_spv(target, 0, &bridge.sign(&digest)),
            Err(LockerError::Governance(IngestionError::Signature(_)))
        ));
        assert_eq!(bridge.locker.current_set_new_ckb_spv_nonce(), 0);
    }
}
