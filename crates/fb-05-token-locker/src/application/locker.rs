//! # Token Locker
//!
//! Holds locked value and releases it against CKB burn proofs.
//!
//! ## Unlock pipeline (per proof)
//!
//! 1. Inclusion: direct against the retained header, or through a history
//!    root proof once the header has been summarized.
//! 2. Burn decoding: output 0 carries the recipient typescript, its data is
//!    a `RecipientCellData` naming this locker, fee below amount.
//! 3. Exactly once: the burn tx hash enters the used set.
//! 4. Payout: `amount - fee` to the recipient, `fee` to the fee sink.
//!
//! A batch runs against a scratch copy of the state and the balance
//! service; the copy replaces the live state only if every proof passes.

use std::collections::{BTreeMap, BTreeSet};

use fb_01_view_parsers::{
    CkbHistoryTxProofView, CkbHistoryTxRootProofView, CkbUnlockTokenParamView, RawTransactionView,
    RecipientCellData,
};
use fb_03_spv_verifier::SpvVerifier;
use fb_04_header_ingestion::{
    domain_separator, set_new_ckb_spv_hash, MultisigGuard, NonceAction, ValidatorSet,
};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use shared_types::{to_hex, Address, Hash, TinyHeader, NATIVE_TOKEN};
use tracing::{info, warn};

use crate::config::LockerConfig;
use crate::domain::{
    BalanceError, BurnProof, CallContext, LockRecord, LockRequest, LockerError, LockerEvent,
    ProofError, RecipientTypescript, UnlockRecord,
};
use crate::ports::{BalanceService, CkbSpvSource};

/// Persisted locker state.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerState {
    guard: MultisigGuard,
    ckb_spv: Address,
    #[serde_as(as = "Vec<(_, _)>")]
    locked: BTreeMap<Address, U256>,
    records: Vec<LockRecord>,
    used_proofs: BTreeSet<Hash>,
}

/// Lock/unlock ledger over a balance service `B`.
#[derive(Clone, Debug)]
pub struct TokenLocker<B> {
    address: Address,
    recipient_typescript: RecipientTypescript,
    fee_sink: Option<Address>,
    state: LockerState,
    balances: B,
    events: Vec<LockerEvent>,
}

impl<B: BalanceService + Clone> TokenLocker<B> {
    /// Create a locker from a validated config.
    pub fn new(config: LockerConfig, balances: B) -> Result<Self, LockerError> {
        let validators = config.validate()?;
        let separator = domain_separator(
            &config.domain_name,
            config.chain_id,
            &config.contract_address,
        );
        info!(
            contract = %to_hex(&config.contract_address),
            ckb_spv = %to_hex(&config.ckb_spv),
            "[fb-05] Token locker created"
        );
        Ok(Self {
            address: config.contract_address,
            recipient_typescript: config.recipient_typescript,
            fee_sink: config.fee_sink,
            state: LockerState {
                guard: MultisigGuard::new(separator, validators),
                ckb_spv: config.ckb_spv,
                locked: BTreeMap::new(),
                records: Vec::new(),
                used_proofs: BTreeSet::new(),
            },
            balances,
            events: Vec::new(),
        })
    }

    // =========================================================================
    // LOCK
    // =========================================================================

    /// Lock value for minting on CKB.
    ///
    /// # Errors
    /// - `InvalidLock` if `amount <= bridge_fee` or the recipient is empty
    /// - `ValueMismatch` if attached value does not match the asset kind
    /// - balance service errors from pulling a fungible token
    pub fn lock(&mut self, ctx: CallContext, request: LockRequest) -> Result<LockRecord, LockerError> {
        if request.amount <= request.bridge_fee {
            return Err(LockerError::InvalidLock(format!(
                "amount {} not above bridge fee {}",
                request.amount, request.bridge_fee
            )));
        }
        if request.recipient_lockscript.is_empty() {
            return Err(LockerError::InvalidLock("empty recipient lockscript".into()));
        }

        let expected_value = if request.token == NATIVE_TOKEN {
            request.amount
        } else {
            U256::zero()
        };
        if ctx.value != expected_value {
            return Err(BalanceError::ValueMismatch {
                expected: expected_value,
                got: ctx.value,
            }
            .into());
        }

        let locked = self.locked_balance(request.token);
        let new_locked = locked
            .checked_add(request.amount)
            .ok_or(BalanceError::Overflow)?;
        if request.token != NATIVE_TOKEN {
            self.balances
                .transfer_in(request.token, ctx.caller, request.amount)?;
        }

        let record = LockRecord {
            id: self.state.records.len() as u64,
            sender: ctx.caller,
            token: request.token,
            amount: request.amount,
            bridge_fee: request.bridge_fee,
            recipient_lockscript: request.recipient_lockscript,
            replay_resist_outpoint: request.replay_resist_outpoint,
            sudt_extra_data: request.sudt_extra_data,
        };
        self.state.locked.insert(record.token, new_locked);
        self.state.records.push(record.clone());
        self.events.push(LockerEvent::Locked(record.clone()));

        info!(
            id = record.id,
            token = %to_hex(&record.token),
            sender = %to_hex(&record.sender),
            amount = %record.amount,
            "[fb-05] Locked"
        );
        Ok(record)
    }

    // =========================================================================
    // UNLOCK
    // =========================================================================

    /// Release value for a batch of burn proofs, all or nothing.
    pub fn unlock<S: CkbSpvSource>(
        &mut self,
        ctx: CallContext,
        spv: &S,
        burn_proofs: &[BurnProof],
    ) -> Result<Vec<UnlockRecord>, LockerError> {
        self.require_trusted(spv)?;
        let verifier = SpvVerifier::new(spv.header_store());

        self.apply_batch(|scratch| {
            let mut unlocked = Vec::with_capacity(burn_proofs.len());
            for proof in burn_proofs {
                let tx_proof = CkbHistoryTxProofView::from_slice(&proof.tx_proof)?;
                let authenticated = match &proof.history_root_proof {
                    Some(bytes) => {
                        let root_proof = CkbHistoryTxRootProofView::from_slice(bytes)?;
                        let trusted = verifier.verify_history_root_proof(&root_proof).ok_or(
                            ProofError::RangeNotTrusted {
                                block_number: tx_proof.block_number(),
                            },
                        )?;
                        Some(trusted)
                    }
                    None => None,
                };
                prove_burn(&verifier, &tx_proof, authenticated.as_deref())?;
                unlocked.push(scratch.release(ctx, &tx_proof)?);
            }
            Ok(unlocked)
        })
    }

    /// Release value for an encoded `CkbUnlockTokenParam`, all or nothing.
    ///
    /// The shared history root proof is checked once; each tx proof then
    /// takes the direct path if its block is retained, else the aggregated
    /// path through the authenticated tiny headers.
    pub fn unlock_param<S: CkbSpvSource>(
        &mut self,
        ctx: CallContext,
        spv: &S,
        param: &[u8],
    ) -> Result<Vec<UnlockRecord>, LockerError> {
        self.require_trusted(spv)?;
        let verifier = SpvVerifier::new(spv.header_store());
        let param = CkbUnlockTokenParamView::from_slice(param)?;
        let authenticated = verifier.verify_history_root_proof(param.history_tx_root_proof());

        self.apply_batch(|scratch| {
            let mut unlocked = Vec::with_capacity(param.tx_proofs_len());
            for index in 0..param.tx_proofs_len() {
                let tx_proof = param.tx_proof(index)?;
                prove_burn(&verifier, &tx_proof, authenticated.as_deref())?;
                unlocked.push(scratch.release(ctx, &tx_proof)?);
            }
            Ok(unlocked)
        })
    }

    fn require_trusted<S: CkbSpvSource>(&self, spv: &S) -> Result<(), LockerError> {
        if spv.spv_address() != self.state.ckb_spv {
            warn!(
                supplied = %to_hex(&spv.spv_address()),
                "[fb-05] Unlock against untrusted spv source"
            );
            return Err(ProofError::UntrustedSpvSource {
                expected: to_hex(&self.state.ckb_spv),
                got: to_hex(&spv.spv_address()),
            }
            .into());
        }
        Ok(())
    }

    /// Run `batch` on a scratch copy; commit only on success.
    fn apply_batch<F>(&mut self, batch: F) -> Result<Vec<UnlockRecord>, LockerError>
    where
        F: FnOnce(&mut Self) -> Result<Vec<UnlockRecord>, LockerError>,
    {
        let mut scratch = self.clone();
        match batch(&mut scratch) {
            Ok(unlocked) => {
                info!(count = unlocked.len(), "[fb-05] Unlock batch committed");
                *self = scratch;
                Ok(unlocked)
            }
            Err(e) => {
                warn!(error = %e, "[fb-05] Unlock batch rejected");
                Err(e)
            }
        }
    }

    /// Decode a proven burn, mark it used and pay out.
    fn release(
        &mut self,
        ctx: CallContext,
        tx_proof: &CkbHistoryTxProofView<'_>,
    ) -> Result<UnlockRecord, LockerError> {
        let raw = tx_proof.raw_transaction()?;
        let tx_hash = raw.calc_tx_hash();
        let data = self.decode_burn(&raw)?;

        if !self.state.used_proofs.insert(tx_hash) {
            return Err(ProofError::ProofReplayed(to_hex(&tx_hash)).into());
        }

        let amount = U256::from(data.bridge_amount);
        let fee = U256::from(data.bridge_fee);
        let token = data.token_address;
        let locked = self.locked_balance(token);
        let remaining = locked
            .checked_sub(amount)
            .ok_or_else(|| BalanceError::InsufficientLocked {
                token: to_hex(&token),
                needed: amount,
                locked,
            })?;
        self.state.locked.insert(token, remaining);

        let received = amount - fee;
        let fee_receiver = self.fee_sink.unwrap_or(ctx.caller);
        self.balances
            .transfer_out(token, data.recipient_address, received)?;
        if !fee.is_zero() {
            self.balances.transfer_out(token, fee_receiver, fee)?;
        }

        let record = UnlockRecord {
            burn_tx_hash: tx_hash,
            block_number: tx_proof.block_number(),
            token,
            recipient: data.recipient_address,
            received_amount: received,
            bridge_fee: fee,
            fee_receiver,
        };
        self.events.push(LockerEvent::Unlocked(record.clone()));
        info!(
            tx = %to_hex(&tx_hash),
            token = %to_hex(&token),
            recipient = %to_hex(&record.recipient),
            amount = %received,
            "[fb-05] Unlocked"
        );
        Ok(record)
    }

    fn decode_burn(&self, raw: &RawTransactionView<'_>) -> Result<RecipientCellData, LockerError> {
        let malformed = |e: fb_01_view_parsers::ViewError| ProofError::MalformedBurnTx(e.to_string());

        let output = raw.output(0).map_err(malformed)?;
        let typescript = output
            .type_script()
            .ok_or(ProofError::WrongRecipientTypescript)?;
        if typescript.code_hash() != self.recipient_typescript.code_hash
            || typescript.hash_type() != self.recipient_typescript.hash_type
        {
            return Err(ProofError::WrongRecipientTypescript.into());
        }

        let data = RecipientCellData::from_slice(raw.output_data(0).map_err(malformed)?)
            .map_err(malformed)?;
        if data.lock_contract_address != self.address {
            return Err(ProofError::WrongLockContract(to_hex(&data.lock_contract_address)).into());
        }
        if data.bridge_fee >= data.bridge_amount {
            return Err(ProofError::FeeNotBelowAmount {
                amount: data.bridge_amount,
                fee: data.bridge_fee,
            }
            .into());
        }
        Ok(data)
    }

    // =========================================================================
    // GOVERNANCE
    // =========================================================================

    /// Point the locker at a new SPV source.
    pub fn set_new_ckb_spv(
        &mut self,
        new_spv_address: Address,
        nonce: u64,
        signatures: &[u8],
    ) -> Result<(), LockerError> {
        let struct_hash = set_new_ckb_spv_hash(&new_spv_address, nonce);
        self.state
            .guard
            .authorize_nonced(NonceAction::SetNewCkbSpv, nonce, &struct_hash, signatures)?;
        info!(
            old = %to_hex(&self.state.ckb_spv),
            new = %to_hex(&new_spv_address),
            "[fb-05] CKB spv source rotated"
        );
        self.state.ckb_spv = new_spv_address;
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Locker address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Locked balance of `token`.
    pub fn locked_balance(&self, token: Address) -> U256 {
        self.state.locked.get(&token).copied().unwrap_or_default()
    }

    /// Lock record by id.
    pub fn lock_record(&self, id: u64) -> Option<&LockRecord> {
        usize::try_from(id).ok().and_then(|i| self.state.records.get(i))
    }

    /// True if the burn tx has been unlocked.
    pub fn is_proof_used(&self, burn_tx_hash: &Hash) -> bool {
        self.state.used_proofs.contains(burn_tx_hash)
    }

    /// Trusted SPV source.
    pub fn ckb_spv(&self) -> Address {
        self.state.ckb_spv
    }

    /// Expected nonce of the next `set_new_ckb_spv`.
    pub fn current_set_new_ckb_spv_nonce(&self) -> u64 {
        self.state.guard.current_nonce(NonceAction::SetNewCkbSpv)
    }

    /// EIP-712 domain separator.
    pub fn domain_separator(&self) -> Hash {
        self.state.guard.domain_separator()
    }

    /// Digest validators sign for `struct_hash` under this domain.
    pub fn digest(&self, struct_hash: &Hash) -> Hash {
        self.state.guard.digest(struct_hash)
    }

    /// Active validator set.
    pub fn validator_set(&self) -> &ValidatorSet {
        self.state.guard.validator_set()
    }

    /// Persisted state.
    pub fn state(&self) -> &LockerState {
        &self.state
    }

    /// Balance service.
    pub fn balances(&self) -> &B {
        &self.balances
    }

    /// Drain emitted events.
    pub fn take_events(&mut self) -> Vec<LockerEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Inclusion of a burn tx, direct or aggregated.
fn prove_burn(
    verifier: &SpvVerifier<'_>,
    tx_proof: &CkbHistoryTxProofView<'_>,
    authenticated: Option<&[TinyHeader]>,
) -> Result<(), LockerError> {
    let block_number = tx_proof.block_number();

    let proven = if verifier.store().is_retained(block_number) {
        verifier.verify_retained_history_tx(tx_proof)?
    } else {
        let tiny = authenticated
            .and_then(|headers| headers.iter().find(|h| h.number == block_number))
            .ok_or(ProofError::RangeNotTrusted { block_number })?;
        verifier.verify_history_tx(tx_proof, &tiny.tx_root)?
    };

    if !proven {
        warn!(block_number, "[fb-05] Burn tx inclusion not proven");
        return Err(ProofError::NotProven { block_number }.into());
    }
    Ok(())
}
