//! # Bridge Harness
//!
//! One ingestion service, one locker trusting it, and the validator keys
//! that sign for both. The harness keeps every header it has produced so
//! tests can summarize ranges after the store has pruned them.

use fb_01_view_parsers::{pack_header_vec, Header, RawTransaction, RecipientCellData};
use fb_02_header_store::test_helpers::{extend, genesis};
use fb_02_header_store::{BatchOutcome, HeaderStore};
use fb_04_header_ingestion::test_helpers::{sign_blob, validator_keys};
use fb_04_header_ingestion::{
    add_headers_hash, add_history_tx_root_hash, HeaderIngestionApi, HeaderIngestionService,
    IngestionConfig, IngestionError,
};
use fb_05_token_locker::test_helpers::{burn_tx, history_root, tiny_headers, TxBlock};
use fb_05_token_locker::{InMemoryBalanceLedger, LockerConfig, TokenLocker};
use k256::ecdsa::SigningKey;
use primitive_types::U256;
use shared_types::{Address, BlockNumber, Hash, TinyHeader};

/// Block number of the bootstrap header.
pub const INIT_BLOCK: BlockNumber = 100;

/// Holder of locked funds.
pub const ALICE: Address = [0xA1; 20];
/// Recipient of unlocked funds.
pub const BOB: Address = [0xB0; 20];
/// Caller submitting unlock proofs.
pub const RELAYER: Address = [0x7E; 20];
/// An ERC20 token.
pub const ERC20: Address = [0xE2; 20];
/// Initial ERC20 balance of `ALICE`.
pub const ALICE_ERC20: u64 = 10_000;

/// Ingestion service, locker and validator keys wired together.
pub struct Bridge {
    /// Validator signing keys, in set order.
    pub keys: Vec<SigningKey>,
    /// Header ingestion (and SPV source).
    pub chain: HeaderIngestionService,
    /// Token locker trusting `chain`.
    pub locker: TokenLocker<InMemoryBalanceLedger>,
    /// Canonical headers from `INIT_BLOCK` to the tip.
    pub headers: Vec<Header>,
    threshold: usize,
}

impl Bridge {
    /// `validators`-of-`threshold` multisig, store thresholds `finalized`/`canonical`.
    pub fn new(validators: usize, threshold: u64, finalized: u64, canonical: u64) -> Self {
        let (keys, set) = validator_keys(validators, threshold);
        let members = set.validators().to_vec();

        let mut chain = HeaderIngestionService::new(
            IngestionConfig::for_testing().with_validators(members.clone(), threshold),
        )
        .expect("ingestion config");
        let root = genesis(INIT_BLOCK);
        chain
            .init_with_header(&root.to_bytes(), root.calc_hash(), finalized, canonical)
            .expect("bootstrap header");

        let mut ledger = InMemoryBalanceLedger::new();
        ledger.credit(ERC20, ALICE, U256::from(ALICE_ERC20));
        let locker = TokenLocker::new(
            LockerConfig::for_testing().with_validators(members, threshold),
            ledger,
        )
        .expect("locker config");

        Self {
            keys,
            chain,
            locker,
            headers: vec![root],
            threshold: threshold as usize,
        }
    }

    /// 3-of-2 validators, thresholds 3/6.
    pub fn standard() -> Self {
        Self::new(3, 2, 3, 6)
    }

    /// Header store behind the ingestion service.
    pub fn store(&self) -> &HeaderStore {
        self.chain.header_store()
    }

    /// Current tip header.
    pub fn tip(&self) -> &Header {
        &self.headers[self.headers.len() - 1]
    }

    /// Canonical header at `number`, as the harness produced it.
    pub fn header_at(&self, number: BlockNumber) -> &Header {
        &self.headers[(number - INIT_BLOCK) as usize]
    }

    /// Threshold signatures of the current validators over `digest`.
    pub fn sign(&self, digest: &Hash) -> Vec<u8> {
        sign_blob(digest, &self.keys[..self.threshold])
    }

    /// Submit a signed header run.
    pub fn try_ingest(&mut self, headers: &[Header]) -> Result<BatchOutcome, IngestionError> {
        let data = pack_header_vec(headers);
        let sigs = self.sign(&self.chain.digest(&add_headers_hash(&data)));
        let outcome = self.chain.add_headers(&data, &sigs)?;

        self.headers.truncate((outcome.start - INIT_BLOCK) as usize);
        self.headers.extend_from_slice(headers);
        Ok(outcome)
    }

    /// Submit a signed header run that must be accepted.
    pub fn ingest(&mut self, headers: &[Header]) -> BatchOutcome {
        self.try_ingest(headers).expect("header batch accepted")
    }

    /// Extend the tip by `count` empty headers.
    pub fn extend(&mut self, count: usize) -> Vec<Header> {
        let run = extend(self.tip(), count, 0);
        self.ingest(&run);
        run
    }

    /// Ingest one block carrying `txs`.
    pub fn ingest_block(&mut self, txs: Vec<RawTransaction>) -> TxBlock {
        let block = TxBlock::new(self.tip(), txs);
        self.ingest(std::slice::from_ref(&block.header));
        block
    }

    /// Tiny headers of `[start, end]`.
    pub fn tiny(&self, start: BlockNumber, end: BlockNumber) -> Vec<TinyHeader> {
        let from = (start - INIT_BLOCK) as usize;
        let to = (end - INIT_BLOCK) as usize;
        tiny_headers(&self.headers[from..=to])
    }

    /// Submit a signed history root over `[start, end]`.
    pub fn try_summarize(
        &mut self,
        start: BlockNumber,
        end: BlockNumber,
    ) -> Result<Vec<TinyHeader>, IngestionError> {
        let tiny = self.tiny(start, end);
        let root = history_root(&tiny);
        let sigs = self.sign(&self.chain.digest(&add_history_tx_root_hash(start, end, &root)));
        self.chain.add_history_tx_root(start, end, root, &sigs)?;
        Ok(tiny)
    }

    /// Summarize `[start, end]`, which must be accepted.
    pub fn summarize(&mut self, start: BlockNumber, end: BlockNumber) -> Vec<TinyHeader> {
        self.try_summarize(start, end).expect("history root accepted")
    }

    /// A burn of `amount` (fee included) paying `BOB`, addressed to the locker.
    pub fn burn(&self, token: Address, amount: u128, fee: u128, salt: u32) -> RawTransaction {
        let data = RecipientCellData {
            recipient_address: BOB,
            token_address: token,
            lock_contract_address: self.locker.address(),
            bridge_amount: amount,
            bridge_fee: fee,
        };
        burn_tx(&LockerConfig::for_testing().recipient_typescript, &data, salt)
    }

    /// Ledger balance of `holder`.
    pub fn balance(&self, token: Address, holder: Address) -> U256 {
        self.locker.balances().balance_of(token, holder)
    }
}
