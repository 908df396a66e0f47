//! # Outbound Ports
//!
//! What the locker needs from its host: asset movement and a trusted view
//! of the CKB header chain.

use fb_02_header_store::HeaderStore;
use fb_04_header_ingestion::HeaderIngestionService;
use primitive_types::U256;
use shared_types::Address;

use crate::domain::BalanceError;

/// External balance service.
///
/// The locker's own holdings are tracked by the locker; implementations
/// only move value across its boundary.
pub trait BalanceService {
    /// Pull `amount` of `token` from `from` into the locker.
    fn transfer_in(&mut self, token: Address, from: Address, amount: U256) -> Result<(), BalanceError>;

    /// Pay `amount` of `token` from the locker to `to`.
    fn transfer_out(&mut self, token: Address, to: Address, amount: U256) -> Result<(), BalanceError>;
}

/// A CKB SPV source the locker can be pointed at.
pub trait CkbSpvSource {
    /// Address the source is registered under.
    fn spv_address(&self) -> Address;

    /// Header chain the source vouches for.
    fn header_store(&self) -> &HeaderStore;
}

impl CkbSpvSource for HeaderIngestionService {
    fn spv_address(&self) -> Address {
        self.address()
    }

    fn header_store(&self) -> &HeaderStore {
        HeaderIngestionService::header_store(self)
    }
}
