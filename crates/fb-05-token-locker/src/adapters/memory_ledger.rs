//! In-memory balance ledger.

use std::collections::BTreeMap;

use primitive_types::U256;
use shared_types::{to_hex, Address};

use crate::domain::BalanceError;
use crate::ports::BalanceService;

/// Per-(token, holder) balances outside the locker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryBalanceLedger {
    balances: BTreeMap<(Address, Address), U256>,
}

impl InMemoryBalanceLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` of `token` to `holder`.
    pub fn credit(&mut self, token: Address, holder: Address, amount: U256) {
        let slot = self.balances.entry((token, holder)).or_default();
        *slot = slot.saturating_add(amount);
    }

    /// Balance of `holder` in `token`.
    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }
}

impl BalanceService for InMemoryBalanceLedger {
    fn transfer_in(&mut self, token: Address, from: Address, amount: U256) -> Result<(), BalanceError> {
        let available = self.balance_of(token, from);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| BalanceError::InsufficientBalance {
                token: to_hex(&token),
                holder: to_hex(&from),
                needed: amount,
                available,
            })?;
        self.balances.insert((token, from), remaining);
        Ok(())
    }

    fn transfer_out(&mut self, token: Address, to: Address, amount: U256) -> Result<(), BalanceError> {
        let current = self.balance_of(token, to);
        let updated = current.checked_add(amount).ok_or(BalanceError::Overflow)?;
        self.balances.insert((token, to), updated);
        Ok(())
    }
}
