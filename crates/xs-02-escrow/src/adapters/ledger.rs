//! In-memory ledger adapter.
//!
//! Implements the `Ledger` port with a balance table behind one lock.

use parking_lot::RwLock;
use shared_types::{short_hex, Address, Amount};
use std::collections::HashMap;
use tracing::debug;

use crate::domain::{LedgerError, Transfer};
use crate::ports::Ledger;

/// In-memory balance table keyed by `(account, token)`.
#[derive(Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<(Address, Address), Amount>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` out of thin air.
    pub fn mint(&self, account: Address, token: Address, amount: Amount) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let entry = balances.entry((account, token)).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }
}

impl Ledger for InMemoryLedger {
    fn balance_of(&self, account: &Address, token: &Address) -> Amount {
        self.balances.read().get(&(*account, *token)).copied().unwrap_or(0)
    }

    fn execute(&self, transfers: &[Transfer]) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let mut staged: HashMap<(Address, Address), Amount> = HashMap::new();

        for t in transfers {
            let from_key = (t.from, t.token);
            let available = staged
                .get(&from_key)
                .or_else(|| balances.get(&from_key))
                .copied()
                .unwrap_or(0);
            let remaining = available
                .checked_sub(t.amount)
                .ok_or(LedgerError::InsufficientBalance {
                    account: t.from,
                    available,
                    needed: t.amount,
                })?;
            staged.insert(from_key, remaining);

            let to_key = (t.to, t.token);
            let current = staged
                .get(&to_key)
                .or_else(|| balances.get(&to_key))
                .copied()
                .unwrap_or(0);
            staged.insert(to_key, current.checked_add(t.amount).ok_or(LedgerError::Overflow)?);
        }

        for (key, amount) in staged {
            balances.insert(key, amount);
        }
        debug!(
            count = transfers.len(),
            first_from = %transfers.first().map(|t| short_hex(&t.from)).unwrap_or_default(),
            "[xs-02] Ledger batch applied"
        );
        Ok(())
    }
}
