//! # Outbound Ports
//!
//! Value custody backend used by the factory.

use shared_types::{Address, Amount};
use std::sync::Arc;

use crate::domain::{LedgerError, Transfer};

/// Balance store that moves value between accounts.
///
/// Escrow addresses are ordinary accounts; custody is their balance.
pub trait Ledger: Send + Sync {
    /// Balance of `account` in `token`.
    fn balance_of(&self, account: &Address, token: &Address) -> Amount;

    /// Apply `transfers` in order, all or nothing.
    fn execute(&self, transfers: &[Transfer]) -> Result<(), LedgerError>;
}

/// Ledger shared by the factory and its callers.
pub type SharedLedger = Arc<dyn Ledger>;
