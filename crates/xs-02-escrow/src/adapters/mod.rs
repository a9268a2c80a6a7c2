//! # Adapters Layer
//!
//! Implementations of the outbound ports.

mod ledger;

pub use ledger::InMemoryLedger;
