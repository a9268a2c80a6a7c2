//! # Integration Tests
//!
//! Cross-subsystem flows over one shared ledger, clock and event bus:
//!
//! ```text
//! OrderCoordinator (xs-03) ──→ EscrowFactory (xs-02) ──→ Ledger
//!          │                          │
//!          └────→ ChainRegistry (xs-01) ←──┘
//! ```

#[cfg(test)]
mod support;

#[cfg(test)]
mod event_flows;
#[cfg(test)]
mod reentrancy;
#[cfg(test)]
mod registry_isolation;
#[cfg(test)]
mod swap_flows;
