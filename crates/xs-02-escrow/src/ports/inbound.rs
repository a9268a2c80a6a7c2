//! # Inbound Ports
//!
//! API exposed by the escrow subsystem to the order layer and to relayers.

use shared_types::{Address, Amount, ChainId, EscrowSide, Hash};

use crate::domain::{EscrowError, EscrowRecord, Immutables, Secret};

/// Result of an escrow creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowReceipt {
    /// Deterministic address of the new record.
    pub address: Address,
    /// Immutables as stored, with `deployed_at` stamped.
    pub immutables: Immutables,
    /// Part of the attached payment above the safety deposit.
    pub refund: Amount,
}

/// Escrow API - inbound port.
pub trait EscrowApi: Send + Sync {
    /// Safety deposit required for `amount` settling on `dst_chain_id`:
    /// the larger of the chain's and the factory's minimum.
    fn required_safety_deposit(&self, dst_chain_id: ChainId, amount: Amount) -> Result<Amount, EscrowError>;

    /// Deterministic address of `immutables` on the given side.
    fn address_of(&self, immutables: &Immutables, is_source: bool) -> Result<Address, EscrowError>;

    /// Open the source escrow of an order settling on `dst_chain_id`.
    fn create_src_escrow(
        &self,
        caller: &Address,
        immutables: Immutables,
        dst_chain_id: ChainId,
    ) -> Result<EscrowReceipt, EscrowError>;

    /// Open the destination escrow, taking the safety deposit from
    /// `caller` out of `payment`.
    fn create_dst_escrow(
        &self,
        caller: &Address,
        immutables: Immutables,
        dst_chain_id: ChainId,
        src_cancellation_timestamp: u64,
        payment: Amount,
    ) -> Result<EscrowReceipt, EscrowError>;

    /// Fund an escrow.
    fn lock(&self, caller: &Address, escrow: &Address) -> Result<(), EscrowError>;

    /// Private claim by the taker.
    fn claim(&self, caller: &Address, escrow: &Address, secret: &Secret) -> Result<(), EscrowError>;

    /// Public claim by anyone.
    fn public_claim(&self, caller: &Address, escrow: &Address, secret: &Secret) -> Result<(), EscrowError>;

    /// Refund to the depositor.
    fn cancel(&self, caller: &Address, escrow: &Address) -> Result<(), EscrowError>;

    /// Public refund of a source escrow.
    fn public_cancel(&self, caller: &Address, escrow: &Address) -> Result<(), EscrowError>;

    /// Snapshot of the record at `escrow`.
    fn escrow(&self, escrow: &Address) -> Option<EscrowRecord>;

    /// Snapshot of an order's escrow on `side`.
    fn escrow_for_order(&self, order_hash: &Hash, side: EscrowSide) -> Option<EscrowRecord>;
}
