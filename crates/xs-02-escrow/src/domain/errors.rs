//! # Domain Errors
//!
//! Error types for escrow records and the escrow factory.

use shared_types::{Address, Amount};
use thiserror::Error;
use xs_01_destination_chains::ChainError;

use super::entities::EscrowState;
use super::timelocks::TimelockStage;

/// Secret type (32-byte SHA-256 preimage).
pub type Secret = [u8; 32];

/// Ledger failures reported by the value port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Account cannot cover a transfer.
    #[error("Insufficient balance: account 0x{} holds {available}, needs {needed}", hex::encode(.account))]
    InsufficientBalance {
        /// Debited account.
        account: Address,
        /// Balance at the time of the batch.
        available: Amount,
        /// Total required by the batch.
        needed: Amount,
    },

    /// Crediting would overflow the account balance.
    #[error("Balance overflow")]
    Overflow,

    /// Backend refused the batch.
    #[error("Ledger rejected transfer: {0}")]
    Rejected(String),
}

/// Escrow error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// Record was already initialized.
    #[error("Escrow already initialized")]
    AlreadyInitialized,

    /// Operation is not allowed in the current state.
    #[error("Cannot {operation} escrow in state {state}")]
    InvalidState {
        /// Current state.
        state: EscrowState,
        /// Attempted operation.
        operation: &'static str,
    },

    /// `sha256(secret)` does not match the hashlock.
    #[error("Invalid secret")]
    InvalidSecret,

    /// The gating stage has not started yet.
    #[error("Timelock not reached: {stage} opens at {opens_at}")]
    TimelockNotReached {
        /// Gating stage.
        stage: TimelockStage,
        /// Absolute opening time.
        opens_at: u64,
    },

    /// The side's cancellation stage has started.
    #[error("Timelock expired: {stage} started at {expired_at}")]
    TimelockExpired {
        /// Cancellation stage.
        stage: TimelockStage,
        /// Absolute expiry time.
        expired_at: u64,
    },

    /// Caller is not allowed to perform the operation.
    #[error("Unauthorized caller")]
    Unauthorized,

    /// An escrow already occupies the deterministic address.
    #[error("Escrow already exists at 0x{}", hex::encode(.0))]
    EscrowAlreadyExists(Address),

    /// No escrow at the address.
    #[error("Escrow not found at 0x{}", hex::encode(.0))]
    EscrowNotFound(Address),

    /// Safety deposit or attached payment below the minimum.
    #[error("Safety deposit too low: required {required}, provided {provided}")]
    SafetyDepositTooLow {
        /// Minimum required.
        required: Amount,
        /// Amount offered.
        provided: Amount,
    },

    /// Largest stage offset exceeds the configured span.
    #[error("Timelock too long: {span}s exceeds maximum {max}s")]
    TimelockTooLong {
        /// Largest stage offset.
        span: u32,
        /// Configured maximum.
        max: u32,
    },

    /// A stage opens before the stage that must precede it.
    #[error("Timelock order violated: {later} at {later_offset}s is not after {earlier} at {earlier_offset}s")]
    TimelockOrder {
        /// Stage expected first.
        earlier: TimelockStage,
        /// Its offset.
        earlier_offset: u32,
        /// Stage expected later.
        later: TimelockStage,
        /// Its offset.
        later_offset: u32,
    },

    /// Order hash, hashlock or amount is zero.
    #[error("Invalid immutables: {0}")]
    InvalidImmutables(&'static str),

    /// Destination cancellation falls after source cancellation.
    #[error("Invalid creation time: dst cancellation {dst_cancellation} after src cancellation {src_cancellation}")]
    InvalidCreationTime {
        /// Absolute destination cancellation.
        dst_cancellation: u64,
        /// Absolute source cancellation.
        src_cancellation: u64,
    },

    /// Factory is paused.
    #[error("Escrow creation is paused")]
    Paused,

    /// Destination escrows have no public cancellation stage.
    #[error("Destination escrows have no public cancellation")]
    NoPublicCancellation,

    /// Safety deposit rate outside `1..=10000`.
    #[error("Invalid safety deposit bps: {0}")]
    InvalidSafetyDepositBps(u16),

    /// Timestamp or amount arithmetic overflowed.
    #[error("Arithmetic overflow")]
    Overflow,

    /// Configuration could not be loaded.
    #[error("Invalid config: {0}")]
    Config(String),

    /// Registry lookup failed.
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// Value transfer failed; the record was rolled back.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
