//! # Domain Errors

use shared_types::{Address, Hash};
use thiserror::Error;
use xs_01_destination_chains::ChainError;
use xs_02_escrow::EscrowError;

use super::entities::OrderStatus;

/// Order coordinator error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Caller may not perform the operation.
    #[error("Unauthorized caller")]
    Unauthorized,

    /// Resolver is not on the allow-list.
    #[error("Resolver 0x{} is not authorized", hex::encode(.0))]
    ResolverNotAuthorized(Address),

    /// No order with this hash.
    #[error("Order not found: 0x{}", hex::encode(.0))]
    OrderNotFound(Hash),

    /// An identical order already exists.
    #[error("Order already exists: 0x{}", hex::encode(.0))]
    OrderAlreadyExists(Hash),

    /// Operation not allowed in the order's status.
    #[error("Cannot {operation} order in status {status}")]
    InvalidStatus {
        /// Current status.
        status: OrderStatus,
        /// Attempted operation.
        operation: &'static str,
    },

    /// Order failed validation.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Configuration could not be loaded.
    #[error("Invalid config: {0}")]
    Config(String),

    /// Registry lookup failed.
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// Escrow operation failed.
    #[error("Escrow error: {0}")]
    Escrow(#[from] EscrowError),
}
