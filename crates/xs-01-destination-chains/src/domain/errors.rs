//! # Domain Errors
//!
//! Error types for destination chain handling.

use shared_types::ChainId;
use thiserror::Error;

/// Destination chain error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Caller is not the registry owner.
    #[error("Unauthorized: caller is not the registry owner")]
    Unauthorized,

    /// A chain with this id already has an adapter.
    #[error("Chain already registered: {0}")]
    ChainAlreadyRegistered(ChainId),

    /// No active adapter for this chain.
    #[error("Chain not supported: {0}")]
    ChainNotSupported(ChainId),

    /// Adapter metadata is unusable.
    #[error("Invalid adapter: {0}")]
    InvalidAdapter(String),

    /// Adapter reports a different chain id than the one it is registered under.
    #[error("Chain id mismatch: registering {expected}, adapter reports {actual}")]
    ChainIdMismatch {
        /// Chain id passed to the registry
        expected: ChainId,
        /// Chain id reported by the adapter
        actual: ChainId,
    },

    /// Address failed chain-specific validation.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Execution parameters failed validation.
    #[error("Invalid execution params: {0}")]
    InvalidParams(String),

    /// Token is not representable on the chain.
    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    /// Binary or JSON encoding failure.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Arithmetic overflow in cost computation.
    #[error("Arithmetic overflow")]
    Overflow,
}
