//! # Destination Chain Adapter Port
//!
//! Uniform interface over heterogeneous destination chains.

use shared_types::{Address, Amount};
use std::sync::Arc;

use crate::domain::{min_safety_deposit, ChainError, ChainInfo, ChainSpecificParams, ValidationResult};

/// Chain-specific validation, costing and formatting.
///
/// Implementations are immutable once registered; replacing behavior means
/// registering a new adapter through `ChainRegistry::update`.
pub trait DestinationChainAdapter: Send + Sync {
    /// Static chain metadata.
    fn chain_info(&self) -> &ChainInfo;

    /// Whether `address` (UTF-8 bytes) is a valid recipient on this chain.
    fn validate_destination_address(&self, address: &[u8]) -> bool;

    /// Token identifier formats this chain understands.
    fn supported_token_formats(&self) -> Vec<String>;

    /// Chain-native identifier for a token.
    fn format_token_identifier(
        &self,
        token: &Address,
        symbol: &str,
        is_native: bool,
    ) -> Result<Vec<u8>, ChainError>;

    /// `floor(amount * min_safety_deposit_bps / 10000)`.
    fn calculate_min_safety_deposit(&self, amount: Amount) -> Amount {
        min_safety_deposit(amount, self.chain_info().min_safety_deposit_bps)
    }

    /// Estimated cost of executing the order on this chain, in the common unit.
    fn estimate_execution_cost(
        &self,
        params: &ChainSpecificParams,
        amount: Amount,
    ) -> Result<Amount, ChainError>;

    /// Full pre-flight check of an order's chain parameters.
    fn validate_order_params(&self, params: &ChainSpecificParams, amount: Amount) -> ValidationResult;

    /// Capability check, e.g. `"htlc"` or `"ibc"`.
    fn supports_feature(&self, feature: &str) -> bool;

    /// JSON metadata describing how the order executes on this chain.
    fn order_metadata(&self, params: &ChainSpecificParams) -> Result<Vec<u8>, ChainError>;
}

/// Shared adapter handle.
pub type SharedAdapter = Arc<dyn DestinationChainAdapter>;
