//! # Domain Entities
//!
//! Chain metadata, opaque per-order chain parameters and validation results.

use serde::{Deserialize, Serialize};
use shared_types::{Amount, ChainId};

use super::errors::ChainError;

/// Static description of a destination chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Registry key.
    pub chain_id: ChainId,
    /// Human readable name.
    pub name: String,
    /// Native asset symbol.
    pub symbol: String,
    /// Inactive chains are registered but not routable.
    pub is_active: bool,
    /// Minimum safety deposit as basis points of the order amount.
    pub min_safety_deposit_bps: u16,
    /// Suggested cancellation horizon for new orders.
    pub default_timelock_seconds: u64,
}

/// Chain-specific order parameters.
///
/// Opaque to the escrow engine; only the adapter for `dst_chain_id`
/// interprets `execution_params`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSpecificParams {
    /// UTF-8 destination address in the chain's native format.
    pub destination_address: Vec<u8>,
    /// Adapter-specific encoded parameters.
    pub execution_params: Vec<u8>,
    /// Gas (or transaction size for UTXO chains). Zero means "use default".
    pub estimated_gas: u64,
    /// Free-form bytes carried through to metadata.
    pub additional_data: Vec<u8>,
}

impl ChainSpecificParams {
    /// Build params for a textual destination address.
    pub fn new(destination_address: &str, execution_params: Vec<u8>) -> Self {
        Self {
            destination_address: destination_address.as_bytes().to_vec(),
            execution_params,
            estimated_gas: 0,
            additional_data: Vec::new(),
        }
    }

    /// Set the gas estimate.
    pub fn with_estimated_gas(mut self, estimated_gas: u64) -> Self {
        self.estimated_gas = estimated_gas;
        self
    }

    /// Attach additional data.
    pub fn with_additional_data(mut self, data: Vec<u8>) -> Self {
        self.additional_data = data;
        self
    }

    /// Destination address as text.
    pub fn destination_str(&self) -> Result<&str, ChainError> {
        std::str::from_utf8(&self.destination_address)
            .map_err(|_| ChainError::InvalidAddress("destination is not UTF-8".into()))
    }
}

/// Outcome of adapter-level order validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the order can be executed on the destination chain.
    pub is_valid: bool,
    /// Reason for rejection; empty when valid.
    pub error_message: String,
    /// Estimated execution cost in the common value unit.
    pub estimated_cost: Amount,
}

impl ValidationResult {
    /// A passing result.
    pub fn ok(estimated_cost: Amount) -> Self {
        Self {
            is_valid: true,
            error_message: String::new(),
            estimated_cost,
        }
    }

    /// A failing result.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: message.into(),
            estimated_cost: 0,
        }
    }
}
