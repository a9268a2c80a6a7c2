//! # Execution Parameter Codecs
//!
//! Binary encodings for the adapter-specific `execution_params` blob.
//! All payloads use bincode with fixed-width integers and a size limit.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::Hash;

use crate::domain::{ChainError, ChainSpecificParams};

/// Upper bound on any decoded parameter blob.
pub const MAX_PARAMS_BYTES: u64 = 64 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_PARAMS_BYTES)
}

/// Encode/decode for parameter payloads.
pub trait ExecutionParamCodec: Serialize + DeserializeOwned {
    /// Encode to bytes.
    fn encode(&self) -> Result<Vec<u8>, ChainError> {
        options()
            .serialize(self)
            .map_err(|e| ChainError::Encoding(e.to_string()))
    }

    /// Decode from bytes, rejecting trailing garbage.
    fn decode(bytes: &[u8]) -> Result<Self, ChainError> {
        options()
            .reject_trailing_bytes()
            .deserialize(bytes)
            .map_err(|e| ChainError::InvalidParams(format!("undecodable params: {e}")))
    }
}

impl ExecutionParamCodec for ChainSpecificParams {}

// =============================================================================
// BITCOIN
// =============================================================================

/// How the refund branch of the HTLC script is time-locked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockTimeKind {
    /// `OP_CHECKLOCKTIMEVERIFY` against a block height or timestamp.
    Absolute,
    /// `OP_CHECKSEQUENCEVERIFY` relative to confirmation.
    Relative,
}

/// HTLC parameters for Bitcoin-family chains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcoinHtlcParams {
    /// SHA-256 hashlock shared with the EVM escrows.
    pub hashlock: Hash,
    /// Resolver's pubkey hash for the refund branch.
    pub refund_pubkey_hash: [u8; 20],
    /// Lock time value (height, timestamp or relative blocks).
    pub timelock: u32,
    /// Absolute or relative lock.
    pub timelock_kind: LockTimeKind,
    /// Fee rate in satoshi per byte.
    pub fee_rate: u64,
}

impl ExecutionParamCodec for BitcoinHtlcParams {}

// =============================================================================
// COSMOS
// =============================================================================

/// A coin attached to a CosmWasm execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosCoin {
    /// Bank denom, e.g. `untrn`.
    pub denom: String,
    /// Amount in the denom's base unit.
    pub amount: u128,
}

/// CosmWasm execute parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosExecutionParams {
    /// Escrow contract address (bech32).
    pub contract_address: String,
    /// JSON execute message.
    pub msg: Vec<u8>,
    /// Funds sent with the message.
    pub funds: Vec<CosmosCoin>,
    /// Gas limit for the transaction.
    pub gas_limit: u64,
}

impl ExecutionParamCodec for CosmosExecutionParams {}

// =============================================================================
// NEAR
// =============================================================================

/// NEAR function call parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearExecutionParams {
    /// Escrow contract account.
    pub contract_id: String,
    /// Method to call.
    pub method_name: String,
    /// JSON arguments.
    pub args: Vec<u8>,
    /// Attached deposit in yoctoNEAR.
    pub attached_deposit: u128,
    /// Prepaid gas.
    pub gas: u64,
}

impl ExecutionParamCodec for NearExecutionParams {}
