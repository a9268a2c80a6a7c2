//! NEAR adapter (mainnet, testnet).
//!
//! Orders execute as a function call on the escrow contract with prepaid
//! gas; cost is `gas * gas_price` converted from yoctoNEAR.

use serde_json::json;
use shared_types::{Address, Amount};

use crate::codecs::{AddressCodec, ExecutionParamCodec, NearAccountCodec, NearExecutionParams};
use crate::config::NearAdapterConfig;
use crate::domain::{ChainError, ChainInfo, ChainSpecificParams, ValidationResult};
use crate::ports::DestinationChainAdapter;

const FEATURES: &[&str] = &["htlc", "function_call", "nep141", "storage_deposit", "account_model"];

/// Adapter for a NEAR network.
pub struct NearAdapter {
    config: NearAdapterConfig,
    info: ChainInfo,
    codec: NearAccountCodec,
}

fn is_valid_method_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl NearAdapter {
    /// Create an adapter from a validated config.
    pub fn new(config: NearAdapterConfig) -> Result<Self, ChainError> {
        config.validate()?;
        Ok(Self {
            info: config.chain_info(),
            codec: NearAccountCodec,
            config,
        })
    }

    /// Adapter configuration.
    pub fn config(&self) -> &NearAdapterConfig {
        &self.config
    }

    fn gas_of(&self, params: &ChainSpecificParams) -> Result<u64, ChainError> {
        if params.estimated_gas != 0 {
            return Ok(params.estimated_gas);
        }
        Ok(NearExecutionParams::decode(&params.execution_params)?.gas)
    }

    fn cost_for_gas(&self, gas: u64) -> Result<Amount, ChainError> {
        let yocto = Amount::from(gas)
            .checked_mul(Amount::from(self.config.gas_price_yocto))
            .ok_or(ChainError::Overflow)?;
        Ok(yocto / Amount::from(self.config.yocto_per_unit))
    }

    fn check_order(&self, params: &ChainSpecificParams, amount: Amount) -> Result<Amount, ChainError> {
        if amount == 0 {
            return Err(ChainError::InvalidParams("amount must be non-zero".into()));
        }
        self.codec.decode(params.destination_str()?)?;
        let exec = NearExecutionParams::decode(&params.execution_params)?;

        if !NearAccountCodec::is_valid_account_id(&exec.contract_id) {
            return Err(ChainError::InvalidParams(format!(
                "invalid contract account '{}'",
                exec.contract_id
            )));
        }
        if !is_valid_method_name(&exec.method_name) {
            return Err(ChainError::InvalidParams(format!(
                "invalid method name '{}'",
                exec.method_name
            )));
        }
        serde_json::from_slice::<serde_json::Value>(&exec.args)
            .map_err(|e| ChainError::InvalidParams(format!("args are not JSON: {e}")))?;
        if exec.gas == 0 || exec.gas > self.config.max_gas {
            return Err(ChainError::InvalidParams(format!(
                "gas {} outside (0, {}]",
                exec.gas, self.config.max_gas
            )));
        }
        self.cost_for_gas(exec.gas)
    }
}

impl DestinationChainAdapter for NearAdapter {
    fn chain_info(&self) -> &ChainInfo {
        &self.info
    }

    fn validate_destination_address(&self, address: &[u8]) -> bool {
        std::str::from_utf8(address)
            .map(|a| self.codec.validate(a))
            .unwrap_or(false)
    }

    fn supported_token_formats(&self) -> Vec<String> {
        vec!["native".to_string(), "nep141".to_string()]
    }

    fn format_token_identifier(
        &self,
        token: &Address,
        _symbol: &str,
        is_native: bool,
    ) -> Result<Vec<u8>, ChainError> {
        if is_native {
            return Ok(b"near".to_vec());
        }
        // Bridged EVM tokens live under their ETH-implicit account.
        Ok(format!("nep141:0x{}", hex::encode(token)).into_bytes())
    }

    fn estimate_execution_cost(
        &self,
        params: &ChainSpecificParams,
        _amount: Amount,
    ) -> Result<Amount, ChainError> {
        self.cost_for_gas(self.gas_of(params)?)
    }

    fn validate_order_params(&self, params: &ChainSpecificParams, amount: Amount) -> ValidationResult {
        match self.check_order(params, amount) {
            Ok(cost) => ValidationResult::ok(cost),
            Err(e) => ValidationResult::invalid(e.to_string()),
        }
    }

    fn supports_feature(&self, feature: &str) -> bool {
        FEATURES.contains(&feature)
    }

    fn order_metadata(&self, params: &ChainSpecificParams) -> Result<Vec<u8>, ChainError> {
        let exec = NearExecutionParams::decode(&params.execution_params)?;
        let args: serde_json::Value = serde_json::from_slice(&exec.args)
            .map_err(|e| ChainError::InvalidParams(e.to_string()))?;
        let metadata = json!({
            "chain_id": self.info.chain_id,
            "chain": self.info.name,
            "destination": params.destination_str()?,
            "contract_id": exec.contract_id,
            "method_name": exec.method_name,
            "args": args,
            "attached_deposit": exec.attached_deposit.to_string(),
            "gas": exec.gas,
        });
        serde_json::to_vec(&metadata).map_err(|e| ChainError::Encoding(e.to_string()))
    }
}
