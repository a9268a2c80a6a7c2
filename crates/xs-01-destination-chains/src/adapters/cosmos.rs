//! Cosmos SDK adapter (Neutron, Juno, Cosmos Hub).
//!
//! Orders execute as a CosmWasm `execute` on the escrow contract.

use serde_json::json;
use shared_types::{Address, Amount};

use crate::codecs::{AddressCodec, CosmosAddressCodec, CosmosExecutionParams, ExecutionParamCodec};
use crate::config::CosmosAdapterConfig;
use crate::domain::{ChainError, ChainInfo, ChainSpecificParams, ValidationResult};
use crate::ports::DestinationChainAdapter;

const FEATURES: &[&str] = &["htlc", "cosmwasm", "ibc", "native_tokens", "cw20"];

/// Adapter for one Cosmos SDK chain.
pub struct CosmosAdapter {
    config: CosmosAdapterConfig,
    info: ChainInfo,
    codec: CosmosAddressCodec,
}

impl CosmosAdapter {
    /// Create an adapter from a validated config.
    pub fn new(config: CosmosAdapterConfig) -> Result<Self, ChainError> {
        config.validate()?;
        Ok(Self {
            info: config.chain_info(),
            codec: CosmosAddressCodec::new(config.hrp.clone()),
            config,
        })
    }

    /// Adapter configuration.
    pub fn config(&self) -> &CosmosAdapterConfig {
        &self.config
    }

    /// Address codec bound to this chain's HRP.
    pub fn codec(&self) -> &CosmosAddressCodec {
        &self.codec
    }

    fn cost_for(&self, amount: Amount) -> Result<Amount, ChainError> {
        let surcharge = if amount > Amount::from(self.config.surcharge_threshold) {
            amount / 1000
        } else {
            0
        };
        Amount::from(self.config.base_fee)
            .checked_add(surcharge)
            .ok_or(ChainError::Overflow)
    }

    fn check_order(&self, params: &ChainSpecificParams, amount: Amount) -> Result<Amount, ChainError> {
        if amount == 0 {
            return Err(ChainError::InvalidParams("amount must be non-zero".into()));
        }
        self.codec.decode(params.destination_str()?)?;
        let exec = CosmosExecutionParams::decode(&params.execution_params)?;

        if exec.contract_address.is_empty() {
            return Err(ChainError::InvalidParams("contract address required".into()));
        }
        self.codec.decode(&exec.contract_address).map_err(|e| {
            ChainError::InvalidParams(format!("contract address: {e}"))
        })?;
        if exec.msg.is_empty() {
            return Err(ChainError::InvalidParams("execute msg required".into()));
        }
        serde_json::from_slice::<serde_json::Value>(&exec.msg)
            .map_err(|e| ChainError::InvalidParams(format!("execute msg is not JSON: {e}")))?;
        if exec.gas_limit < self.config.min_gas_limit {
            return Err(ChainError::InvalidParams(format!(
                "gas limit {} below minimum {}",
                exec.gas_limit, self.config.min_gas_limit
            )));
        }
        if exec.funds.iter().any(|c| c.denom.is_empty()) {
            return Err(ChainError::InvalidParams("fund denom required".into()));
        }
        self.cost_for(amount)
    }
}

impl DestinationChainAdapter for CosmosAdapter {
    fn chain_info(&self) -> &ChainInfo {
        &self.info
    }

    fn validate_destination_address(&self, address: &[u8]) -> bool {
        std::str::from_utf8(address)
            .map(|a| self.codec.validate(a))
            .unwrap_or(false)
    }

    fn supported_token_formats(&self) -> Vec<String> {
        vec!["native".to_string(), "cw20".to_string(), "ibc".to_string()]
    }

    fn format_token_identifier(
        &self,
        token: &Address,
        symbol: &str,
        is_native: bool,
    ) -> Result<Vec<u8>, ChainError> {
        if is_native {
            return Ok(self.config.native_denom.clone().into_bytes());
        }
        if symbol.starts_with("ibc/") {
            return Ok(symbol.as_bytes().to_vec());
        }
        let contract = self.codec.encode(token)?;
        Ok(format!("cw20:{contract}").into_bytes())
    }

    fn estimate_execution_cost(
        &self,
        _params: &ChainSpecificParams,
        amount: Amount,
    ) -> Result<Amount, ChainError> {
        self.cost_for(amount)
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
        let exec = CosmosExecutionParams::decode(&params.execution_params)?;
        let msg: serde_json::Value = serde_json::from_slice(&exec.msg)
            .map_err(|e| ChainError::InvalidParams(e.to_string()))?;
        let funds: Vec<_> = exec
            .funds
            .iter()
            .map(|c| json!({ "denom": c.denom, "amount": c.amount.to_string() }))
            .collect();
        let metadata = json!({
            "chain_id": self.info.chain_id,
            "chain": self.info.name,
            "hrp": self.config.hrp,
            "destination": params.destination_str()?,
            "contract": exec.contract_address,
            "msg": msg,
            "funds": funds,
            "gas_limit": exec.gas_limit,
        });
        serde_json::to_vec(&metadata).map_err(|e| ChainError::Encoding(e.to_string()))
    }
}
