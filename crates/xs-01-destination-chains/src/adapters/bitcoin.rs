//! Bitcoin-family adapter (Bitcoin, Bitcoin testnet, Dogecoin, Litecoin, Bitcoin Cash).
//!
//! Execution happens through a P2WSH/P2SH HTLC script; cost is
//! `tx_size * fee_rate` satoshi scaled to the common unit.

use serde_json::json;
use shared_types::{is_zero, Address, Amount};

use crate::codecs::{
    build_htlc_script, witness_script_hash, AddressCodec, BitcoinAddressCodec, BitcoinHtlcParams,
    ExecutionParamCodec, LockTimeKind,
};
use crate::config::BitcoinAdapterConfig;
use crate::domain::{ChainError, ChainInfo, ChainSpecificParams, ValidationResult};
use crate::ports::DestinationChainAdapter;

/// Largest relative lock expressible in a CSV sequence field.
pub const MAX_RELATIVE_TIMELOCK: u32 = 0xFFFF;

const FEATURES: &[&str] = &["htlc", "utxo", "script_hash", "timelock_cltv", "timelock_csv"];

/// Adapter for one Bitcoin-family network.
pub struct BitcoinAdapter {
    config: BitcoinAdapterConfig,
    info: ChainInfo,
    codec: BitcoinAddressCodec,
}

impl BitcoinAdapter {
    /// Create an adapter from a validated config.
    pub fn new(config: BitcoinAdapterConfig) -> Result<Self, ChainError> {
        config.validate()?;
        Ok(Self {
            info: config.chain_info(),
            codec: BitcoinAddressCodec::new(config.network),
            config,
        })
    }

    /// Adapter configuration.
    pub fn config(&self) -> &BitcoinAdapterConfig {
        &self.config
    }

    fn decode_params(&self, params: &ChainSpecificParams) -> Result<BitcoinHtlcParams, ChainError> {
        BitcoinHtlcParams::decode(&params.execution_params)
    }

    fn tx_size(&self, params: &ChainSpecificParams) -> u64 {
        if params.estimated_gas == 0 {
            self.config.default_tx_size_bytes
        } else {
            params.estimated_gas
        }
    }

    fn cost_of(&self, htlc: &BitcoinHtlcParams, params: &ChainSpecificParams) -> Result<Amount, ChainError> {
        let sats = self
            .tx_size(params)
            .checked_mul(htlc.fee_rate)
            .ok_or(ChainError::Overflow)?;
        Amount::from(sats)
            .checked_mul(Amount::from(self.config.unit_scale))
            .ok_or(ChainError::Overflow)
    }

    fn check_order(&self, params: &ChainSpecificParams, amount: Amount) -> Result<Amount, ChainError> {
        if amount == 0 {
            return Err(ChainError::InvalidParams("amount must be non-zero".into()));
        }
        self.codec.decode(params.destination_str()?)?;
        let htlc = self.decode_params(params)?;

        let dust = Amount::from(self.config.dust_threshold_sats) * Amount::from(self.config.unit_scale);
        if amount < dust {
            return Err(ChainError::InvalidParams(format!(
                "amount below dust threshold of {} sats",
                self.config.dust_threshold_sats
            )));
        }
        if htlc.fee_rate < self.config.min_fee_rate || htlc.fee_rate > self.config.max_fee_rate {
            return Err(ChainError::InvalidParams(format!(
                "fee rate {} outside [{}, {}]",
                htlc.fee_rate, self.config.min_fee_rate, self.config.max_fee_rate
            )));
        }
        if htlc.timelock == 0 {
            return Err(ChainError::InvalidParams("timelock must be non-zero".into()));
        }
        if htlc.timelock_kind == LockTimeKind::Relative && htlc.timelock > MAX_RELATIVE_TIMELOCK {
            return Err(ChainError::InvalidParams(format!(
                "relative timelock exceeds {MAX_RELATIVE_TIMELOCK} blocks"
            )));
        }
        if is_zero(&htlc.hashlock) {
            return Err(ChainError::InvalidParams("hashlock must be non-zero".into()));
        }
        self.cost_of(&htlc, params)
    }

    /// Redeem script for the order, paying the destination address.
    ///
    /// The destination must pay to a pubkey hash (P2PKH, P2WPKH or CashAddr P2PKH).
    pub fn htlc_script(&self, params: &ChainSpecificParams) -> Result<Vec<u8>, ChainError> {
        let destination = self.codec.decode(params.destination_str()?)?;
        let recipient = destination.pubkey_hash().ok_or_else(|| {
            ChainError::InvalidAddress("destination must pay to a pubkey hash".into())
        })?;
        let htlc = self.decode_params(params)?;
        Ok(build_htlc_script(&htlc, &recipient))
    }
}

impl DestinationChainAdapter for BitcoinAdapter {
    fn chain_info(&self) -> &ChainInfo {
        &self.info
    }

    fn validate_destination_address(&self, address: &[u8]) -> bool {
        std::str::from_utf8(address)
            .map(|a| self.codec.validate(a))
            .unwrap_or(false)
    }

    fn supported_token_formats(&self) -> Vec<String> {
        vec!["native".to_string()]
    }

    fn format_token_identifier(
        &self,
        _token: &Address,
        symbol: &str,
        is_native: bool,
    ) -> Result<Vec<u8>, ChainError> {
        if !is_native {
            return Err(ChainError::UnsupportedToken(format!(
                "{} only supports its native asset",
                self.info.name
            )));
        }
        Ok(symbol.to_ascii_uppercase().into_bytes())
    }

    fn estimate_execution_cost(
        &self,
        params: &ChainSpecificParams,
        _amount: Amount,
    ) -> Result<Amount, ChainError> {
        let htlc = self.decode_params(params)?;
        self.cost_of(&htlc, params)
    }

    fn validate_order_params(&self, params: &ChainSpecificParams, amount: Amount) -> ValidationResult {
        match self.check_order(params, amount) {
            Ok(cost) => ValidationResult::ok(cost),
            Err(e) => ValidationResult::invalid(e.to_string()),
        }
    }

    fn supports_feature(&self, feature: &str) -> bool {
        FEATURES.contains(&feature)
            || (feature == "segwit" && self.config.network.bech32_hrp().is_some())
            || (feature == "cashaddr" && self.config.network.cashaddr_prefix().is_some())
    }

    fn order_metadata(&self, params: &ChainSpecificParams) -> Result<Vec<u8>, ChainError> {
        let htlc = self.decode_params(params)?;
        let script = self.htlc_script(params).ok();
        // Only segwit networks pay to a witness program.
        let witness_program = script
            .as_ref()
            .filter(|_| self.config.network.bech32_hrp().is_some())
            .map(|s| hex::encode(witness_script_hash(s)));
        let mut metadata = json!({
            "chain_id": self.info.chain_id,
            "chain": self.info.name,
            "network": self.config.network,
            "destination": params.destination_str()?,
            "hashlock": hex::encode(htlc.hashlock),
            "timelock": htlc.timelock,
            "timelock_kind": htlc.timelock_kind,
            "fee_rate": htlc.fee_rate,
            "estimated_tx_size": self.tx_size(params),
            "htlc_script": script.as_ref().map(hex::encode),
        });
        if let Some(program) = witness_program {
            metadata["witness_script_hash"] = json!(program);
        }
        serde_json::to_vec(&metadata).map_err(|e| ChainError::Encoding(e.to_string()))
    }
}
