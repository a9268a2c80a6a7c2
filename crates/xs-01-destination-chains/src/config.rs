//! # Destination Chain Configuration
//!
//! Per-adapter settings with presets for every supported chain, and the
//! registry configuration that lists which adapters to install.

use serde::{Deserialize, Serialize};
use shared_types::{
    ChainId, BITCOIN_CASH_MAINNET, BITCOIN_MAINNET, BITCOIN_TESTNET, COSMOS_HUB, DOGECOIN_MAINNET,
    JUNO, LITECOIN_MAINNET, NEAR_MAINNET, NEAR_TESTNET, NEUTRON,
};
use std::sync::Arc;

use crate::adapters::{BitcoinAdapter, CosmosAdapter, NearAdapter};
use crate::codecs::BitcoinNetwork;
use crate::domain::{invariant_bps_in_range, ChainError, ChainInfo, DEFAULT_SAFETY_DEPOSIT_BPS};
use crate::ports::SharedAdapter;

/// Satoshi to common-unit (18 decimals) scale.
pub const SATOSHI_UNIT_SCALE: u64 = 10_000_000_000;

/// yoctoNEAR (24 decimals) per common unit step (18 decimals).
pub const YOCTO_PER_UNIT: u64 = 1_000_000;

fn check_bps(name: &str, bps: u16) -> Result<(), ChainError> {
    if invariant_bps_in_range(bps) {
        Ok(())
    } else {
        Err(ChainError::Config(format!(
            "{name}: min_safety_deposit_bps {bps} outside 1..=10000"
        )))
    }
}

// =============================================================================
// BITCOIN FAMILY
// =============================================================================

/// Bitcoin-family adapter configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitcoinAdapterConfig {
    /// Registry key.
    pub chain_id: ChainId,
    /// Display name.
    pub name: String,
    /// Native asset symbol.
    pub symbol: String,
    /// Address scheme.
    pub network: BitcoinNetwork,
    /// Whether orders may route here.
    pub is_active: bool,
    /// Minimum safety deposit in basis points.
    pub min_safety_deposit_bps: u16,
    /// Suggested cancellation horizon.
    pub default_timelock_seconds: u64,
    /// Smallest spendable output in satoshi.
    pub dust_threshold_sats: u64,
    /// Lowest accepted fee rate (sat/byte).
    pub min_fee_rate: u64,
    /// Highest accepted fee rate (sat/byte).
    pub max_fee_rate: u64,
    /// Transaction size used when the order gives none.
    pub default_tx_size_bytes: u64,
    /// Common units per satoshi.
    pub unit_scale: u64,
}

impl Default for BitcoinAdapterConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl BitcoinAdapterConfig {
    fn preset(chain_id: ChainId, name: &str, symbol: &str, network: BitcoinNetwork) -> Self {
        Self {
            chain_id,
            name: name.to_string(),
            symbol: symbol.to_string(),
            network,
            is_active: true,
            min_safety_deposit_bps: DEFAULT_SAFETY_DEPOSIT_BPS,
            default_timelock_seconds: 24 * 3600,
            dust_threshold_sats: 546,
            min_fee_rate: 1,
            max_fee_rate: 1000,
            default_tx_size_bytes: 250,
            unit_scale: SATOSHI_UNIT_SCALE,
        }
    }

    /// Bitcoin mainnet.
    pub fn mainnet() -> Self {
        Self::preset(BITCOIN_MAINNET, "Bitcoin", "BTC", BitcoinNetwork::Mainnet)
    }

    /// Bitcoin testnet.
    pub fn testnet() -> Self {
        Self {
            default_timelock_seconds: 2 * 3600,
            ..Self::preset(BITCOIN_TESTNET, "Bitcoin Testnet", "tBTC", BitcoinNetwork::Testnet)
        }
    }

    /// Dogecoin mainnet.
    pub fn dogecoin() -> Self {
        Self {
            default_timelock_seconds: 12 * 3600,
            dust_threshold_sats: 1_000_000,
            ..Self::preset(DOGECOIN_MAINNET, "Dogecoin", "DOGE", BitcoinNetwork::Dogecoin)
        }
    }

    /// Litecoin mainnet.
    pub fn litecoin() -> Self {
        Self {
            default_timelock_seconds: 12 * 3600,
            ..Self::preset(LITECOIN_MAINNET, "Litecoin", "LTC", BitcoinNetwork::Litecoin)
        }
    }

    /// Bitcoin Cash mainnet.
    pub fn bitcoin_cash() -> Self {
        Self::preset(BITCOIN_CASH_MAINNET, "Bitcoin Cash", "BCH", BitcoinNetwork::BitcoinCash)
    }

    /// Chain metadata derived from this config.
    pub fn chain_info(&self) -> ChainInfo {
        ChainInfo {
            chain_id: self.chain_id,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            is_active: self.is_active,
            min_safety_deposit_bps: self.min_safety_deposit_bps,
            default_timelock_seconds: self.default_timelock_seconds,
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ChainError> {
        check_bps(&self.name, self.min_safety_deposit_bps)?;
        if self.min_fee_rate == 0 || self.min_fee_rate > self.max_fee_rate {
            return Err(ChainError::Config(format!(
                "{}: fee rate bounds [{}, {}] invalid",
                self.name, self.min_fee_rate, self.max_fee_rate
            )));
        }
        if self.unit_scale == 0 || self.default_tx_size_bytes == 0 {
            return Err(ChainError::Config(format!(
                "{}: unit_scale and default_tx_size_bytes must be non-zero",
                self.name
            )));
        }
        Ok(())
    }
}

// =============================================================================
// COSMOS
// =============================================================================

/// Cosmos SDK adapter configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmosAdapterConfig {
    /// Registry key.
    pub chain_id: ChainId,
    /// Display name.
    pub name: String,
    /// Native asset symbol.
    pub symbol: String,
    /// Bech32 human readable part.
    pub hrp: String,
    /// Native bank denom.
    pub native_denom: String,
    /// Whether orders may route here.
    pub is_active: bool,
    /// Minimum safety deposit in basis points.
    pub min_safety_deposit_bps: u16,
    /// Suggested cancellation horizon.
    pub default_timelock_seconds: u64,
    /// Lowest accepted gas limit.
    pub min_gas_limit: u64,
    /// Flat execution fee in common units.
    pub base_fee: u64,
    /// Amounts above this pay a 0.1% surcharge.
    pub surcharge_threshold: u64,
}

impl Default for CosmosAdapterConfig {
    fn default() -> Self {
        Self::neutron()
    }
}

impl CosmosAdapterConfig {
    fn preset(chain_id: ChainId, name: &str, symbol: &str, hrp: &str, denom: &str) -> Self {
        Self {
            chain_id,
            name: name.to_string(),
            symbol: symbol.to_string(),
            hrp: hrp.to_string(),
            native_denom: denom.to_string(),
            is_active: true,
            min_safety_deposit_bps: DEFAULT_SAFETY_DEPOSIT_BPS,
            default_timelock_seconds: 3600,
            min_gas_limit: 50_000,
            base_fee: 5_000_000_000_000_000,
            surcharge_threshold: 5_000_000_000_000_000_000,
        }
    }

    /// Neutron.
    pub fn neutron() -> Self {
        Self::preset(NEUTRON, "Neutron", "NTRN", "neutron", "untrn")
    }

    /// Juno.
    pub fn juno() -> Self {
        Self::preset(JUNO, "Juno", "JUNO", "juno", "ujuno")
    }

    /// Cosmos Hub.
    pub fn cosmos_hub() -> Self {
        Self::preset(COSMOS_HUB, "Cosmos Hub", "ATOM", "cosmos", "uatom")
    }

    /// Chain metadata derived from this config.
    pub fn chain_info(&self) -> ChainInfo {
        ChainInfo {
            chain_id: self.chain_id,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            is_active: self.is_active,
            min_safety_deposit_bps: self.min_safety_deposit_bps,
            default_timelock_seconds: self.default_timelock_seconds,
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ChainError> {
        check_bps(&self.name, self.min_safety_deposit_bps)?;
        if self.hrp.is_empty() || self.native_denom.is_empty() {
            return Err(ChainError::Config(format!(
                "{}: hrp and native_denom are required",
                self.name
            )));
        }
        Ok(())
    }
}

// =============================================================================
// NEAR
// =============================================================================

/// NEAR adapter configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearAdapterConfig {
    /// Registry key.
    pub chain_id: ChainId,
    /// Display name.
    pub name: String,
    /// Native asset symbol.
    pub symbol: String,
    /// Whether orders may route here.
    pub is_active: bool,
    /// Minimum safety deposit in basis points.
    pub min_safety_deposit_bps: u16,
    /// Suggested cancellation horizon.
    pub default_timelock_seconds: u64,
    /// Gas price in yoctoNEAR per gas unit.
    pub gas_price_yocto: u64,
    /// Prepaid gas ceiling per call.
    pub max_gas: u64,
    /// yoctoNEAR per common unit.
    pub yocto_per_unit: u64,
}

impl Default for NearAdapterConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl NearAdapterConfig {
    /// NEAR mainnet.
    pub fn mainnet() -> Self {
        Self {
            chain_id: NEAR_MAINNET,
            name: "NEAR Protocol".to_string(),
            symbol: "NEAR".to_string(),
            is_active: true,
            min_safety_deposit_bps: DEFAULT_SAFETY_DEPOSIT_BPS,
            default_timelock_seconds: 3600,
            gas_price_yocto: 100_000_000,
            max_gas: 300_000_000_000_000,
            yocto_per_unit: YOCTO_PER_UNIT,
        }
    }

    /// NEAR testnet.
    pub fn testnet() -> Self {
        Self {
            chain_id: NEAR_TESTNET,
            name: "NEAR Testnet".to_string(),
            ..Self::mainnet()
        }
    }

    /// Chain metadata derived from this config.
    pub fn chain_info(&self) -> ChainInfo {
        ChainInfo {
            chain_id: self.chain_id,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            is_active: self.is_active,
            min_safety_deposit_bps: self.min_safety_deposit_bps,
            default_timelock_seconds: self.default_timelock_seconds,
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ChainError> {
        check_bps(&self.name, self.min_safety_deposit_bps)?;
        if self.max_gas == 0 || self.yocto_per_unit == 0 {
            return Err(ChainError::Config(format!(
                "{}: max_gas and yocto_per_unit must be non-zero",
                self.name
            )));
        }
        Ok(())
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// One adapter entry, tagged by chain family.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum AdapterConfig {
    /// Bitcoin-family chain.
    Bitcoin(BitcoinAdapterConfig),
    /// Cosmos SDK chain.
    Cosmos(CosmosAdapterConfig),
    /// NEAR chain.
    Near(NearAdapterConfig),
}

impl AdapterConfig {
    /// Chain id this entry configures.
    pub fn chain_id(&self) -> ChainId {
        match self {
            Self::Bitcoin(c) => c.chain_id,
            Self::Cosmos(c) => c.chain_id,
            Self::Near(c) => c.chain_id,
        }
    }

    /// Instantiate the adapter.
    pub fn build(&self) -> Result<SharedAdapter, ChainError> {
        Ok(match self {
            Self::Bitcoin(c) => Arc::new(BitcoinAdapter::new(c.clone())?),
            Self::Cosmos(c) => Arc::new(CosmosAdapter::new(c.clone())?),
            Self::Near(c) => Arc::new(NearAdapter::new(c.clone())?),
        })
    }
}

/// Which adapters the registry installs at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Adapter entries in registration order.
    #[serde(default)]
    pub chains: Vec<AdapterConfig>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            chains: vec![
                AdapterConfig::Near(NearAdapterConfig::mainnet()),
                AdapterConfig::Near(NearAdapterConfig::testnet()),
                AdapterConfig::Bitcoin(BitcoinAdapterConfig::mainnet()),
                AdapterConfig::Bitcoin(BitcoinAdapterConfig::testnet()),
                AdapterConfig::Bitcoin(BitcoinAdapterConfig::dogecoin()),
                AdapterConfig::Bitcoin(BitcoinAdapterConfig::litecoin()),
                AdapterConfig::Bitcoin(BitcoinAdapterConfig::bitcoin_cash()),
                AdapterConfig::Cosmos(CosmosAdapterConfig::neutron()),
                AdapterConfig::Cosmos(CosmosAdapterConfig::juno()),
                AdapterConfig::Cosmos(CosmosAdapterConfig::cosmos_hub()),
            ],
        }
    }
}

impl RegistryConfig {
    /// A registry with no adapters.
    pub fn empty() -> Self {
        Self { chains: Vec::new() }
    }

    /// Parse from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, ChainError> {
        toml::from_str(input).map_err(|e| ChainError::Config(e.to_string()))
    }
}
