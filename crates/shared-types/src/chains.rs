//! # Chain Identifiers
//!
//! Reserved chain-id space for the supported destination chains.
//! EVM chains keep their native ids; non-EVM chains use the 40000 range.

use crate::entities::ChainId;

/// NEAR mainnet.
pub const NEAR_MAINNET: ChainId = 40001;
/// NEAR testnet.
pub const NEAR_TESTNET: ChainId = 40002;
/// Bitcoin mainnet.
pub const BITCOIN_MAINNET: ChainId = 40003;
/// Bitcoin testnet.
pub const BITCOIN_TESTNET: ChainId = 40004;
/// Dogecoin mainnet.
pub const DOGECOIN_MAINNET: ChainId = 40005;
/// Litecoin mainnet.
pub const LITECOIN_MAINNET: ChainId = 40006;
/// Bitcoin Cash mainnet.
pub const BITCOIN_CASH_MAINNET: ChainId = 40007;
/// Neutron (Cosmos SDK).
pub const NEUTRON: ChainId = 40008;
/// Juno (Cosmos SDK).
pub const JUNO: ChainId = 40009;
/// Cosmos Hub.
pub const COSMOS_HUB: ChainId = 40010;

/// Every reserved destination chain id, in registration order.
pub const ALL_DESTINATION_CHAINS: [ChainId; 10] = [
    NEAR_MAINNET,
    NEAR_TESTNET,
    BITCOIN_MAINNET,
    BITCOIN_TESTNET,
    DOGECOIN_MAINNET,
    LITECOIN_MAINNET,
    BITCOIN_CASH_MAINNET,
    NEUTRON,
    JUNO,
    COSMOS_HUB,
];
