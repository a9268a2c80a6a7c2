//! # XS-01 Destination Chains
//!
//! Pluggable destination chain support for hashlocked swaps.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Route order validation, cost estimation and safety deposit sizing to the
//! adapter of the chain an order settles on:
//! - Bitcoin family (Bitcoin, Dogecoin, Litecoin, Bitcoin Cash) via HTLC scripts
//! - Cosmos SDK chains (Neutron, Juno, Cosmos Hub) via CosmWasm execute
//! - NEAR via function calls
//!
//! ## Module Structure
//!
//! ```text
//! xs-01-destination-chains/
//! ├── domain/          # ChainInfo, ChainSpecificParams, errors, invariants
//! ├── codecs/          # Base58Check, Bech32/Bech32m, CashAddr, HTLC script
//! ├── ports/           # DestinationChainAdapter
//! ├── adapters/        # Bitcoin, Cosmos, NEAR
//! ├── config.rs        # Per-chain presets, TOML loading
//! └── registry.rs      # ChainRegistry
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod codecs;
pub mod config;
pub mod domain;
pub mod ports;
pub mod registry;

// Re-exports
pub use adapters::{BitcoinAdapter, CosmosAdapter, NearAdapter};
pub use codecs::{
    AddressCodec, AddressKind, BitcoinAddressCodec, BitcoinHtlcParams, BitcoinNetwork,
    CosmosAddressCodec, CosmosCoin, CosmosExecutionParams, DecodedAddress, ExecutionParamCodec,
    LockTimeKind, NearAccountCodec, NearExecutionParams,
};
pub use config::{
    AdapterConfig, BitcoinAdapterConfig, CosmosAdapterConfig, NearAdapterConfig, RegistryConfig,
};
pub use domain::{
    invariant_adapter_valid, invariant_bps_in_range, min_safety_deposit, ChainError, ChainInfo,
    ChainSpecificParams, ValidationResult, DEFAULT_SAFETY_DEPOSIT_BPS, MAX_BPS,
};
pub use ports::{DestinationChainAdapter, SharedAdapter};
pub use registry::{ChainRegistry, SharedChainRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
