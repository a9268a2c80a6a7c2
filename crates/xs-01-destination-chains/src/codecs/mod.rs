//! # Codecs Module
//!
//! Address parsing, parameter encodings and the Bitcoin HTLC script.

pub mod address;
pub mod bech32;
pub mod execution;
pub mod script;

pub use address::{
    AddressCodec, AddressKind, BitcoinAddressCodec, BitcoinNetwork, CosmosAddressCodec,
    DecodedAddress, NearAccountCodec,
};
pub use execution::{
    BitcoinHtlcParams, CosmosCoin, CosmosExecutionParams, ExecutionParamCodec, LockTimeKind,
    NearExecutionParams,
};
pub use script::{build_htlc_script, witness_script_hash};
