//! # Factory Configuration
//!
//! Byte fields are hex strings in TOML.
//!
//! ```toml
//! factory_address = "5fbdb2315678afecb367f032d93f642f64180aa3"
//! owner = "f39fd6e51aad88f6f4ce6ab8827279cfffb92266"
//! min_safety_deposit_bps = 500
//! max_timelock_span_secs = 2592000
//! ```

use serde::{Deserialize, Serialize};
use shared_types::{keccak256, Address, Hash};
use xs_01_destination_chains::{invariant_bps_in_range, DEFAULT_SAFETY_DEPOSIT_BPS};

use crate::domain::EscrowError;

/// Default upper bound on any stage offset: 30 days.
pub const DEFAULT_MAX_TIMELOCK_SPAN_SECS: u32 = 30 * 24 * 60 * 60;

mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(bytes: &[u8; N], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(d: D) -> Result<[u8; N], D::Error> {
        let s = String::deserialize(d)?;
        let raw = hex::decode(s.trim_start_matches("0x")).map_err(D::Error::custom)?;
        raw.try_into()
            .map_err(|v: Vec<u8>| D::Error::custom(format!("expected {N} bytes, got {}", v.len())))
    }
}

fn derived_address(label: &[u8]) -> Address {
    let digest = keccak256(label);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    out
}

/// Escrow factory settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Factory identity mixed into every escrow address.
    #[serde(with = "hex_bytes")]
    pub factory_address: Address,
    /// Single administrative identity.
    #[serde(with = "hex_bytes")]
    pub owner: Address,
    /// Source escrow implementation hash.
    #[serde(with = "hex_bytes")]
    pub src_implementation: Hash,
    /// Destination escrow implementation hash.
    #[serde(with = "hex_bytes")]
    pub dst_implementation: Hash,
    /// Factory-wide safety deposit floor, combined with the chain's.
    pub min_safety_deposit_bps: u16,
    /// Largest accepted stage offset.
    pub max_timelock_span_secs: u32,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            factory_address: derived_address(b"xs-02/escrow-factory"),
            owner: [0u8; 20],
            src_implementation: keccak256(b"xs-02/escrow-src"),
            dst_implementation: keccak256(b"xs-02/escrow-dst"),
            min_safety_deposit_bps: DEFAULT_SAFETY_DEPOSIT_BPS,
            max_timelock_span_secs: DEFAULT_MAX_TIMELOCK_SPAN_SECS,
        }
    }
}

impl FactoryConfig {
    /// Config with a fixed owner for tests.
    pub fn for_testing() -> Self {
        Self {
            owner: [0xAD; 20],
            ..Self::default()
        }
    }

    /// Parse from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, EscrowError> {
        let config: Self = toml::from_str(input).map_err(|e| EscrowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check bounds.
    pub fn validate(&self) -> Result<(), EscrowError> {
        if !invariant_bps_in_range(self.min_safety_deposit_bps) {
            return Err(EscrowError::InvalidSafetyDepositBps(self.min_safety_deposit_bps));
        }
        if self.max_timelock_span_secs == 0 {
            return Err(EscrowError::Config("max_timelock_span_secs must be non-zero".into()));
        }
        Ok(())
    }
}
