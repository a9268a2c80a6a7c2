//! # Coordinator Configuration
//!
//! ```toml
//! admin = "f39fd6e51aad88f6f4ce6ab8827279cfffb92266"
//! resolvers = ["70997970c51812dc3a010c7d01b50e0d17dc79c8"]
//! default_list_limit = 30
//! max_list_limit = 100
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared_types::Address;

use crate::domain::OrderError;

/// Page size when the caller gives none.
pub const DEFAULT_LIST_LIMIT: usize = 30;

/// Largest accepted page size.
pub const MAX_LIST_LIMIT: usize = 100;

fn parse_address<E: serde::de::Error>(s: &str) -> Result<Address, E> {
    let raw = hex::decode(s.trim_start_matches("0x")).map_err(E::custom)?;
    raw.try_into()
        .map_err(|v: Vec<u8>| E::custom(format!("expected 20 bytes, got {}", v.len())))
}

mod hex_address {
    use super::*;

    pub fn serialize<S: Serializer>(address: &Address, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(address))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Address, D::Error> {
        parse_address(&String::deserialize(d)?)
    }
}

mod hex_address_list {
    use super::*;

    pub fn serialize<S: Serializer>(addresses: &[Address], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(addresses.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Address>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|s| parse_address(s))
            .collect()
    }
}

/// Order coordinator settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Identity allowed to manage resolvers.
    #[serde(with = "hex_address")]
    pub admin: Address,
    /// Resolvers authorized at startup.
    #[serde(with = "hex_address_list")]
    pub resolvers: Vec<Address>,
    /// Page size for `list_orders` without a limit.
    pub default_list_limit: usize,
    /// Cap on `list_orders` page size.
    pub max_list_limit: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            admin: [0u8; 20],
            resolvers: Vec::new(),
            default_list_limit: DEFAULT_LIST_LIMIT,
            max_list_limit: MAX_LIST_LIMIT,
        }
    }
}

impl CoordinatorConfig {
    /// Config with a fixed admin for tests.
    pub fn for_testing() -> Self {
        Self {
            admin: [0xAD; 20],
            ..Self::default()
        }
    }

    /// Parse from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, OrderError> {
        let config: Self = toml::from_str(input).map_err(|e| OrderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check bounds.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.default_list_limit == 0 || self.max_list_limit == 0 {
            return Err(OrderError::Config("list limits must be non-zero".into()));
        }
        if self.default_list_limit > self.max_list_limit {
            return Err(OrderError::Config(format!(
                "default_list_limit {} exceeds max_list_limit {}",
                self.default_list_limit, self.max_list_limit
            )));
        }
        Ok(())
    }
}
