//! # Core Value Types
//!
//! Primitive value types used across the escrow engine.
//!
//! ## Conventions
//!
//! - **Amounts** are `u128` in the common 18-decimal value unit.
//! - **Addresses** are 20 bytes; the all-zero address denotes the native token.
//! - **Hashes** are 32 bytes (SHA-256 hashlocks, Keccak-256 identities).

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// A 32-byte hash.
pub type Hash = [u8; 32];

/// A 20-byte account or contract address.
pub type Address = [u8; 20];

/// A value amount in the common unit.
pub type Amount = u128;

/// Numeric identifier of a destination chain.
pub type ChainId = u64;

/// Sentinel token address meaning "the native asset".
pub const NATIVE_TOKEN: Address = [0u8; 20];

/// Denominator for basis-point ratios.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// The all-zero hash.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Which leg of a swap an escrow belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowSide {
    /// Maker's funds on the source chain.
    Source,
    /// Resolver's funds plus safety deposit on the destination chain.
    Destination,
}

impl EscrowSide {
    /// Lowercase label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "src",
            Self::Destination => "dst",
        }
    }
}

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Whether every byte of `bytes` is zero.
pub fn is_zero(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| *b == 0)
}

/// Short hex rendering for log fields (first 4 bytes).
pub fn short_hex(bytes: &[u8]) -> String {
    let end = bytes.len().min(4);
    format!("0x{}..", hex::encode(&bytes[..end]))
}
