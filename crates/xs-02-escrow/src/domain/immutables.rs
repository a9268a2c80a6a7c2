//! # Immutables
//!
//! Content-addressed description of one escrow leg.
//!
//! The canonical encoding is eight 32-byte words:
//!
//! ```text
//! order_hash | hashlock | maker | taker | token | amount | safety_deposit | timelocks
//! ```
//!
//! Addresses and integers are left-padded with zeros.

use serde::{Deserialize, Serialize};
use shared_types::{is_zero, keccak256, Address, Amount, Hash};

use super::errors::EscrowError;
use super::timelocks::{Timelocks, PACKED_TIMELOCKS_LEN};

/// Length of the canonical encoding.
pub const IMMUTABLES_ENCODED_LEN: usize = 8 * 32;

/// Parameters fixed for the life of an escrow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Immutables {
    /// Order identity.
    pub order_hash: Hash,
    /// SHA-256 of the swap secret.
    pub hashlock: Hash,
    /// Order creator; funds the source leg.
    pub maker: Address,
    /// Resolver; funds the destination leg.
    pub taker: Address,
    /// Swapped token (`NATIVE_TOKEN` for the native asset).
    pub token: Address,
    /// Swapped amount.
    pub amount: Amount,
    /// Native safety deposit posted by the resolver.
    pub safety_deposit: Amount,
    /// Stage schedule.
    pub timelocks: Timelocks,
}

fn put_address(word: &mut [u8], address: &Address) {
    word[12..32].copy_from_slice(address);
}

fn put_amount(word: &mut [u8], amount: Amount) {
    word[16..32].copy_from_slice(&amount.to_be_bytes());
}

fn read_address(word: &[u8]) -> Result<Address, EscrowError> {
    if !is_zero(&word[..12]) {
        return Err(EscrowError::InvalidImmutables("address word not left-padded"));
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&word[12..32]);
    Ok(out)
}

fn read_amount(word: &[u8]) -> Result<Amount, EscrowError> {
    if !is_zero(&word[..16]) {
        return Err(EscrowError::InvalidImmutables("amount exceeds 128 bits"));
    }
    let mut out = [0u8; 16];
    out.copy_from_slice(&word[16..32]);
    Ok(Amount::from_be_bytes(out))
}

impl Immutables {
    /// Canonical 256-byte encoding.
    pub fn encode(&self) -> [u8; IMMUTABLES_ENCODED_LEN] {
        let mut out = [0u8; IMMUTABLES_ENCODED_LEN];
        out[0..32].copy_from_slice(&self.order_hash);
        out[32..64].copy_from_slice(&self.hashlock);
        put_address(&mut out[64..96], &self.maker);
        put_address(&mut out[96..128], &self.taker);
        put_address(&mut out[128..160], &self.token);
        put_amount(&mut out[160..192], self.amount);
        put_amount(&mut out[192..224], self.safety_deposit);
        out[224..256].copy_from_slice(&self.timelocks.pack());
        out
    }

    /// Parse the canonical encoding.
    pub fn decode(bytes: &[u8]) -> Result<Self, EscrowError> {
        if bytes.len() != IMMUTABLES_ENCODED_LEN {
            return Err(EscrowError::InvalidImmutables("encoding must be 256 bytes"));
        }
        let word = |i: usize| &bytes[i * 32..(i + 1) * 32];

        let mut order_hash = [0u8; 32];
        order_hash.copy_from_slice(word(0));
        let mut hashlock = [0u8; 32];
        hashlock.copy_from_slice(word(1));
        let mut packed = [0u8; PACKED_TIMELOCKS_LEN];
        packed.copy_from_slice(word(7));

        Ok(Self {
            order_hash,
            hashlock,
            maker: read_address(word(2))?,
            taker: read_address(word(3))?,
            token: read_address(word(4))?,
            amount: read_amount(word(5))?,
            safety_deposit: read_amount(word(6))?,
            timelocks: Timelocks::unpack(&packed),
        })
    }

    /// Keccak-256 of the canonical encoding.
    pub fn hash(&self) -> Hash {
        keccak256(&self.encode())
    }

    /// Reject zero order hash, hashlock or amount.
    pub fn validate(&self) -> Result<(), EscrowError> {
        if is_zero(&self.order_hash) {
            return Err(EscrowError::InvalidImmutables("order hash is zero"));
        }
        if is_zero(&self.hashlock) {
            return Err(EscrowError::InvalidImmutables("hashlock is zero"));
        }
        if self.amount == 0 {
            return Err(EscrowError::InvalidImmutables("amount is zero"));
        }
        Ok(())
    }
}
