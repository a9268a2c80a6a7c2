//! # Domain Invariants
//!
//! Safety deposit arithmetic and adapter metadata rules.

use shared_types::{Amount, ChainId, BPS_DENOMINATOR};

use super::entities::ChainInfo;
use super::errors::ChainError;

/// Default minimum safety deposit (5%).
pub const DEFAULT_SAFETY_DEPOSIT_BPS: u16 = 500;

/// Upper bound for any basis-point value.
pub const MAX_BPS: u16 = 10_000;

/// `floor(amount * bps / 10000)` without intermediate overflow.
///
/// Splitting `amount = q * 10000 + r` keeps every product within
/// `amount` for `bps <= 10000`.
pub fn min_safety_deposit(amount: Amount, bps: u16) -> Amount {
    let bps = Amount::from(bps);
    let q = amount / BPS_DENOMINATOR;
    let r = amount % BPS_DENOMINATOR;
    q * bps + r * bps / BPS_DENOMINATOR
}

/// Invariant: basis points lie in `1..=10000`.
pub fn invariant_bps_in_range(bps: u16) -> bool {
    (1..=MAX_BPS).contains(&bps)
}

/// Invariant: adapter metadata is registrable under `chain_id`.
pub fn invariant_adapter_valid(chain_id: ChainId, info: &ChainInfo) -> Result<(), ChainError> {
    if chain_id == 0 || info.chain_id == 0 {
        return Err(ChainError::InvalidAdapter("chain id must be non-zero".into()));
    }
    if info.name.trim().is_empty() {
        return Err(ChainError::InvalidAdapter("chain name must be non-empty".into()));
    }
    if info.min_safety_deposit_bps > MAX_BPS {
        return Err(ChainError::InvalidAdapter(format!(
            "safety deposit bps {} exceeds {}",
            info.min_safety_deposit_bps, MAX_BPS
        )));
    }
    if info.chain_id != chain_id {
        return Err(ChainError::ChainIdMismatch {
            expected: chain_id,
            actual: info.chain_id,
        });
    }
    Ok(())
}
