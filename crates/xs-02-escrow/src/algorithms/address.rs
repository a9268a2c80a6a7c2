//! # Deterministic Escrow Addressing
//!
//! `address = keccak256(0xff ‖ factory ‖ salt ‖ implementation)[12..]`
//! where `salt = keccak256(encode(immutables))`.

use shared_types::{keccak256, Address, Hash};

use crate::domain::Immutables;

/// Salt derived from the immutables.
pub fn compute_salt(immutables: &Immutables) -> Hash {
    immutables.hash()
}

/// Address for `salt` under `factory` and `implementation`.
pub fn compute_escrow_address(factory: &Address, salt: &Hash, implementation: &Hash) -> Address {
    let mut preimage = [0u8; 1 + 20 + 32 + 32];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(factory);
    preimage[21..53].copy_from_slice(salt);
    preimage[53..85].copy_from_slice(implementation);

    let digest = keccak256(&preimage);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}
