//! # Secret Generation and Verification
//!
//! SHA-256 hashlocks over 32-byte secrets.

use rand::RngCore;
use sha2::{Digest, Sha256};
use shared_types::Hash;

use crate::domain::Secret;

/// Generate a random secret.
pub fn generate_random_secret() -> Secret {
    let mut secret = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

/// Hashlock committing to `secret`.
pub fn create_hash_lock(secret: &Secret) -> Hash {
    Sha256::digest(secret).into()
}

/// Whether `secret` opens `hash_lock`.
pub fn verify_secret(secret: &Secret, hash_lock: &Hash) -> bool {
    create_hash_lock(secret) == *hash_lock
}
