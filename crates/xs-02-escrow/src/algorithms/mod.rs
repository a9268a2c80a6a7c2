//! # Algorithms Module
//!
//! Hashlocks and deterministic addressing.

pub mod address;
pub mod secret;

pub use address::{compute_escrow_address, compute_salt};
pub use secret::{create_hash_lock, generate_random_secret, verify_secret};
