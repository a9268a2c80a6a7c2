//! # Domain Module
//!
//! Escrow records, immutables, timelock schedules and errors.

pub mod entities;
pub mod errors;
pub mod immutables;
pub mod secure_secret;
pub mod timelocks;

pub use entities::*;
pub use errors::*;
pub use immutables::*;
pub use secure_secret::SecureSecret;
pub use timelocks::*;
