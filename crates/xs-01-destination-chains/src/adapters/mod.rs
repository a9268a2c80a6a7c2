//! # Adapters Module
//!
//! Concrete destination chain adapters.

pub mod bitcoin;
pub mod cosmos;
pub mod near;

pub use bitcoin::BitcoinAdapter;
pub use cosmos::CosmosAdapter;
pub use near::NearAdapter;
