//! # Ports Module
//!
//! The adapter port implemented by every destination chain.

pub mod adapter;

pub use adapter::{DestinationChainAdapter, SharedAdapter};
