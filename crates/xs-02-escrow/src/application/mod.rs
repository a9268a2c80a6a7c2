//! # Application Layer
//!
//! The escrow factory service.

pub mod factory;

pub use factory::EscrowFactory;
