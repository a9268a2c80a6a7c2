//! # Application Layer
//!
//! The order coordinator service.

pub mod coordinator;

pub use coordinator::OrderCoordinator;
