//! # Domain Module
//!
//! Orders, statuses and errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
