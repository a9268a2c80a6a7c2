//! # Shared Types Crate
//!
//! Value types shared by every escrow subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Hash`, `Address`, `Amount` and `ChainId`
//!   are defined once here and re-used by all crates.
//! - **Explicit Time**: no subsystem reads the wall clock directly; every
//!   time-dependent operation goes through the [`Clock`] port so tests can
//!   pin the current time.

pub mod chains;
pub mod clock;
pub mod entities;

pub use chains::*;
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use entities::*;
