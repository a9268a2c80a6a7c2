//! # XS-02 Escrow
//!
//! Hashlocked escrow records with a seven-stage timelock schedule, created
//! at deterministic addresses by the escrow factory.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - One record per swap leg; the same state machine serves both sides
//! - SHA-256 hashlocks, one secret unlocks both legs
//! - Addresses derived from the immutables before creation
//! - Safety deposits sized by the destination chain's adapter
//!
//! ## Security Properties
//!
//! | Property | Mechanism |
//! |----------|-----------|
//! | At-most-once creation | Address reserved under the table's write guard |
//! | No claim of unfunded value | Claim and cancel require `Locked` |
//! | No double spend on re-entry | State changes before transfers run |
//! | All-or-nothing failures | Snapshot restored when the ledger rejects a batch |
//!
//! ## Module Structure
//!
//! ```text
//! xs-02-escrow/
//! ├── domain/          # EscrowRecord, Immutables, Timelocks, errors
//! ├── algorithms/      # Hashlocks, deterministic addressing
//! ├── ports/           # EscrowApi (inbound), Ledger (outbound)
//! ├── adapters/        # InMemoryLedger
//! ├── application/     # EscrowFactory
//! └── config.rs        # FactoryConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::InMemoryLedger;
pub use algorithms::{
    compute_escrow_address, compute_salt, create_hash_lock, generate_random_secret, verify_secret,
};
pub use application::EscrowFactory;
pub use config::{FactoryConfig, DEFAULT_MAX_TIMELOCK_SPAN_SECS};
pub use domain::{
    EscrowError, EscrowRecord, EscrowState, Immutables, LedgerError, Secret, SecureSecret,
    Settlement, TimelockStage, Timelocks, Transfer, IMMUTABLES_ENCODED_LEN,
};
pub use ports::{EscrowApi, EscrowReceipt, Ledger, SharedLedger};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
