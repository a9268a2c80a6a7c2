//! # XS-03 Order Coordinator
//!
//! Order lifecycle on top of the escrow factory: makers submit orders,
//! authorized resolvers match them and open both escrows.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Order Lifecycle
//!
//! ```text
//! create_order ──→ Pending ──match_order──→ Matched ──commit_destination──→ Committed
//!                     │                       │                              │
//!                cancel_order           cancel_order                     sync_order
//!                     ↓               (source unfunded)                      ↓
//!                 Cancelled ←─────────────────┘                 Completed | Refunded
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! xs-03-order-coordinator/
//! ├── domain/          # Order, OrderRequest, OrderStatus, errors
//! ├── application/     # OrderCoordinator
//! └── config.rs        # CoordinatorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;

// Re-exports
pub use application::OrderCoordinator;
pub use config::{CoordinatorConfig, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
pub use domain::{Order, OrderError, OrderRequest, OrderStatus};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
