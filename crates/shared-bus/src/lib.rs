//! # Shared Bus - Swap Notifications
//!
//! Broadcast channel carrying escrow lifecycle, registry and order
//! notifications to any number of observers (relayers, indexers, tests).
//!
//! ## Choreography
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ EscrowFactory│                    │   Relayer    │
//! │ ChainRegistry│    publish()       │   Indexer    │
//! │ Coordinator  │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Publishing never blocks and never fails the publishing operation: an
//! event with no subscribers is counted and dropped.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, SwapEvent};
pub use publisher::{EventPublisher, InMemoryEventBus, SharedPublisher};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
