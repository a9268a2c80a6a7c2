//! # Swap Events
//!
//! All notifications that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, ChainId, EscrowSide, Hash};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapEvent {
    // =========================================================================
    // ESCROW LIFECYCLE (xs-02)
    // =========================================================================
    /// An escrow record was created at its deterministic address.
    EscrowCreated {
        /// Order the escrow belongs to.
        order_hash: Hash,
        /// Source or destination leg.
        side: EscrowSide,
        /// Deterministic escrow address.
        escrow: Address,
    },

    /// Funds were moved into escrow custody.
    EscrowLocked {
        /// Order the escrow belongs to.
        order_hash: Hash,
        /// SHA-256 hashlock guarding the funds.
        hashlock: Hash,
        /// Locked swap amount (excluding safety deposit).
        amount: Amount,
    },

    /// The secret was revealed and the escrow paid out.
    ///
    /// Relayers watch for this event to learn the secret and finish the
    /// opposite leg.
    EscrowClaimed {
        /// Order the escrow belongs to.
        order_hash: Hash,
        /// Account that submitted the secret.
        claimant: Address,
        /// The revealed preimage.
        secret: Hash,
    },

    /// The escrow timed out and funds returned to the depositor.
    EscrowCancelled {
        /// Order the escrow belongs to.
        order_hash: Hash,
        /// Account that received the refund.
        depositor: Address,
    },

    // =========================================================================
    // CHAIN REGISTRY (xs-01)
    // =========================================================================
    /// A destination chain adapter was registered.
    ChainRegistered {
        /// Registered chain.
        chain_id: ChainId,
        /// Adapter's chain name.
        name: String,
    },

    /// A destination chain adapter was replaced.
    ChainUpdated {
        /// Updated chain.
        chain_id: ChainId,
        /// New adapter's chain name.
        name: String,
    },

    /// A destination chain adapter was removed.
    ChainRemoved {
        /// Removed chain.
        chain_id: ChainId,
        /// Removed adapter's chain name.
        name: String,
    },

    // =========================================================================
    // ORDERS (xs-03)
    // =========================================================================
    /// A maker submitted a new order.
    OrderCreated {
        /// Order identity.
        order_hash: Hash,
        /// Maker address.
        maker: Address,
        /// Destination chain.
        dst_chain_id: ChainId,
    },

    /// A resolver matched an order and opened the source escrow.
    OrderMatched {
        /// Order identity.
        order_hash: Hash,
        /// Matching resolver.
        resolver: Address,
    },

    /// The maker withdrew an unmatched order.
    OrderCancelled {
        /// Order identity.
        order_hash: Hash,
    },
}

impl SwapEvent {
    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::EscrowCreated { .. }
            | Self::EscrowLocked { .. }
            | Self::EscrowClaimed { .. }
            | Self::EscrowCancelled { .. } => EventTopic::Escrow,
            Self::ChainRegistered { .. } | Self::ChainUpdated { .. } | Self::ChainRemoved { .. } => {
                EventTopic::Registry
            }
            Self::OrderCreated { .. } | Self::OrderMatched { .. } | Self::OrderCancelled { .. } => {
                EventTopic::Orders
            }
        }
    }

    /// Order hash carried by the event, if any.
    #[must_use]
    pub fn order_hash(&self) -> Option<&Hash> {
        match self {
            Self::EscrowCreated { order_hash, .. }
            | Self::EscrowLocked { order_hash, .. }
            | Self::EscrowClaimed { order_hash, .. }
            | Self::EscrowCancelled { order_hash, .. }
            | Self::OrderCreated { order_hash, .. }
            | Self::OrderMatched { order_hash, .. }
            | Self::OrderCancelled { order_hash } => Some(order_hash),
            Self::ChainRegistered { .. } | Self::ChainUpdated { .. } | Self::ChainRemoved { .. } => {
                None
            }
        }
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Escrow lifecycle events.
    Escrow,
    /// Chain registry changes.
    Registry,
    /// Order book events.
    Orders,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Restrict to a single order. `None` means all orders.
    pub order_hash: Option<Hash>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            order_hash: None,
        }
    }

    /// Create a filter for events about one order.
    #[must_use]
    pub fn for_order(order_hash: Hash) -> Self {
        Self {
            topics: Vec::new(),
            order_hash: Some(order_hash),
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &SwapEvent) -> bool {
        let topic_ok = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let order_ok = match &self.order_hash {
            None => true,
            Some(wanted) => event.order_hash() == Some(wanted),
        };

        topic_ok && order_ok
    }
}
