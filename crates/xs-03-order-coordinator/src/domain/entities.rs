//! # Domain Entities
//!
//! Orders and their lifecycle:
//!
//! ```text
//! Pending -> Matched -> Committed -> Completed
//!    |         |                 \-> Refunded
//!    \-> Cancelled <-/
//! ```

use serde::{Deserialize, Serialize};
use shared_types::{keccak256, Address, Amount, ChainId, Hash};
use std::fmt;
use xs_01_destination_chains::ChainSpecificParams;
use xs_02_escrow::Timelocks;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Awaiting a resolver.
    Pending,
    /// Source escrow opened by a resolver.
    Matched,
    /// Destination escrow opened.
    Committed,
    /// Both escrows claimed.
    Completed,
    /// Escrows cancelled after timeout.
    Refunded,
    /// Withdrawn by the maker before funding the source escrow.
    Cancelled,
}

impl OrderStatus {
    /// Lowercase label for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Matched => "matched",
            Self::Committed => "committed",
            Self::Completed => "completed",
            Self::Refunded => "refunded",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the order can no longer change.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Refunded | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A maker's swap intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Order creator.
    pub maker: Address,
    /// Token offered on the source chain.
    pub src_token: Address,
    /// Amount offered.
    pub src_amount: Amount,
    /// Chain the maker wants to receive on.
    pub dst_chain_id: ChainId,
    /// Token wanted on the destination chain.
    pub dst_token: Address,
    /// Amount wanted.
    pub dst_amount: Amount,
    /// Native fee the resolver bonds next to its safety deposit on the
    /// destination escrow. It returns to whoever claims or cancels that escrow.
    #[serde(default)]
    pub resolver_fee: Amount,
    /// Destination chain parameters.
    pub params: ChainSpecificParams,
    /// SHA-256 of the maker's secret.
    pub hashlock: Hash,
    /// Explicit schedule; derived from the chain default when absent.
    pub timelocks: Option<Timelocks>,
    /// Distinguishes otherwise identical orders.
    pub nonce: u64,
}

impl OrderRequest {
    /// Keccak-256 identity over every request field.
    pub fn order_hash(&self) -> Hash {
        let mut buf = Vec::with_capacity(256 + self.params.destination_address.len());
        buf.extend_from_slice(&self.maker);
        buf.extend_from_slice(&self.src_token);
        buf.extend_from_slice(&self.src_amount.to_be_bytes());
        buf.extend_from_slice(&self.dst_chain_id.to_be_bytes());
        buf.extend_from_slice(&self.dst_token);
        buf.extend_from_slice(&self.dst_amount.to_be_bytes());
        buf.extend_from_slice(&self.resolver_fee.to_be_bytes());
        buf.extend_from_slice(&self.hashlock);
        buf.extend_from_slice(&self.nonce.to_be_bytes());
        buf.extend_from_slice(&keccak256(&self.params.destination_address));
        buf.extend_from_slice(&keccak256(&self.params.execution_params));
        buf.extend_from_slice(&self.params.estimated_gas.to_be_bytes());
        buf.extend_from_slice(&keccak256(&self.params.additional_data));
        if let Some(t) = &self.timelocks {
            buf.extend_from_slice(&t.pack());
        }
        keccak256(&buf)
    }
}

/// An order tracked by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identity.
    pub order_hash: Hash,
    /// Order creator.
    pub maker: Address,
    /// Source token.
    pub src_token: Address,
    /// Source amount.
    pub src_amount: Amount,
    /// Destination chain.
    pub dst_chain_id: ChainId,
    /// Destination token.
    pub dst_token: Address,
    /// Destination amount.
    pub dst_amount: Amount,
    /// Fee bonded with the destination safety deposit.
    pub resolver_fee: Amount,
    /// Destination chain parameters.
    pub params: ChainSpecificParams,
    /// SHA-256 of the maker's secret.
    pub hashlock: Hash,
    /// Stage schedule used for both escrows.
    pub timelocks: Timelocks,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Matching resolver.
    pub resolver: Option<Address>,
    /// Safety deposit posted by the resolver.
    pub safety_deposit: Amount,
    /// Source escrow address.
    pub src_escrow: Option<Address>,
    /// Destination escrow address.
    pub dst_escrow: Option<Address>,
    /// Absolute source cancellation time, known once matched.
    pub src_cancellation: Option<u64>,
    /// Destination execution cost quoted at creation.
    pub estimated_cost: Amount,
    /// Creation time.
    pub created_at: u64,
    /// Request nonce.
    pub nonce: u64,
}

impl Order {
    /// New pending order.
    pub fn from_request(
        request: OrderRequest,
        order_hash: Hash,
        timelocks: Timelocks,
        estimated_cost: Amount,
        created_at: u64,
    ) -> Self {
        Self {
            order_hash,
            maker: request.maker,
            src_token: request.src_token,
            src_amount: request.src_amount,
            dst_chain_id: request.dst_chain_id,
            dst_token: request.dst_token,
            dst_amount: request.dst_amount,
            resolver_fee: request.resolver_fee,
            params: request.params,
            hashlock: request.hashlock,
            timelocks,
            status: OrderStatus::Pending,
            resolver: None,
            safety_deposit: 0,
            src_escrow: None,
            dst_escrow: None,
            src_cancellation: None,
            estimated_cost,
            created_at,
            nonce: request.nonce,
        }
    }

    /// Native value the destination escrow holds as its deposit:
    /// the safety deposit plus the resolver fee.
    pub fn destination_deposit(&self) -> Option<Amount> {
        self.safety_deposit.checked_add(self.resolver_fee)
    }
}
