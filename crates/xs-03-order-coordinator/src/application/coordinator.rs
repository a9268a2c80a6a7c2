//! # Order Coordinator
//!
//! Tracks orders from submission to settlement and opens their escrows
//! through the escrow API. Value never passes through the coordinator;
//! makers and resolvers lock, claim and cancel on the escrows directly.
//!
//! The order table guard is never held across an escrow call. Each
//! operation reads the order, releases the guard, calls the escrow API,
//! then re-checks the status before writing. The escrow side refuses a
//! second escrow per order and side, so two racing resolvers cannot both
//! match.
//!
//! The resolver's safety deposit is posted on the destination escrow, so a
//! match must already cover the destination minimum for `dst_amount`.
//! Otherwise every later commit would fail and the order would be stuck
//! in `Matched`.

use parking_lot::RwLock;
use shared_bus::{SharedPublisher, SwapEvent};
use shared_types::{is_zero, short_hex, Address, Amount, EscrowSide, Hash, SharedClock};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::Arc;
use swap_telemetry::{metric_inc, ORDERS};
use tracing::{debug, info, warn};
use xs_01_destination_chains::SharedChainRegistry;
use xs_02_escrow::{EscrowApi, EscrowError, EscrowReceipt, EscrowState, Immutables, TimelockStage, Timelocks};

use crate::config::CoordinatorConfig;
use crate::domain::{Order, OrderError, OrderRequest, OrderStatus};

/// Order book and resolver allow-list.
pub struct OrderCoordinator {
    admin: RwLock<Address>,
    default_list_limit: usize,
    max_list_limit: usize,
    registry: SharedChainRegistry,
    escrows: Arc<dyn EscrowApi>,
    clock: SharedClock,
    publisher: Option<SharedPublisher>,
    orders: RwLock<BTreeMap<Hash, Order>>,
    resolvers: RwLock<BTreeSet<Address>>,
}

impl OrderCoordinator {
    /// Create a coordinator from a validated config.
    pub fn new(
        config: CoordinatorConfig,
        registry: SharedChainRegistry,
        escrows: Arc<dyn EscrowApi>,
        clock: SharedClock,
    ) -> Result<Self, OrderError> {
        config.validate()?;
        info!(
            admin = %short_hex(&config.admin),
            resolvers = config.resolvers.len(),
            "[xs-03] Order coordinator initialized"
        );
        Ok(Self {
            admin: RwLock::new(config.admin),
            default_list_limit: config.default_list_limit,
            max_list_limit: config.max_list_limit,
            registry,
            escrows,
            clock,
            publisher: None,
            orders: RwLock::new(BTreeMap::new()),
            resolvers: RwLock::new(config.resolvers.into_iter().collect()),
        })
    }

    /// Publish order events to `publisher`.
    pub fn with_publisher(mut self, publisher: SharedPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Resolver administrator.
    pub fn admin(&self) -> Address {
        *self.admin.read()
    }

    /// Hand resolver administration to `new_admin`.
    pub fn set_admin(&self, caller: &Address, new_admin: Address) -> Result<(), OrderError> {
        if is_zero(&new_admin) {
            return Err(OrderError::Config("admin is zero".into()));
        }
        {
            let mut admin = self.admin.write();
            if *caller != *admin {
                return Err(OrderError::Unauthorized);
            }
            *admin = new_admin;
        }
        info!(
            from = %short_hex(caller),
            to = %short_hex(&new_admin),
            "[xs-03] Admin rotated"
        );
        Ok(())
    }

    // =========================================================================
    // RESOLVERS
    // =========================================================================

    /// Authorize a resolver. Returns `false` if already listed.
    pub fn add_resolver(&self, caller: &Address, resolver: Address) -> Result<bool, OrderError> {
        self.require_admin(caller)?;
        let added = self.resolvers.write().insert(resolver);
        if added {
            info!(resolver = %short_hex(&resolver), "[xs-03] Resolver authorized");
        }
        Ok(added)
    }

    /// Revoke a resolver. Returns `false` if it was not listed.
    pub fn remove_resolver(&self, caller: &Address, resolver: &Address) -> Result<bool, OrderError> {
        self.require_admin(caller)?;
        let removed = self.resolvers.write().remove(resolver);
        if removed {
            info!(resolver = %short_hex(resolver), "[xs-03] Resolver revoked");
        }
        Ok(removed)
    }

    /// Whether `resolver` may match orders.
    pub fn is_authorized_resolver(&self, resolver: &Address) -> bool {
        self.resolvers.read().contains(resolver)
    }

    /// Authorized resolvers in ascending order after the `start_after`
    /// cursor. `limit` follows the same default and cap as `list_orders`.
    pub fn list_resolvers(&self, start_after: Option<Address>, limit: Option<usize>) -> Vec<Address> {
        let lower = match start_after {
            Some(cursor) => Bound::Excluded(cursor),
            None => Bound::Unbounded,
        };
        self.resolvers
            .read()
            .range((lower, Bound::Unbounded))
            .take(self.page_limit(limit))
            .copied()
            .collect()
    }

    fn require_admin(&self, caller: &Address) -> Result<(), OrderError> {
        if *caller != self.admin() {
            return Err(OrderError::Unauthorized);
        }
        Ok(())
    }

    fn require_resolver(&self, resolver: &Address) -> Result<(), OrderError> {
        if !self.is_authorized_resolver(resolver) {
            return Err(OrderError::ResolverNotAuthorized(*resolver));
        }
        Ok(())
    }

    // =========================================================================
    // ORDER LIFECYCLE
    // =========================================================================

    /// Submit an order. Its parameters are validated by the destination
    /// chain's adapter; without explicit timelocks a schedule is derived
    /// from the chain's default timelock.
    pub fn create_order(&self, request: OrderRequest) -> Result<Hash, OrderError> {
        if is_zero(&request.maker) {
            return Err(OrderError::InvalidOrder("maker is zero".into()));
        }
        if request.src_amount == 0 || request.dst_amount == 0 {
            return Err(OrderError::InvalidOrder("amounts must be non-zero".into()));
        }
        if is_zero(&request.hashlock) {
            return Err(OrderError::InvalidOrder("hashlock is zero".into()));
        }

        let (validation, default_window) = {
            let registry = self.registry.read();
            let validation =
                registry.validate_order_params(request.dst_chain_id, &request.params, request.dst_amount)?;
            let info = registry.chain_info(request.dst_chain_id)?;
            (validation, info.default_timelock_seconds)
        };
        if !validation.is_valid {
            return Err(OrderError::InvalidOrder(validation.error_message));
        }

        let timelocks = match request.timelocks {
            Some(timelocks) => timelocks,
            None => {
                let window = u32::try_from(default_window)
                    .map_err(|_| OrderError::InvalidOrder("default timelock out of range".into()))?;
                Timelocks::from_window(window)?
            }
        };

        let order_hash = request.order_hash();
        let dst_chain_id = request.dst_chain_id;
        let maker = request.maker;
        let order = Order::from_request(request, order_hash, timelocks, validation.estimated_cost, self.clock.now());
        {
            let mut orders = self.orders.write();
            if orders.contains_key(&order_hash) {
                return Err(OrderError::OrderAlreadyExists(order_hash));
            }
            orders.insert(order_hash, order);
        }

        metric_inc!(ORDERS, &["created"]);
        info!(
            order = %short_hex(&order_hash),
            maker = %short_hex(&maker),
            dst_chain = dst_chain_id,
            "[xs-03] Order created"
        );
        self.publish(SwapEvent::OrderCreated {
            order_hash,
            maker,
            dst_chain_id,
        });
        Ok(order_hash)
    }

    /// Withdraw an order. Maker only.
    ///
    /// A pending order can always be withdrawn. A matched order can be
    /// withdrawn while its source escrow is still unfunded; the empty
    /// escrow stays behind in `Created`.
    pub fn cancel_order(&self, caller: &Address, order_hash: &Hash) -> Result<(), OrderError> {
        let order = self.order(order_hash).ok_or(OrderError::OrderNotFound(*order_hash))?;
        if *caller != order.maker {
            return Err(OrderError::Unauthorized);
        }
        let cancellable = match order.status {
            OrderStatus::Pending => true,
            OrderStatus::Matched => matches!(
                self.escrows.escrow_for_order(order_hash, EscrowSide::Source),
                Some(record) if record.state == EscrowState::Created
            ),
            _ => false,
        };
        if !cancellable {
            return Err(OrderError::InvalidStatus {
                status: order.status,
                operation: "cancel",
            });
        }
        self.update(order_hash, order.status, "cancel", |o| {
            o.status = OrderStatus::Cancelled;
        })?;

        metric_inc!(ORDERS, &["cancelled"]);
        info!(order = %short_hex(order_hash), "[xs-03] Order cancelled by maker");
        self.publish(SwapEvent::OrderCancelled {
            order_hash: *order_hash,
        });
        Ok(())
    }

    /// Match a pending order and open its source escrow with the resolver
    /// as taker.
    pub fn match_order(
        &self,
        resolver: &Address,
        order_hash: &Hash,
        safety_deposit: Amount,
    ) -> Result<EscrowReceipt, OrderError> {
        self.require_resolver(resolver)?;
        let order = self.expect_status(order_hash, OrderStatus::Pending, "match")?;

        let required = self
            .escrows
            .required_safety_deposit(order.dst_chain_id, order.dst_amount)?;
        if safety_deposit < required {
            return Err(EscrowError::SafetyDepositTooLow {
                required,
                provided: safety_deposit,
            }
            .into());
        }
        if safety_deposit.checked_add(order.resolver_fee).is_none() {
            return Err(EscrowError::Overflow.into());
        }

        let immutables = Immutables {
            order_hash: *order_hash,
            hashlock: order.hashlock,
            maker: order.maker,
            taker: *resolver,
            token: order.src_token,
            amount: order.src_amount,
            safety_deposit,
            timelocks: order.timelocks,
        };
        let receipt = self
            .escrows
            .create_src_escrow(resolver, immutables, order.dst_chain_id)?;

        self.update(order_hash, OrderStatus::Pending, "match", |order| {
            order.status = OrderStatus::Matched;
            order.resolver = Some(*resolver);
            order.safety_deposit = safety_deposit;
            order.src_escrow = Some(receipt.address);
            order.timelocks = receipt.immutables.timelocks;
            order.src_cancellation = Some(receipt.immutables.timelocks.get(TimelockStage::SrcCancellation));
        })?;

        metric_inc!(ORDERS, &["matched"]);
        info!(
            order = %short_hex(order_hash),
            resolver = %short_hex(resolver),
            escrow = %short_hex(&receipt.address),
            "[xs-03] Order matched"
        );
        self.publish(SwapEvent::OrderMatched {
            order_hash: *order_hash,
            resolver: *resolver,
        });
        Ok(receipt)
    }

    /// Open the destination escrow of a matched order. `payment` is the
    /// native value the resolver attaches and must cover the safety deposit
    /// plus the resolver fee; the part above that is returned in the
    /// receipt's refund.
    pub fn commit_destination(
        &self,
        resolver: &Address,
        order_hash: &Hash,
        payment: Amount,
    ) -> Result<EscrowReceipt, OrderError> {
        let order = self.expect_status(order_hash, OrderStatus::Matched, "commit")?;
        if order.resolver != Some(*resolver) {
            return Err(OrderError::Unauthorized);
        }
        let src_cancellation = order.src_cancellation.ok_or(OrderError::InvalidStatus {
            status: order.status,
            operation: "commit",
        })?;
        let deposit = order.destination_deposit().ok_or(EscrowError::Overflow)?;

        let immutables = Immutables {
            order_hash: *order_hash,
            hashlock: order.hashlock,
            maker: order.maker,
            taker: *resolver,
            token: order.dst_token,
            amount: order.dst_amount,
            safety_deposit: deposit,
            timelocks: order.timelocks,
        };
        let receipt = self.escrows.create_dst_escrow(
            resolver,
            immutables,
            order.dst_chain_id,
            src_cancellation,
            payment,
        )?;

        self.update(order_hash, OrderStatus::Matched, "commit", |order| {
            order.status = OrderStatus::Committed;
            order.dst_escrow = Some(receipt.address);
        })?;

        metric_inc!(ORDERS, &["committed"]);
        info!(
            order = %short_hex(order_hash),
            escrow = %short_hex(&receipt.address),
            refund = receipt.refund,
            "[xs-03] Destination escrow committed"
        );
        Ok(receipt)
    }

    /// Derive completion or refund from the escrow states.
    ///
    /// Both escrows claimed makes the order `Completed`. A cancelled source
    /// escrow with a destination that is cancelled, absent or never funded
    /// makes it `Refunded`. Anything else leaves the status unchanged.
    pub fn sync_order(&self, order_hash: &Hash) -> Result<OrderStatus, OrderError> {
        let order = self.order(order_hash).ok_or(OrderError::OrderNotFound(*order_hash))?;
        if !matches!(order.status, OrderStatus::Matched | OrderStatus::Committed) {
            return Ok(order.status);
        }

        let src = self
            .escrows
            .escrow_for_order(order_hash, EscrowSide::Source)
            .map(|r| r.state);
        let dst = self
            .escrows
            .escrow_for_order(order_hash, EscrowSide::Destination)
            .map(|r| r.state);

        let next = match (src, dst) {
            (Some(EscrowState::Claimed), Some(EscrowState::Claimed)) => OrderStatus::Completed,
            (Some(EscrowState::Cancelled), None | Some(EscrowState::Cancelled) | Some(EscrowState::Created)) => {
                OrderStatus::Refunded
            }
            (Some(EscrowState::Cancelled), Some(EscrowState::Claimed)) => {
                warn!(
                    order = %short_hex(order_hash),
                    "[xs-03] Source refunded after destination claim"
                );
                return Ok(order.status);
            }
            _ => return Ok(order.status),
        };

        let prior = order.status;
        {
            let mut orders = self.orders.write();
            match orders.get_mut(order_hash) {
                Some(o) if o.status == prior => o.status = next,
                Some(o) => return Ok(o.status),
                None => return Err(OrderError::OrderNotFound(*order_hash)),
            }
        }

        metric_inc!(ORDERS, &[next.as_str()]);
        info!(
            order = %short_hex(order_hash),
            from = %prior,
            to = %next,
            "[xs-03] Order settled"
        );
        Ok(next)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Snapshot of an order.
    pub fn order(&self, order_hash: &Hash) -> Option<Order> {
        self.orders.read().get(order_hash).cloned()
    }

    /// Number of orders in any status.
    pub fn order_count(&self) -> usize {
        self.orders.read().len()
    }

    /// Orders in ascending hash order, optionally filtered by status, after
    /// the `start_after` cursor. `limit` defaults to 30 and is capped at 100.
    pub fn list_orders(
        &self,
        status: Option<OrderStatus>,
        start_after: Option<Hash>,
        limit: Option<usize>,
    ) -> Vec<Order> {
        let limit = self.page_limit(limit);
        let lower = match start_after {
            Some(cursor) => Bound::Excluded(cursor),
            None => Bound::Unbounded,
        };
        self.orders
            .read()
            .range((lower, Bound::Unbounded))
            .map(|(_, order)| order)
            .filter(|order| status.map_or(true, |s| order.status == s))
            .take(limit)
            .cloned()
            .collect()
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn page_limit(&self, limit: Option<usize>) -> usize {
        limit.unwrap_or(self.default_list_limit).min(self.max_list_limit)
    }

    fn expect_status(
        &self,
        order_hash: &Hash,
        expected: OrderStatus,
        operation: &'static str,
    ) -> Result<Order, OrderError> {
        let order = self.order(order_hash).ok_or(OrderError::OrderNotFound(*order_hash))?;
        if order.status != expected {
            return Err(OrderError::InvalidStatus {
                status: order.status,
                operation,
            });
        }
        Ok(order)
    }

    fn update<F>(
        &self,
        order_hash: &Hash,
        expected: OrderStatus,
        operation: &'static str,
        apply: F,
    ) -> Result<(), OrderError>
    where
        F: FnOnce(&mut Order),
    {
        let mut orders = self.orders.write();
        let order = orders
            .get_mut(order_hash)
            .ok_or(OrderError::OrderNotFound(*order_hash))?;
        if order.status != expected {
            debug!(
                order = %short_hex(order_hash),
                status = %order.status,
                "[xs-03] Status moved during {}",
                operation
            );
            return Err(OrderError::InvalidStatus {
                status: order.status,
                operation,
            });
        }
        apply(order);
        Ok(())
    }

    fn publish(&self, event: SwapEvent) {
        if let Some(publisher) = &self.publisher {
            publisher.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{EventFilter, InMemoryEventBus};
    use shared_types::{ManualClock, NATIVE_TOKEN, NEAR_MAINNET};
    use xs_01_destination_chains::{
        ChainError, ChainRegistry, ChainSpecificParams, ExecutionParamCodec, NearAdapter, NearAdapterConfig,
        NearExecutionParams,
    };
    use xs_02_escrow::{create_hash_lock, EscrowError, EscrowFactory, FactoryConfig, InMemoryLedger, Ledger, Secret};

    const ADMIN: Address = [0xAD; 20];
    const MAKER: Address = [0x01; 20];
    const RESOLVER: Address = [0x02; 20];
    const OTHER: Address = [0x04; 20];
    const TOKEN: Address = [0x03; 20];
    const SECRET: Secret = [0x5E; 32];
    const ONE: Amount = 1_000_000_000_000_000_000;
    const T0: u64 = 1_700_000_000;

    struct Harness {
        coordinator: OrderCoordinator,
        factory: Arc<EscrowFactory>,
        ledger: Arc<InMemoryLedger>,
        clock: Arc<ManualClock>,
        bus: Arc<InMemoryEventBus>,
    }

    fn harness() -> Harness {
        let mut registry = ChainRegistry::new(ADMIN);
        registry
            .register(
                &ADMIN,
                NEAR_MAINNET,
                Arc::new(NearAdapter::new(NearAdapterConfig::mainnet()).unwrap()),
            )
            .unwrap();
        let registry = registry.into_shared();
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.mint(MAKER, TOKEN, 10 * ONE).unwrap();
        ledger.mint(RESOLVER, TOKEN, 10 * ONE).unwrap();
        ledger.mint(RESOLVER, NATIVE_TOKEN, 10 * ONE).unwrap();
        let clock = Arc::new(ManualClock::new(T0));
        let bus = Arc::new(InMemoryEventBus::new());
        let factory = Arc::new(
            EscrowFactory::new(FactoryConfig::for_testing(), registry.clone(), ledger.clone(), clock.clone()).unwrap(),
        );
        let config = CoordinatorConfig {
            resolvers: vec![RESOLVER],
            ..CoordinatorConfig::for_testing()
        };
        let coordinator = OrderCoordinator::new(config, registry, factory.clone(), clock.clone())
            .unwrap()
            .with_publisher(bus.clone());
        Harness {
            coordinator,
            factory,
            ledger,
            clock,
            bus,
        }
    }

    fn near_params(destination: &str) -> ChainSpecificParams {
        let exec = NearExecutionParams {
            contract_id: "fusion-escrow.near".into(),
            method_name: "execute_fusion_order".into(),
            args: br#"{"order_hash":"ab"}"#.to_vec(),
            attached_deposit: 0,
            gas: 300_000_000_000_000,
        };
        ChainSpecificParams::new(destination, exec.encode().unwrap())
    }

    fn request() -> OrderRequest {
        OrderRequest {
            maker: MAKER,
            src_token: TOKEN,
            src_amount: ONE,
            dst_chain_id: NEAR_MAINNET,
            dst_token: TOKEN,
            dst_amount: ONE,
            resolver_fee: 0,
            params: near_params("alice.near"),
            hashlock: create_hash_lock(&SECRET),
            timelocks: None,
            nonce: 0,
        }
    }

    fn matched(h: &Harness) -> Hash {
        let hash = h.coordinator.create_order(request()).unwrap();
        h.coordinator.match_order(&RESOLVER, &hash, ONE / 20).unwrap();
        hash
    }

    #[test]
    fn test_create_order_derives_default_schedule() {
        let h = harness();
        let hash = h.coordinator.create_order(request()).unwrap();
        let order = h.coordinator.order(&hash).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_at, T0);
        assert!(order.timelocks.validate_ordering().is_ok());
        assert!(order.estimated_cost > 0);
    }

    #[test]
    fn test_create_order_rejects_duplicates_and_bad_input() {
        let h = harness();
        let hash = h.coordinator.create_order(request()).unwrap();
        assert_eq!(
            h.coordinator.create_order(request()),
            Err(OrderError::OrderAlreadyExists(hash))
        );

        let mut r = request();
        r.src_amount = 0;
        assert!(matches!(h.coordinator.create_order(r), Err(OrderError::InvalidOrder(_))));

        let mut r = request();
        r.hashlock = [0; 32];
        assert!(matches!(h.coordinator.create_order(r), Err(OrderError::InvalidOrder(_))));

        let mut r = request();
        r.params = near_params("Not A Near Account!");
        assert!(matches!(h.coordinator.create_order(r), Err(OrderError::InvalidOrder(_))));

        let mut r = request();
        r.dst_chain_id = 1;
        assert_eq!(
            h.coordinator.create_order(r),
            Err(OrderError::Chain(ChainError::ChainNotSupported(1)))
        );
        assert_eq!(h.coordinator.order_count(), 1);
    }

    #[test]
    fn test_cancel_order_maker_only_and_pending_only() {
        let h = harness();
        let hash = h.coordinator.create_order(request()).unwrap();
        assert_eq!(h.coordinator.cancel_order(&OTHER, &hash), Err(OrderError::Unauthorized));
        h.coordinator.cancel_order(&MAKER, &hash).unwrap();
        assert_eq!(
            h.coordinator.cancel_order(&MAKER, &hash),
            Err(OrderError::InvalidStatus {
                status: OrderStatus::Cancelled,
                operation: "cancel",
            })
        );
        assert!(matches!(
            h.coordinator.match_order(&RESOLVER, &hash, ONE / 20),
            Err(OrderError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_match_requires_authorized_resolver() {
        let h = harness();
        let hash = h.coordinator.create_order(request()).unwrap();
        assert_eq!(
            h.coordinator.match_order(&OTHER, &hash, ONE / 20),
            Err(OrderError::ResolverNotAuthorized(OTHER))
        );
        assert_eq!(h.factory.escrow_count(), 0);
    }

    #[test]
    fn test_match_opens_source_escrow() {
        let h = harness();
        let hash = matched(&h);
        let order = h.coordinator.order(&hash).unwrap();
        assert_eq!(order.status, OrderStatus::Matched);
        assert_eq!(order.resolver, Some(RESOLVER));

        let record = h.factory.escrow(&order.src_escrow.unwrap()).unwrap();
        assert_eq!(record.state, EscrowState::Created);
        assert_eq!(record.immutables.taker, RESOLVER);
        assert_eq!(
            order.src_cancellation,
            Some(T0 + u64::from(order.timelocks.offset(TimelockStage::SrcCancellation)))
        );
    }

    #[test]
    fn test_match_with_low_deposit_leaves_order_pending() {
        let h = harness();
        let hash = h.coordinator.create_order(request()).unwrap();
        assert!(matches!(
            h.coordinator.match_order(&RESOLVER, &hash, 1),
            Err(OrderError::Escrow(EscrowError::SafetyDepositTooLow { .. }))
        ));
        assert_eq!(h.coordinator.order(&hash).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn test_match_deposit_covers_destination_amount() {
        let h = harness();
        let mut r = request();
        r.dst_amount = 4 * ONE;
        let hash = h.coordinator.create_order(r).unwrap();

        assert_eq!(
            h.coordinator.match_order(&RESOLVER, &hash, ONE / 20),
            Err(OrderError::Escrow(EscrowError::SafetyDepositTooLow {
                required: 4 * ONE / 20,
                provided: ONE / 20,
            }))
        );
        assert_eq!(h.coordinator.order(&hash).unwrap().status, OrderStatus::Pending);
        assert_eq!(h.factory.escrow_count(), 0);

        h.coordinator.match_order(&RESOLVER, &hash, 4 * ONE / 20).unwrap();
        let receipt = h.coordinator.commit_destination(&RESOLVER, &hash, ONE).unwrap();
        assert_eq!(receipt.refund, ONE - 4 * ONE / 20);
        assert_eq!(h.coordinator.order(&hash).unwrap().status, OrderStatus::Committed);
    }

    #[test]
    fn test_maker_cancels_matched_order_until_source_locked() {
        let h = harness();
        let hash = matched(&h);
        assert_eq!(h.coordinator.cancel_order(&RESOLVER, &hash), Err(OrderError::Unauthorized));
        h.coordinator.cancel_order(&MAKER, &hash).unwrap();
        assert_eq!(h.coordinator.order(&hash).unwrap().status, OrderStatus::Cancelled);
        assert!(matches!(
            h.coordinator.commit_destination(&RESOLVER, &hash, ONE / 20),
            Err(OrderError::InvalidStatus { .. })
        ));

        let mut r = request();
        r.nonce = 1;
        let hash = h.coordinator.create_order(r).unwrap();
        h.coordinator.match_order(&RESOLVER, &hash, ONE / 20).unwrap();
        let src = h.coordinator.order(&hash).unwrap().src_escrow.unwrap();
        h.factory.lock(&MAKER, &src).unwrap();
        assert_eq!(
            h.coordinator.cancel_order(&MAKER, &hash),
            Err(OrderError::InvalidStatus {
                status: OrderStatus::Matched,
                operation: "cancel",
            })
        );
    }

    #[test]
    fn test_commit_charges_resolver_fee() {
        let h = harness();
        let mut r = request();
        r.resolver_fee = ONE / 100;
        let hash = h.coordinator.create_order(r).unwrap();
        h.coordinator.match_order(&RESOLVER, &hash, ONE / 20).unwrap();

        assert_eq!(
            h.coordinator.commit_destination(&RESOLVER, &hash, ONE / 20),
            Err(OrderError::Escrow(EscrowError::SafetyDepositTooLow {
                required: ONE / 20 + ONE / 100,
                provided: ONE / 20,
            }))
        );
        let receipt = h.coordinator.commit_destination(&RESOLVER, &hash, ONE / 10).unwrap();
        assert_eq!(receipt.refund, ONE / 10 - ONE / 20 - ONE / 100);
        assert_eq!(
            h.ledger.balance_of(&receipt.address, &NATIVE_TOKEN),
            ONE / 20 + ONE / 100
        );
        let record = h.factory.escrow(&receipt.address).unwrap();
        assert_eq!(record.immutables.safety_deposit, ONE / 20 + ONE / 100);
    }

    #[test]
    fn test_commit_destination() {
        let h = harness();
        let hash = matched(&h);
        assert_eq!(
            h.coordinator.commit_destination(&OTHER, &hash, ONE),
            Err(OrderError::Unauthorized)
        );
        let receipt = h.coordinator.commit_destination(&RESOLVER, &hash, ONE / 10).unwrap();
        assert_eq!(receipt.refund, ONE / 20);
        assert_eq!(h.ledger.balance_of(&receipt.address, &NATIVE_TOKEN), ONE / 20);

        let order = h.coordinator.order(&hash).unwrap();
        assert_eq!(order.status, OrderStatus::Committed);
        assert_eq!(order.dst_escrow, Some(receipt.address));
    }

    #[test]
    fn test_sync_order_completed() {
        let h = harness();
        let hash = matched(&h);
        h.coordinator.commit_destination(&RESOLVER, &hash, ONE / 20).unwrap();
        let order = h.coordinator.order(&hash).unwrap();
        let (src, dst) = (order.src_escrow.unwrap(), order.dst_escrow.unwrap());

        h.factory.lock(&MAKER, &src).unwrap();
        h.factory.lock(&RESOLVER, &dst).unwrap();
        assert_eq!(h.coordinator.sync_order(&hash).unwrap(), OrderStatus::Committed);

        let dst_open = order.timelocks.offset(TimelockStage::DstWithdrawal);
        let src_open = order.timelocks.offset(TimelockStage::SrcWithdrawal);
        h.clock.advance_time(u64::from(dst_open.max(src_open)));
        h.factory.claim(&RESOLVER, &dst, &SECRET).unwrap();
        h.factory.claim(&RESOLVER, &src, &SECRET).unwrap();

        assert_eq!(h.coordinator.sync_order(&hash).unwrap(), OrderStatus::Completed);
        assert_eq!(h.coordinator.sync_order(&hash).unwrap(), OrderStatus::Completed);
    }

    #[test]
    fn test_sync_order_refunded() {
        let h = harness();
        let hash = matched(&h);
        let order = h.coordinator.order(&hash).unwrap();
        let src = order.src_escrow.unwrap();
        h.factory.lock(&MAKER, &src).unwrap();

        h.clock.set_time(order.src_cancellation.unwrap());
        h.factory.cancel(&MAKER, &src).unwrap();
        assert_eq!(h.coordinator.sync_order(&hash).unwrap(), OrderStatus::Refunded);
        assert_eq!(h.ledger.balance_of(&MAKER, &TOKEN), 10 * ONE);
    }

    #[test]
    fn test_resolver_admin() {
        let h = harness();
        assert_eq!(h.coordinator.add_resolver(&OTHER, OTHER), Err(OrderError::Unauthorized));
        assert!(h.coordinator.add_resolver(&ADMIN, OTHER).unwrap());
        assert!(!h.coordinator.add_resolver(&ADMIN, OTHER).unwrap());
        assert_eq!(h.coordinator.list_resolvers(None, None), vec![RESOLVER, OTHER]);
        assert!(h.coordinator.remove_resolver(&ADMIN, &RESOLVER).unwrap());
        assert!(!h.coordinator.is_authorized_resolver(&RESOLVER));
    }

    #[test]
    fn test_set_admin() {
        let h = harness();
        const NEXT: Address = [0xAE; 20];
        assert_eq!(h.coordinator.set_admin(&OTHER, NEXT), Err(OrderError::Unauthorized));
        assert!(matches!(h.coordinator.set_admin(&ADMIN, [0; 20]), Err(OrderError::Config(_))));
        h.coordinator.set_admin(&ADMIN, NEXT).unwrap();
        assert_eq!(h.coordinator.admin(), NEXT);
        assert_eq!(h.coordinator.add_resolver(&ADMIN, OTHER), Err(OrderError::Unauthorized));
        assert!(h.coordinator.add_resolver(&NEXT, OTHER).unwrap());
    }

    #[test]
    fn test_list_resolvers_pagination() {
        let h = harness();
        for byte in [0x10u8, 0x20, 0x30] {
            h.coordinator.add_resolver(&ADMIN, [byte; 20]).unwrap();
        }
        let first = h.coordinator.list_resolvers(None, Some(2));
        assert_eq!(first, vec![RESOLVER, [0x10; 20]]);
        let rest = h.coordinator.list_resolvers(first.last().copied(), None);
        assert_eq!(rest, vec![[0x20; 20], [0x30; 20]]);
        assert!(h.coordinator.list_resolvers(Some([0x30; 20]), None).is_empty());
        assert_eq!(h.coordinator.list_resolvers(None, Some(1_000)).len(), 4);
    }

    #[test]
    fn test_list_orders_pagination() {
        let h = harness();
        let mut hashes: Vec<Hash> = (0..5)
            .map(|nonce| {
                let mut r = request();
                r.nonce = nonce;
                h.coordinator.create_order(r).unwrap()
            })
            .collect();
        hashes.sort();
        h.coordinator.cancel_order(&MAKER, &hashes[0]).unwrap();

        let page = h.coordinator.list_orders(None, None, Some(2));
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].order_hash, hashes[0]);
        let next = h.coordinator.list_orders(None, Some(page[1].order_hash), None);
        assert_eq!(next.len(), 3);
        assert_eq!(next[0].order_hash, hashes[2]);

        let pending = h.coordinator.list_orders(Some(OrderStatus::Pending), None, None);
        assert_eq!(pending.len(), 4);
        assert_eq!(h.coordinator.list_orders(None, None, Some(1_000)).len(), 5);
    }

    #[test]
    fn test_order_events() {
        let h = harness();
        let mut sub = h.bus.subscribe(EventFilter::all());
        let hash = matched(&h);
        let events = sub.drain();
        assert_eq!(
            events,
            vec![
                SwapEvent::OrderCreated {
                    order_hash: hash,
                    maker: MAKER,
                    dst_chain_id: NEAR_MAINNET,
                },
                SwapEvent::OrderMatched {
                    order_hash: hash,
                    resolver: RESOLVER,
                },
            ]
        );
    }
}
