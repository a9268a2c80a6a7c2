//! # Escrow Factory
//!
//! Creates escrow records at deterministic addresses and routes record
//! operations by address.
//!
//! ## Effects Ordering
//!
//! Every operation reads the clock once, applies the record transition under
//! the table's write guard, drops the guard, and only then hands the
//! transfers to the ledger. A ledger that calls back into the factory sees
//! the post-transition state. If the ledger rejects the batch the record is
//! restored to its snapshot.
//!
//! Creation reserves the address with an `Uninitialized` record before any
//! value moves, so a concurrent creation of the same immutables fails with
//! `EscrowAlreadyExists` and the reserved record cannot be locked.

use parking_lot::RwLock;
use shared_bus::{SharedPublisher, SwapEvent};
use shared_types::{short_hex, Address, Amount, ChainId, EscrowSide, Hash, SharedClock, NATIVE_TOKEN};
use std::collections::HashMap;
use swap_telemetry::{log_escrow_event, metric_inc, ESCROWS_CANCELLED, ESCROWS_CLAIMED, ESCROWS_CREATED, ESCROWS_LOCKED};
use tracing::{debug, info, warn};
use xs_01_destination_chains::{invariant_bps_in_range, min_safety_deposit, SharedChainRegistry};

use crate::algorithms::{compute_escrow_address, compute_salt};
use crate::config::FactoryConfig;
use crate::domain::{EscrowError, EscrowRecord, Immutables, Secret, Settlement, TimelockStage, Transfer};
use crate::ports::{EscrowApi, EscrowReceipt, SharedLedger};

/// Mutable administrative settings.
#[derive(Debug, Clone)]
struct AdminState {
    owner: Address,
    paused: bool,
    min_safety_deposit_bps: u16,
    src_implementation: Hash,
    dst_implementation: Hash,
}

#[derive(Default)]
struct EscrowTable {
    records: HashMap<Address, EscrowRecord>,
    by_order: HashMap<(Hash, EscrowSide), Address>,
}

impl EscrowTable {
    fn reserve(&mut self, address: Address, order_hash: Hash, side: EscrowSide) -> Result<(), EscrowError> {
        if self.records.contains_key(&address) {
            return Err(EscrowError::EscrowAlreadyExists(address));
        }
        if let Some(existing) = self.by_order.get(&(order_hash, side)) {
            return Err(EscrowError::EscrowAlreadyExists(*existing));
        }
        self.records.insert(address, EscrowRecord::uninitialized(address));
        self.by_order.insert((order_hash, side), address);
        Ok(())
    }

    fn release(&mut self, address: &Address, order_hash: Hash, side: EscrowSide) {
        self.records.remove(address);
        self.by_order.remove(&(order_hash, side));
    }
}

/// Escrow factory and record table.
pub struct EscrowFactory {
    factory_address: Address,
    max_timelock_span_secs: u32,
    admin: RwLock<AdminState>,
    escrows: RwLock<EscrowTable>,
    registry: SharedChainRegistry,
    ledger: SharedLedger,
    clock: SharedClock,
    publisher: Option<SharedPublisher>,
}

impl EscrowFactory {
    /// Create a factory from a validated config.
    pub fn new(
        config: FactoryConfig,
        registry: SharedChainRegistry,
        ledger: SharedLedger,
        clock: SharedClock,
    ) -> Result<Self, EscrowError> {
        config.validate()?;
        info!(
            factory = %hex::encode(config.factory_address),
            bps = config.min_safety_deposit_bps,
            "[xs-02] Escrow factory initialized"
        );
        Ok(Self {
            factory_address: config.factory_address,
            max_timelock_span_secs: config.max_timelock_span_secs,
            admin: RwLock::new(AdminState {
                owner: config.owner,
                paused: false,
                min_safety_deposit_bps: config.min_safety_deposit_bps,
                src_implementation: config.src_implementation,
                dst_implementation: config.dst_implementation,
            }),
            escrows: RwLock::new(EscrowTable::default()),
            registry,
            ledger,
            clock,
            publisher: None,
        })
    }

    /// Publish escrow events to `publisher`.
    pub fn with_publisher(mut self, publisher: SharedPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Factory identity used in address derivation.
    pub fn factory_address(&self) -> Address {
        self.factory_address
    }

    /// Administrative identity.
    pub fn owner(&self) -> Address {
        self.admin.read().owner
    }

    /// Whether creation is halted.
    pub fn is_paused(&self) -> bool {
        self.admin.read().paused
    }

    /// Factory-wide safety deposit floor.
    pub fn min_safety_deposit_bps(&self) -> u16 {
        self.admin.read().min_safety_deposit_bps
    }

    /// Current `(source, destination)` implementation hashes.
    pub fn implementations(&self) -> (Hash, Hash) {
        let admin = self.admin.read();
        (admin.src_implementation, admin.dst_implementation)
    }

    /// Number of records, terminal ones included.
    pub fn escrow_count(&self) -> usize {
        self.escrows.read().records.len()
    }

    /// Registry the factory consults for chain minimums.
    pub fn registry(&self) -> &SharedChainRegistry {
        &self.registry
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    fn ensure_owner(&self, caller: &Address) -> Result<(), EscrowError> {
        if *caller != self.owner() {
            warn!(caller = %short_hex(caller), "[xs-02] Unauthorized admin call");
            return Err(EscrowError::Unauthorized);
        }
        Ok(())
    }

    /// Hand administration to `new_owner`.
    pub fn transfer_ownership(&self, caller: &Address, new_owner: Address) -> Result<(), EscrowError> {
        self.ensure_owner(caller)?;
        if shared_types::is_zero(&new_owner) {
            return Err(EscrowError::Config("owner is zero".into()));
        }
        self.admin.write().owner = new_owner;
        info!(
            from = %short_hex(caller),
            to = %short_hex(&new_owner),
            "[xs-02] Factory ownership transferred"
        );
        Ok(())
    }

    /// Halt escrow creation. Existing escrows are unaffected.
    pub fn pause(&self, caller: &Address) -> Result<(), EscrowError> {
        self.ensure_owner(caller)?;
        self.admin.write().paused = true;
        info!("[xs-02] Escrow creation paused");
        Ok(())
    }

    /// Resume escrow creation.
    pub fn unpause(&self, caller: &Address) -> Result<(), EscrowError> {
        self.ensure_owner(caller)?;
        self.admin.write().paused = false;
        info!("[xs-02] Escrow creation resumed");
        Ok(())
    }

    /// Set the factory-wide safety deposit floor (`1..=10000`).
    pub fn set_minimum_safety_deposit(&self, caller: &Address, bps: u16) -> Result<(), EscrowError> {
        self.ensure_owner(caller)?;
        if !invariant_bps_in_range(bps) {
            return Err(EscrowError::InvalidSafetyDepositBps(bps));
        }
        self.admin.write().min_safety_deposit_bps = bps;
        info!("[xs-02] Minimum safety deposit set to {} bps", bps);
        Ok(())
    }

    /// Replace the implementation hashes. Only future addresses change.
    pub fn update_implementations(&self, caller: &Address, src: Hash, dst: Hash) -> Result<(), EscrowError> {
        self.ensure_owner(caller)?;
        if shared_types::is_zero(&src) || shared_types::is_zero(&dst) {
            return Err(EscrowError::Config("implementation hash is zero".into()));
        }
        let mut admin = self.admin.write();
        admin.src_implementation = src;
        admin.dst_implementation = dst;
        info!(
            src = %short_hex(&src),
            dst = %short_hex(&dst),
            "[xs-02] Escrow implementations updated"
        );
        Ok(())
    }

    // =========================================================================
    // CREATION
    // =========================================================================

    fn check_creation(&self, immutables: &Immutables, dst_chain_id: ChainId) -> Result<(), EscrowError> {
        if self.is_paused() {
            return Err(EscrowError::Paused);
        }
        immutables.validate()?;

        let span = immutables.timelocks.span();
        if span > self.max_timelock_span_secs {
            return Err(EscrowError::TimelockTooLong {
                span,
                max: self.max_timelock_span_secs,
            });
        }

        let required = self.required_safety_deposit(dst_chain_id, immutables.amount)?;
        if immutables.safety_deposit < required {
            return Err(EscrowError::SafetyDepositTooLow {
                required,
                provided: immutables.safety_deposit,
            });
        }
        Ok(())
    }

    fn stamp(immutables: Immutables, now: u64) -> Result<Immutables, EscrowError> {
        let deployed_at = u32::try_from(now).map_err(|_| EscrowError::Overflow)?;
        let mut stamped = immutables;
        stamped.timelocks = stamped.timelocks.with_deployed_at(deployed_at);
        Ok(stamped)
    }

    fn finish_creation(&self, address: Address, immutables: &Immutables, side: EscrowSide, caller: &Address) {
        metric_inc!(ESCROWS_CREATED, &[side.as_str()]);
        log_escrow_event!(
            info,
            "xs-02",
            "[xs-02] Escrow created",
            short_hex(&immutables.order_hash),
            short_hex(&address),
            side = side.as_str(),
            caller = %short_hex(caller)
        );
        self.publish(SwapEvent::EscrowCreated {
            order_hash: immutables.order_hash,
            side,
            escrow: address,
        });
    }

    fn publish(&self, event: SwapEvent) {
        if let Some(publisher) = &self.publisher {
            publisher.publish(event);
        }
    }

    // =========================================================================
    // RECORD OPERATIONS
    // =========================================================================

    /// Apply a transition, then its transfers; restore the record if the
    /// ledger rejects them.
    fn transition<F>(&self, escrow: &Address, operation: &'static str, apply: F) -> Result<EscrowRecord, EscrowError>
    where
        F: FnOnce(&mut EscrowRecord, u64) -> Result<Settlement, EscrowError>,
    {
        let now = self.clock.now();
        let (prior, after, settlement) = {
            let mut table = self.escrows.write();
            let record = table
                .records
                .get_mut(escrow)
                .ok_or(EscrowError::EscrowNotFound(*escrow))?;
            let prior = record.clone();
            let settlement = apply(&mut *record, now)?;
            (prior, record.clone(), settlement)
        };

        if let Err(e) = self.ledger.execute(&settlement.transfers) {
            warn!(
                escrow = %short_hex(escrow),
                error = %e,
                "[xs-02] Transfers for {} failed, restoring record",
                operation
            );
            let mut table = self.escrows.write();
            if table.records.get(escrow) == Some(&after) {
                table.records.insert(*escrow, prior);
            }
            return Err(e.into());
        }

        debug!(
            escrow = %short_hex(escrow),
            transfers = settlement.transfers.len(),
            "[xs-02] {} settled",
            operation
        );
        self.publish(settlement.event);
        Ok(after)
    }

    fn claim_path(record: &EscrowRecord, path: &str) {
        metric_inc!(ESCROWS_CLAIMED, &[path]);
        info!(
            order = %short_hex(&record.immutables.order_hash),
            side = record.side().as_str(),
            "[xs-02] Escrow claimed ({})",
            path
        );
    }

    fn cancel_path(record: &EscrowRecord, path: &str) {
        metric_inc!(ESCROWS_CANCELLED, &[path]);
        info!(
            order = %short_hex(&record.immutables.order_hash),
            side = record.side().as_str(),
            "[xs-02] Escrow cancelled ({})",
            path
        );
    }
}

impl EscrowApi for EscrowFactory {
    fn required_safety_deposit(&self, dst_chain_id: ChainId, amount: Amount) -> Result<Amount, EscrowError> {
        let chain_min = self
            .registry
            .read()
            .calculate_min_safety_deposit(dst_chain_id, amount)?;
        let factory_min = min_safety_deposit(amount, self.min_safety_deposit_bps());
        Ok(chain_min.max(factory_min))
    }

    fn address_of(&self, immutables: &Immutables, is_source: bool) -> Result<Address, EscrowError> {
        immutables.validate()?;
        let (src, dst) = self.implementations();
        let implementation = if is_source { src } else { dst };
        Ok(compute_escrow_address(
            &self.factory_address,
            &compute_salt(immutables),
            &implementation,
        ))
    }

    fn create_src_escrow(
        &self,
        caller: &Address,
        immutables: Immutables,
        dst_chain_id: ChainId,
    ) -> Result<EscrowReceipt, EscrowError> {
        let now = self.clock.now();
        self.check_creation(&immutables, dst_chain_id)?;
        let stamped = Self::stamp(immutables, now)?;
        let address = self.address_of(&stamped, true)?;

        {
            let mut table = self.escrows.write();
            table.reserve(address, stamped.order_hash, EscrowSide::Source)?;
            if let Some(record) = table.records.get_mut(&address) {
                record.initialize(stamped.clone(), true)?;
            }
        }

        self.finish_creation(address, &stamped, EscrowSide::Source, caller);
        Ok(EscrowReceipt {
            address,
            immutables: stamped,
            refund: 0,
        })
    }

    fn create_dst_escrow(
        &self,
        caller: &Address,
        immutables: Immutables,
        dst_chain_id: ChainId,
        src_cancellation_timestamp: u64,
        payment: Amount,
    ) -> Result<EscrowReceipt, EscrowError> {
        let now = self.clock.now();
        self.check_creation(&immutables, dst_chain_id)?;
        if payment < immutables.safety_deposit {
            return Err(EscrowError::SafetyDepositTooLow {
                required: immutables.safety_deposit,
                provided: payment,
            });
        }

        let stamped = Self::stamp(immutables, now)?;
        let dst_cancellation = stamped.timelocks.get(TimelockStage::DstCancellation);
        if dst_cancellation > src_cancellation_timestamp {
            return Err(EscrowError::InvalidCreationTime {
                dst_cancellation,
                src_cancellation: src_cancellation_timestamp,
            });
        }
        let address = self.address_of(&stamped, false)?;
        let order_hash = stamped.order_hash;

        self.escrows
            .write()
            .reserve(address, order_hash, EscrowSide::Destination)?;

        let deposit = stamped.safety_deposit;
        if deposit > 0 {
            let prefund = Transfer {
                from: *caller,
                to: address,
                token: NATIVE_TOKEN,
                amount: deposit,
            };
            if let Err(e) = self.ledger.execute(&[prefund]) {
                warn!(
                    escrow = %short_hex(&address),
                    error = %e,
                    "[xs-02] Safety deposit transfer failed, releasing address"
                );
                self.escrows
                    .write()
                    .release(&address, order_hash, EscrowSide::Destination);
                return Err(e.into());
            }
        }

        {
            let mut table = self.escrows.write();
            let record = table
                .records
                .get_mut(&address)
                .ok_or(EscrowError::EscrowNotFound(address))?;
            record.initialize(stamped.clone(), false)?;
            record.prefunded_deposit = deposit;
        }

        self.finish_creation(address, &stamped, EscrowSide::Destination, caller);
        Ok(EscrowReceipt {
            address,
            immutables: stamped,
            refund: payment - deposit,
        })
    }

    fn lock(&self, caller: &Address, escrow: &Address) -> Result<(), EscrowError> {
        let record = self.transition(escrow, "lock", |r, _| r.lock(caller))?;
        metric_inc!(ESCROWS_LOCKED);
        info!(
            order = %short_hex(&record.immutables.order_hash),
            side = record.side().as_str(),
            amount = %record.immutables.amount,
            "[xs-02] Escrow locked"
        );
        Ok(())
    }

    fn claim(&self, caller: &Address, escrow: &Address, secret: &Secret) -> Result<(), EscrowError> {
        let record = self.transition(escrow, "claim", |r, now| r.claim(caller, secret, now))?;
        Self::claim_path(&record, "private");
        Ok(())
    }

    fn public_claim(&self, caller: &Address, escrow: &Address, secret: &Secret) -> Result<(), EscrowError> {
        let record = self.transition(escrow, "public_claim", |r, now| r.public_claim(caller, secret, now))?;
        Self::claim_path(&record, "public");
        Ok(())
    }

    fn cancel(&self, caller: &Address, escrow: &Address) -> Result<(), EscrowError> {
        let record = self.transition(escrow, "cancel", |r, now| r.cancel(caller, now))?;
        Self::cancel_path(&record, "private");
        Ok(())
    }

    fn public_cancel(&self, caller: &Address, escrow: &Address) -> Result<(), EscrowError> {
        let record = self.transition(escrow, "public_cancel", |r, now| r.public_cancel(caller, now))?;
        Self::cancel_path(&record, "public");
        Ok(())
    }

    fn escrow(&self, escrow: &Address) -> Option<EscrowRecord> {
        self.escrows.read().records.get(escrow).cloned()
    }

    fn escrow_for_order(&self, order_hash: &Hash, side: EscrowSide) -> Option<EscrowRecord> {
        let table = self.escrows.read();
        table
            .by_order
            .get(&(*order_hash, side))
            .and_then(|address| table.records.get(address))
            .cloned()
    }
}
