//! # Re-entrancy
//!
//! A ledger that calls back into the factory or the coordinator while a
//! batch is in flight. Record state changes before value moves, and no
//! guard is held across the ledger call, so callbacks neither deadlock nor
//! double spend.

#[cfg(test)]
mod tests {
    use super::super::support::*;
    use parking_lot::Mutex;
    use shared_types::NATIVE_TOKEN;
    use std::sync::Arc;
    use xs_02_escrow::{EscrowApi, EscrowError, EscrowState, SecureSecret, TimelockStage};
    use xs_03_order_coordinator::{OrderError, OrderStatus};

    fn open_at(world: &SwapWorld, stage: TimelockStage) -> ([u8; 32], [u8; 20], [u8; 20], SecureSecret) {
        let secret = SecureSecret::random();
        let (order_hash, src, dst) = world.open_swap(&secret, 0);
        let order = world.coordinator.order(&order_hash).unwrap();
        world
            .clock
            .set_time(T0 + u64::from(order.timelocks.offset(stage)));
        (order_hash, src, dst, secret)
    }

    #[test]
    fn test_public_claim_during_claim_transfer() {
        let world = SwapWorld::new();
        let (_, _, dst, secret) = open_at(&world, TimelockStage::DstPublicWithdrawal);

        let seen = Arc::new(Mutex::new(None));
        let (factory, observed, preimage) = (world.factory.clone(), seen.clone(), *secret.as_bytes());
        world.ledger.on_next_execute(move || {
            *observed.lock() = Some(factory.public_claim(&BYSTANDER, &dst, &preimage));
        });

        world.factory.claim(&RESOLVER, &dst, secret.as_bytes()).unwrap();

        assert!(matches!(
            seen.lock().take(),
            Some(Err(EscrowError::InvalidState {
                state: EscrowState::Claimed,
                ..
            }))
        ));
        assert_eq!(world.balance(&MAKER, &DST_TOKEN), ONE);
        assert_eq!(world.balance(&BYSTANDER, &NATIVE_TOKEN), 0);
        assert_eq!(world.balance(&RESOLVER, &NATIVE_TOKEN), 10 * ONE);
    }

    #[test]
    fn test_cancel_during_refund_transfer() {
        let world = SwapWorld::new();
        let (_, src, _, _) = open_at(&world, TimelockStage::SrcPublicCancellation);

        let seen = Arc::new(Mutex::new(None));
        let (factory, observed) = (world.factory.clone(), seen.clone());
        world.ledger.on_next_execute(move || {
            *observed.lock() = Some(factory.cancel(&MAKER, &src));
        });

        world.factory.public_cancel(&BYSTANDER, &src).unwrap();

        assert!(matches!(seen.lock().take(), Some(Err(EscrowError::InvalidState { .. }))));
        assert_eq!(world.balance(&MAKER, &SRC_TOKEN), 10 * ONE);
        assert_eq!(world.balance(&src, &SRC_TOKEN), 0);
    }

    #[test]
    fn test_commit_during_safety_deposit_transfer() {
        let world = SwapWorld::new();
        let order_hash = world
            .coordinator
            .create_order(near_request(&SecureSecret::random(), 0))
            .unwrap();
        world
            .coordinator
            .match_order(&RESOLVER, &order_hash, DEPOSIT)
            .unwrap();

        let seen = Arc::new(Mutex::new(None));
        let (coordinator, observed) = (world.coordinator.clone(), seen.clone());
        world.ledger.on_next_execute(move || {
            *observed.lock() = Some(coordinator.commit_destination(&RESOLVER, &order_hash, DEPOSIT));
        });

        world
            .coordinator
            .commit_destination(&RESOLVER, &order_hash, DEPOSIT)
            .unwrap();

        assert!(matches!(
            seen.lock().take(),
            Some(Err(OrderError::Escrow(EscrowError::EscrowAlreadyExists(_))))
        ));
        assert_eq!(world.factory.escrow_count(), 2);
        assert_eq!(world.balance(&RESOLVER, &NATIVE_TOKEN), 10 * ONE - DEPOSIT);
        assert_eq!(world.coordinator.order(&order_hash).unwrap().status, OrderStatus::Committed);
    }

    #[test]
    fn test_sync_during_final_claim_sees_settled_state() {
        let world = SwapWorld::new();
        let (order_hash, src, dst, secret) = open_at(&world, TimelockStage::SrcWithdrawal);
        world.factory.claim(&RESOLVER, &dst, secret.as_bytes()).unwrap();

        let seen = Arc::new(Mutex::new(None));
        let (coordinator, observed) = (world.coordinator.clone(), seen.clone());
        world.ledger.on_next_execute(move || {
            *observed.lock() = Some(coordinator.sync_order(&order_hash));
        });

        world.factory.claim(&RESOLVER, &src, secret.as_bytes()).unwrap();

        assert_eq!(seen.lock().take(), Some(Ok(OrderStatus::Completed)));
        assert_eq!(world.coordinator.sync_order(&order_hash).unwrap(), OrderStatus::Completed);
    }
}
