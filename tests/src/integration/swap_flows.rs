//! # Swap Flows
//!
//! Full order lifecycles through the coordinator and the factory:
//!
//! 1. **Happy path**: secret revealed on the destination, reused on the source
//! 2. **Public claim**: a bystander finishes the swap and earns the deposit
//! 3. **Refund**: nobody reveals, both legs return to their depositors
//! 4. **Uneven legs**: the deposit is sized on the destination amount and the
//!    resolver fee rides on the destination escrow

#[cfg(test)]
mod tests {
    use super::super::support::*;
    use shared_bus::{EventFilter, EventTopic, SwapEvent};
    use shared_types::{EscrowSide, NATIVE_TOKEN};
    use xs_02_escrow::{EscrowApi, EscrowError, EscrowState, SecureSecret, TimelockStage};
    use xs_03_order_coordinator::{OrderError, OrderRequest, OrderStatus};

    /// Advance to the point where `stage` opens for an escrow deployed at T0.
    fn advance_to(world: &SwapWorld, order_hash: &[u8; 32], stage: TimelockStage) {
        let order = world.coordinator.order(order_hash).unwrap();
        world
            .clock
            .set_time(T0 + u64::from(order.timelocks.offset(stage)));
    }

    #[test]
    fn test_end_to_end_swap() {
        let world = SwapWorld::new();
        let mut escrow_events = world.bus.subscribe(EventFilter::topics(vec![EventTopic::Escrow]));
        let secret = SecureSecret::random();
        let (order_hash, src, dst) = world.open_swap(&secret, 0);

        assert_eq!(world.coordinator.order(&order_hash).unwrap().status, OrderStatus::Committed);
        assert_eq!(world.balance(&src, &SRC_TOKEN), ONE);
        assert_eq!(world.balance(&dst, &DST_TOKEN), ONE);
        assert_eq!(world.balance(&dst, &NATIVE_TOKEN), DEPOSIT);

        // Maker shares the secret; resolver claims the destination leg for the maker.
        advance_to(&world, &order_hash, TimelockStage::DstWithdrawal);
        world.factory.claim(&RESOLVER, &dst, secret.as_bytes()).unwrap();
        assert_eq!(world.balance(&MAKER, &DST_TOKEN), ONE);

        // The secret is now public on the bus.
        let revealed = escrow_events
            .drain()
            .into_iter()
            .find_map(|event| match event {
                SwapEvent::EscrowClaimed { secret, .. } => Some(secret),
                _ => None,
            })
            .unwrap();
        assert_eq!(&revealed, secret.as_bytes());

        advance_to(&world, &order_hash, TimelockStage::SrcWithdrawal);
        world.factory.claim(&RESOLVER, &src, &revealed).unwrap();

        assert_eq!(world.balance(&MAKER, &SRC_TOKEN), 9 * ONE);
        assert_eq!(world.balance(&RESOLVER, &SRC_TOKEN), ONE);
        assert_eq!(world.balance(&RESOLVER, &DST_TOKEN), 9 * ONE);
        assert_eq!(world.balance(&RESOLVER, &NATIVE_TOKEN), 10 * ONE);
        assert_eq!(world.balance(&src, &SRC_TOKEN), 0);
        assert_eq!(world.balance(&dst, &NATIVE_TOKEN), 0);

        assert_eq!(world.coordinator.sync_order(&order_hash).unwrap(), OrderStatus::Completed);

        // Claimed escrows never refund.
        advance_to(&world, &order_hash, TimelockStage::SrcPublicCancellation);
        assert!(matches!(
            world.factory.cancel(&MAKER, &src),
            Err(EscrowError::InvalidState {
                state: EscrowState::Claimed,
                ..
            })
        ));
        assert!(world.factory.public_cancel(&BYSTANDER, &src).is_err());
        assert!(world.factory.cancel(&RESOLVER, &dst).is_err());
        assert_eq!(world.balance(&MAKER, &SRC_TOKEN), 9 * ONE);
    }

    #[test]
    fn test_uneven_legs_with_resolver_fee() {
        let world = SwapWorld::new();
        let secret = SecureSecret::random();
        let fee = ONE / 100;
        let deposit = 4 * ONE / 20;
        let request = OrderRequest {
            dst_amount: 4 * ONE,
            resolver_fee: fee,
            ..near_request(&secret, 0)
        };
        let order_hash = world.coordinator.create_order(request).unwrap();

        // Five percent of the source leg does not cover the destination leg.
        assert!(matches!(
            world.coordinator.match_order(&RESOLVER, &order_hash, DEPOSIT),
            Err(OrderError::Escrow(EscrowError::SafetyDepositTooLow { .. }))
        ));
        assert_eq!(world.coordinator.order(&order_hash).unwrap().status, OrderStatus::Pending);

        let src = world
            .coordinator
            .match_order(&RESOLVER, &order_hash, deposit)
            .unwrap()
            .address;
        world.factory.lock(&MAKER, &src).unwrap();
        let receipt = world.coordinator.commit_destination(&RESOLVER, &order_hash, ONE).unwrap();
        assert_eq!(receipt.refund, ONE - deposit - fee);
        let dst = receipt.address;
        world.factory.lock(&RESOLVER, &dst).unwrap();
        assert_eq!(world.balance(&dst, &NATIVE_TOKEN), deposit + fee);
        assert_eq!(world.balance(&RESOLVER, &NATIVE_TOKEN), 10 * ONE - deposit - fee);

        advance_to(&world, &order_hash, TimelockStage::DstWithdrawal);
        world.factory.claim(&RESOLVER, &dst, secret.as_bytes()).unwrap();
        assert_eq!(world.balance(&MAKER, &DST_TOKEN), 4 * ONE);
        assert_eq!(world.balance(&RESOLVER, &NATIVE_TOKEN), 10 * ONE);

        advance_to(&world, &order_hash, TimelockStage::SrcWithdrawal);
        world.factory.claim(&RESOLVER, &src, secret.as_bytes()).unwrap();
        assert_eq!(world.balance(&RESOLVER, &SRC_TOKEN), ONE);
        assert_eq!(world.coordinator.sync_order(&order_hash).unwrap(), OrderStatus::Completed);
    }

    #[test]
    fn test_wrong_secret_moves_nothing() {
        let world = SwapWorld::new();
        let secret = SecureSecret::random();
        let (order_hash, src, dst) = world.open_swap(&secret, 0);

        advance_to(&world, &order_hash, TimelockStage::SrcWithdrawal);
        let mut wrong = *secret.as_bytes();
        wrong[0] ^= 1;
        assert_eq!(
            world.factory.claim(&RESOLVER, &dst, &wrong),
            Err(EscrowError::InvalidSecret)
        );
        assert_eq!(world.factory.escrow(&dst).unwrap().state, EscrowState::Locked);
        assert_eq!(world.balance(&dst, &DST_TOKEN), ONE);
    }

    #[test]
    fn test_public_claim_rewards_caller() {
        let world = SwapWorld::new();
        let secret = SecureSecret::random();
        let (order_hash, _src, dst) = world.open_swap(&secret, 0);

        advance_to(&world, &order_hash, TimelockStage::DstWithdrawal);
        assert_eq!(
            world.factory.public_claim(&BYSTANDER, &dst, secret.as_bytes()),
            Err(EscrowError::TimelockNotReached {
                stage: TimelockStage::DstPublicWithdrawal,
                opens_at: T0 + u64::from(
                    world
                        .coordinator
                        .order(&order_hash)
                        .unwrap()
                        .timelocks
                        .offset(TimelockStage::DstPublicWithdrawal)
                ),
            })
        );

        advance_to(&world, &order_hash, TimelockStage::DstPublicWithdrawal);
        world.factory.public_claim(&BYSTANDER, &dst, secret.as_bytes()).unwrap();
        assert_eq!(world.balance(&MAKER, &DST_TOKEN), ONE);
        assert_eq!(world.balance(&BYSTANDER, &NATIVE_TOKEN), DEPOSIT);
        assert_eq!(world.balance(&RESOLVER, &NATIVE_TOKEN), 10 * ONE - DEPOSIT);
    }

    #[test]
    fn test_refund_after_timeout() {
        let world = SwapWorld::new();
        let secret = SecureSecret::random();
        let (order_hash, src, dst) = world.open_swap(&secret, 0);

        // Nothing is refundable before the cancellation stages.
        advance_to(&world, &order_hash, TimelockStage::DstWithdrawal);
        assert!(matches!(
            world.factory.cancel(&RESOLVER, &dst),
            Err(EscrowError::TimelockNotReached { .. })
        ));

        advance_to(&world, &order_hash, TimelockStage::DstCancellation);
        world.factory.cancel(&RESOLVER, &dst).unwrap();
        assert_eq!(world.balance(&RESOLVER, &DST_TOKEN), 10 * ONE);
        assert_eq!(world.balance(&RESOLVER, &NATIVE_TOKEN), 10 * ONE);

        // Source refund is still closed; the late secret no longer claims the destination.
        assert!(world.factory.cancel(&MAKER, &src).is_err());
        assert!(world.factory.claim(&RESOLVER, &dst, secret.as_bytes()).is_err());
        assert_eq!(world.coordinator.sync_order(&order_hash).unwrap(), OrderStatus::Committed);

        advance_to(&world, &order_hash, TimelockStage::SrcCancellation);
        world.factory.cancel(&MAKER, &src).unwrap();
        assert_eq!(world.balance(&MAKER, &SRC_TOKEN), 10 * ONE);

        assert_eq!(world.coordinator.sync_order(&order_hash).unwrap(), OrderStatus::Refunded);
        assert_eq!(
            world
                .factory
                .escrow_for_order(&order_hash, EscrowSide::Source)
                .unwrap()
                .state,
            EscrowState::Cancelled
        );
    }

    #[test]
    fn test_public_cancel_returns_funds_to_maker() {
        let world = SwapWorld::new();
        let secret = SecureSecret::random();
        let (order_hash, src, _dst) = world.open_swap(&secret, 0);

        advance_to(&world, &order_hash, TimelockStage::SrcCancellation);
        assert!(world.factory.public_cancel(&BYSTANDER, &src).is_err());

        advance_to(&world, &order_hash, TimelockStage::SrcPublicCancellation);
        world.factory.public_cancel(&BYSTANDER, &src).unwrap();
        assert_eq!(world.balance(&MAKER, &SRC_TOKEN), 10 * ONE);
        assert_eq!(world.balance(&BYSTANDER, &SRC_TOKEN), 0);
    }

    #[test]
    fn test_orders_are_independent() {
        let world = SwapWorld::new();
        let first = SecureSecret::random();
        let second = SecureSecret::random();
        let (order_a, src_a, dst_a) = world.open_swap(&first, 0);
        let (order_b, src_b, dst_b) = world.open_swap(&second, 1);
        assert_ne!(src_a, src_b);
        assert_ne!(dst_a, dst_b);

        advance_to(&world, &order_a, TimelockStage::SrcWithdrawal);
        assert_eq!(
            world.factory.claim(&RESOLVER, &dst_b, first.as_bytes()),
            Err(EscrowError::InvalidSecret)
        );
        world.factory.claim(&RESOLVER, &dst_a, first.as_bytes()).unwrap();
        world.factory.claim(&RESOLVER, &src_a, first.as_bytes()).unwrap();

        assert_eq!(world.coordinator.sync_order(&order_a).unwrap(), OrderStatus::Completed);
        assert_eq!(world.coordinator.sync_order(&order_b).unwrap(), OrderStatus::Committed);
        assert_eq!(world.factory.escrow(&src_b).unwrap().state, EscrowState::Locked);
    }
}
