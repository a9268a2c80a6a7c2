//! # Event Flows
//!
//! What a relayer subscribed to the shared bus observes during a swap.

#[cfg(test)]
mod tests {
    use super::super::support::*;
    use shared_bus::{EventFilter, EventTopic, SwapEvent};
    use shared_types::EscrowSide;
    use std::time::Duration;
    use tokio::time::timeout;
    use xs_02_escrow::{EscrowApi, SecureSecret, TimelockStage};

    async fn next_event(sub: &mut shared_bus::Subscription) -> SwapEvent {
        timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event")
    }

    #[tokio::test]
    async fn test_relayer_sees_order_then_escrow_events() {
        let world = SwapWorld::new();
        let mut orders = world.bus.subscribe(EventFilter::topics(vec![EventTopic::Orders]));
        let mut escrows = world.bus.subscribe(EventFilter::topics(vec![EventTopic::Escrow]));

        let secret = SecureSecret::random();
        let (order_hash, src, dst) = world.open_swap(&secret, 0);

        assert_eq!(
            next_event(&mut orders).await,
            SwapEvent::OrderCreated {
                order_hash,
                maker: MAKER,
                dst_chain_id: shared_types::NEAR_MAINNET,
            }
        );
        assert_eq!(
            next_event(&mut orders).await,
            SwapEvent::OrderMatched {
                order_hash,
                resolver: RESOLVER,
            }
        );

        assert_eq!(
            next_event(&mut escrows).await,
            SwapEvent::EscrowCreated {
                order_hash,
                side: EscrowSide::Source,
                escrow: src,
            }
        );
        assert!(matches!(next_event(&mut escrows).await, SwapEvent::EscrowLocked { amount: ONE, .. }));
        assert_eq!(
            next_event(&mut escrows).await,
            SwapEvent::EscrowCreated {
                order_hash,
                side: EscrowSide::Destination,
                escrow: dst,
            }
        );
        assert!(matches!(next_event(&mut escrows).await, SwapEvent::EscrowLocked { .. }));

        let order = world.coordinator.order(&order_hash).unwrap();
        world
            .clock
            .set_time(T0 + u64::from(order.timelocks.offset(TimelockStage::DstWithdrawal)));
        world.factory.claim(&RESOLVER, &dst, secret.as_bytes()).unwrap();
        assert_eq!(
            next_event(&mut escrows).await,
            SwapEvent::EscrowClaimed {
                order_hash,
                claimant: RESOLVER,
                secret: *secret.as_bytes(),
            }
        );
    }

    #[tokio::test]
    async fn test_order_filter_isolates_orders() {
        let world = SwapWorld::new();
        let first = world
            .coordinator
            .create_order(near_request(&SecureSecret::random(), 0))
            .unwrap();

        let mut only_first = world.bus.subscribe(EventFilter {
            topics: vec![EventTopic::Orders],
            order_hash: Some(first),
        });
        world
            .coordinator
            .create_order(near_request(&SecureSecret::random(), 1))
            .unwrap();
        world.coordinator.cancel_order(&MAKER, &first).unwrap();

        assert_eq!(
            next_event(&mut only_first).await,
            SwapEvent::OrderCancelled { order_hash: first }
        );
        assert!(only_first.try_recv().unwrap().is_none());
    }
}
