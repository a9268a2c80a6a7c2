//! # Registry Isolation
//!
//! Registry changes for one chain never disturb orders or escrows on
//! another, and a removed chain stops accepting new work at every layer.

#[cfg(test)]
mod tests {
    use super::super::support::*;
    use shared_bus::{EventFilter, EventTopic, SwapEvent};
    use shared_types::{BITCOIN_MAINNET, NEAR_MAINNET, NEUTRON};
    use std::sync::Arc;
    use xs_01_destination_chains::{
        BitcoinHtlcParams, ChainError, ChainSpecificParams, CosmosAdapter, CosmosAdapterConfig, CosmosCoin,
        CosmosExecutionParams, ExecutionParamCodec, LockTimeKind, NearAdapter, NearAdapterConfig,
    };
    use xs_02_escrow::{EscrowApi, EscrowError, EscrowState, SecureSecret, TimelockStage};
    use xs_03_order_coordinator::{OrderError, OrderRequest, OrderStatus};

    fn bitcoin_params() -> ChainSpecificParams {
        let htlc = BitcoinHtlcParams {
            hashlock: [0x11; 32],
            refund_pubkey_hash: [0x22; 20],
            timelock: 800_000,
            timelock_kind: LockTimeKind::Absolute,
            fee_rate: 10,
        };
        ChainSpecificParams::new("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", htlc.encode().unwrap())
    }

    fn neutron_params() -> ChainSpecificParams {
        let adapter = CosmosAdapter::new(CosmosAdapterConfig::neutron()).unwrap();
        let exec = CosmosExecutionParams {
            contract_address: adapter.codec().encode(&[0xC0; 32]).unwrap(),
            msg: br#"{"execute_fusion_order":{}}"#.to_vec(),
            funds: vec![CosmosCoin {
                denom: "untrn".into(),
                amount: 1_000_000,
            }],
            gas_limit: 200_000,
        };
        let destination = adapter.codec().encode(&[0x0A; 20]).unwrap();
        ChainSpecificParams::new(&destination, exec.encode().unwrap())
    }

    fn request_on(chain_id: u64, params: ChainSpecificParams, nonce: u64) -> OrderRequest {
        let secret = SecureSecret::random();
        OrderRequest {
            dst_chain_id: chain_id,
            params,
            ..near_request(&secret, nonce)
        }
    }

    #[test]
    fn test_orders_on_every_family() {
        let world = SwapWorld::new();
        let near = world
            .coordinator
            .create_order(request_on(NEAR_MAINNET, near_params("alice.near"), 0))
            .unwrap();
        let btc = world
            .coordinator
            .create_order(request_on(BITCOIN_MAINNET, bitcoin_params(), 1))
            .unwrap();
        let ntrn = world
            .coordinator
            .create_order(request_on(NEUTRON, neutron_params(), 2))
            .unwrap();

        let costs: Vec<_> = [near, btc, ntrn]
            .iter()
            .map(|h| world.coordinator.order(h).unwrap().estimated_cost)
            .collect();
        assert!(costs.iter().all(|c| *c > 0));

        // Parameters valid on one family are rejected by another.
        assert!(matches!(
            world
                .coordinator
                .create_order(request_on(BITCOIN_MAINNET, near_params("alice.near"), 3)),
            Err(OrderError::InvalidOrder(_))
        ));
        assert!(matches!(
            world
                .coordinator
                .create_order(request_on(NEUTRON, bitcoin_params(), 4)),
            Err(OrderError::InvalidOrder(_))
        ));
    }

    #[test]
    fn test_removed_chain_stops_new_work_only() {
        let world = SwapWorld::new();
        let mut registry_events = world.bus.subscribe(EventFilter::topics(vec![EventTopic::Registry]));

        let secret = SecureSecret::random();
        let (near_order, src, dst) = world.open_swap(&secret, 0);
        let btc_order = world
            .coordinator
            .create_order(request_on(BITCOIN_MAINNET, bitcoin_params(), 1))
            .unwrap();
        world
            .coordinator
            .match_order(&RESOLVER, &btc_order, DEPOSIT)
            .unwrap();

        world.registry.write().unregister(&ADMIN, BITCOIN_MAINNET).unwrap();
        assert_eq!(
            registry_events.drain(),
            vec![SwapEvent::ChainRemoved {
                chain_id: BITCOIN_MAINNET,
                name: "Bitcoin".into(),
            }]
        );

        // New orders and destination commits on the removed chain fail.
        assert_eq!(
            world
                .coordinator
                .create_order(request_on(BITCOIN_MAINNET, bitcoin_params(), 2)),
            Err(OrderError::Chain(ChainError::ChainNotSupported(BITCOIN_MAINNET)))
        );
        assert_eq!(
            world.coordinator.commit_destination(&RESOLVER, &btc_order, DEPOSIT),
            Err(OrderError::Escrow(EscrowError::Chain(ChainError::ChainNotSupported(
                BITCOIN_MAINNET
            ))))
        );
        assert_eq!(world.coordinator.order(&btc_order).unwrap().status, OrderStatus::Matched);

        // The NEAR swap settles as if nothing happened.
        let order = world.coordinator.order(&near_order).unwrap();
        world
            .clock
            .set_time(T0 + u64::from(order.timelocks.offset(TimelockStage::SrcWithdrawal)));
        world.factory.claim(&RESOLVER, &dst, secret.as_bytes()).unwrap();
        world.factory.claim(&RESOLVER, &src, secret.as_bytes()).unwrap();
        assert_eq!(world.coordinator.sync_order(&near_order).unwrap(), OrderStatus::Completed);
    }

    #[test]
    fn test_locked_escrow_survives_chain_removal() {
        let world = SwapWorld::new();
        let secret = SecureSecret::random();
        let (order_hash, src, dst) = world.open_swap(&secret, 0);

        world.registry.write().unregister(&ADMIN, NEAR_MAINNET).unwrap();
        assert!(!world.registry.read().is_chain_supported(NEAR_MAINNET));

        // Existing escrows keep their immutables and still refund.
        let order = world.coordinator.order(&order_hash).unwrap();
        world
            .clock
            .set_time(T0 + u64::from(order.timelocks.offset(TimelockStage::SrcCancellation)));
        world.factory.cancel(&RESOLVER, &dst).unwrap();
        world.factory.cancel(&MAKER, &src).unwrap();
        assert_eq!(world.factory.escrow(&src).unwrap().state, EscrowState::Cancelled);
        assert_eq!(world.coordinator.sync_order(&order_hash).unwrap(), OrderStatus::Refunded);
    }

    #[test]
    fn test_updated_minimum_applies_to_new_escrows_only() {
        let world = SwapWorld::new();
        let secret = SecureSecret::random();
        let (order_hash, _src, _dst) = world.open_swap(&secret, 0);

        let mut config = NearAdapterConfig::mainnet();
        config.min_safety_deposit_bps = 2_000;
        world
            .registry
            .write()
            .update(&ADMIN, NEAR_MAINNET, Arc::new(NearAdapter::new(config).unwrap()))
            .unwrap();

        let next = world
            .coordinator
            .create_order(near_request(&SecureSecret::random(), 1))
            .unwrap();
        assert!(matches!(
            world.coordinator.match_order(&RESOLVER, &next, DEPOSIT),
            Err(OrderError::Escrow(EscrowError::SafetyDepositTooLow { .. }))
        ));
        world.coordinator.match_order(&RESOLVER, &next, ONE / 5).unwrap();

        assert_eq!(world.coordinator.order(&order_hash).unwrap().safety_deposit, DEPOSIT);
    }
}
