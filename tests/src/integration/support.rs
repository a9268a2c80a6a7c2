//! Shared fixture for the integration flows.

use parking_lot::Mutex;
use shared_bus::InMemoryEventBus;
use shared_types::{Address, Amount, Hash, ManualClock, NATIVE_TOKEN, NEAR_MAINNET};
use std::sync::Arc;
use xs_01_destination_chains::{
    ChainRegistry, ChainSpecificParams, ExecutionParamCodec, NearExecutionParams, RegistryConfig,
    SharedChainRegistry,
};
use xs_02_escrow::{
    EscrowApi, EscrowFactory, FactoryConfig, InMemoryLedger, Ledger, LedgerError, SecureSecret,
    Transfer,
};
use xs_03_order_coordinator::{CoordinatorConfig, OrderCoordinator, OrderRequest};

// =============================================================================
// ACTORS
// =============================================================================

pub const ADMIN: Address = [0xAD; 20];
pub const MAKER: Address = [0x01; 20];
pub const RESOLVER: Address = [0x02; 20];
pub const BYSTANDER: Address = [0x0B; 20];
pub const SRC_TOKEN: Address = [0x51; 20];
pub const DST_TOKEN: Address = [0xD5; 20];
pub const ONE: Amount = 1_000_000_000_000_000_000;
pub const T0: u64 = 1_700_000_000;

/// 5% of one unit.
pub const DEPOSIT: Amount = ONE / 20;

type Hook = Box<dyn FnOnce() + Send>;

/// In-memory ledger that can run one callback before its next batch.
pub struct CallbackLedger {
    inner: InMemoryLedger,
    hook: Mutex<Option<Hook>>,
}

impl CallbackLedger {
    pub fn new() -> Self {
        Self {
            inner: InMemoryLedger::new(),
            hook: Mutex::new(None),
        }
    }

    pub fn mint(&self, account: Address, token: Address, amount: Amount) {
        self.inner.mint(account, token, amount).unwrap();
    }

    /// Run `hook` on the next `execute`, before the batch applies.
    pub fn on_next_execute(&self, hook: impl FnOnce() + Send + 'static) {
        *self.hook.lock() = Some(Box::new(hook));
    }
}

impl Ledger for CallbackLedger {
    fn balance_of(&self, account: &Address, token: &Address) -> Amount {
        self.inner.balance_of(account, token)
    }

    fn execute(&self, transfers: &[Transfer]) -> Result<(), LedgerError> {
        let hook = self.hook.lock().take();
        if let Some(hook) = hook {
            hook();
        }
        self.inner.execute(transfers)
    }
}

/// Registry with every preset chain, one factory, one coordinator.
pub struct SwapWorld {
    pub registry: SharedChainRegistry,
    pub ledger: Arc<CallbackLedger>,
    pub clock: Arc<ManualClock>,
    pub bus: Arc<InMemoryEventBus>,
    pub factory: Arc<EscrowFactory>,
    pub coordinator: Arc<OrderCoordinator>,
}

impl SwapWorld {
    pub fn new() -> Self {
        swap_telemetry::init_test_logging();

        let bus = Arc::new(InMemoryEventBus::new());
        let registry = ChainRegistry::from_config(ADMIN, &RegistryConfig::default())
            .unwrap()
            .with_publisher(bus.clone())
            .into_shared();

        let ledger = Arc::new(CallbackLedger::new());
        ledger.mint(MAKER, SRC_TOKEN, 10 * ONE);
        ledger.mint(RESOLVER, DST_TOKEN, 10 * ONE);
        ledger.mint(RESOLVER, NATIVE_TOKEN, 10 * ONE);

        let clock = Arc::new(ManualClock::new(T0));
        let factory = Arc::new(
            EscrowFactory::new(
                FactoryConfig::for_testing(),
                registry.clone(),
                ledger.clone(),
                clock.clone(),
            )
            .unwrap()
            .with_publisher(bus.clone()),
        );
        let config = CoordinatorConfig {
            admin: ADMIN,
            resolvers: vec![RESOLVER],
            ..CoordinatorConfig::default()
        };
        let coordinator = Arc::new(
            OrderCoordinator::new(config, registry.clone(), factory.clone(), clock.clone())
                .unwrap()
                .with_publisher(bus.clone()),
        );

        Self {
            registry,
            ledger,
            clock,
            bus,
            factory,
            coordinator,
        }
    }

    pub fn balance(&self, account: &Address, token: &Address) -> Amount {
        self.ledger.balance_of(account, token)
    }

    /// Create, match, commit and fund both legs of a one-unit NEAR order.
    /// Returns `(order_hash, src_escrow, dst_escrow)`.
    pub fn open_swap(&self, secret: &SecureSecret, nonce: u64) -> (Hash, Address, Address) {
        let order_hash = self.coordinator.create_order(near_request(secret, nonce)).unwrap();
        let src = self
            .coordinator
            .match_order(&RESOLVER, &order_hash, DEPOSIT)
            .unwrap()
            .address;
        self.factory.lock(&MAKER, &src).unwrap();
        let dst = self
            .coordinator
            .commit_destination(&RESOLVER, &order_hash, DEPOSIT)
            .unwrap()
            .address;
        self.factory.lock(&RESOLVER, &dst).unwrap();
        (order_hash, src, dst)
    }
}

pub fn near_params(destination: &str) -> ChainSpecificParams {
    let exec = NearExecutionParams {
        contract_id: "fusion-escrow.near".into(),
        method_name: "execute_fusion_order".into(),
        args: br#"{"order_hash":"ab"}"#.to_vec(),
        attached_deposit: 0,
        gas: 300_000_000_000_000,
    };
    ChainSpecificParams::new(destination, exec.encode().unwrap())
}

/// One unit of `SRC_TOKEN` for one unit of `DST_TOKEN` on NEAR mainnet.
pub fn near_request(secret: &SecureSecret, nonce: u64) -> OrderRequest {
    OrderRequest {
        maker: MAKER,
        src_token: SRC_TOKEN,
        src_amount: ONE,
        dst_chain_id: NEAR_MAINNET,
        dst_token: DST_TOKEN,
        dst_amount: ONE,
        resolver_fee: 0,
        params: near_params("alice.near"),
        hashlock: secret.hashlock(),
        timelocks: None,
        nonce,
    }
}
