//! # Escrow Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | Immutables hash + address derivation | < 10µs |
//! | Hashlock verification | < 5µs |
//! | Timelock pack/unpack | < 1µs |
//! | Registry order validation (per family) | < 50µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shared_types::{ALL_DESTINATION_CHAINS, NEAR_MAINNET};
use xs_01_destination_chains::{
    ChainRegistry, ChainSpecificParams, ExecutionParamCodec, NearExecutionParams, RegistryConfig,
};
use xs_02_escrow::{
    compute_escrow_address, compute_salt, create_hash_lock, generate_random_secret, verify_secret,
    Immutables, Timelocks,
};

const OWNER: [u8; 20] = [0xAD; 20];

fn immutables() -> Immutables {
    Immutables {
        order_hash: [0x0D; 32],
        hashlock: create_hash_lock(&[0x5E; 32]),
        maker: [0x01; 20],
        taker: [0x02; 20],
        token: [0x03; 20],
        amount: 1_000_000_000_000_000_000,
        safety_deposit: 50_000_000_000_000_000,
        timelocks: Timelocks::new([60, 120, 600, 720, 30, 90, 300]).with_deployed_at(1_700_000_000),
    }
}

fn bench_addressing(c: &mut Criterion) {
    let imm = immutables();
    let factory = [0xFA; 20];
    let implementation = [0x1D; 32];

    let mut group = c.benchmark_group("xs_02_addressing");
    group.bench_function("immutables_hash", |b| b.iter(|| black_box(&imm).hash()));
    group.bench_function("escrow_address", |b| {
        b.iter(|| {
            let salt = compute_salt(black_box(&imm));
            compute_escrow_address(&factory, &salt, &implementation)
        })
    });
    group.bench_function("timelocks_pack_unpack", |b| {
        b.iter(|| Timelocks::unpack(&black_box(&imm.timelocks).pack()))
    });
    group.finish();
}

fn bench_hashlock(c: &mut Criterion) {
    let secret = generate_random_secret();
    let hashlock = create_hash_lock(&secret);
    c.bench_function("xs_02_verify_secret", |b| {
        b.iter(|| verify_secret(black_box(&secret), black_box(&hashlock)))
    });
}

fn bench_registry_validation(c: &mut Criterion) {
    let registry = match ChainRegistry::from_config(OWNER, &RegistryConfig::default()) {
        Ok(registry) => registry,
        Err(e) => panic!("default registry: {e}"),
    };
    let exec = NearExecutionParams {
        contract_id: "fusion-escrow.near".into(),
        method_name: "execute_fusion_order".into(),
        args: br#"{"order_hash":"ab"}"#.to_vec(),
        attached_deposit: 0,
        gas: 300_000_000_000_000,
    };
    let near = match exec.encode() {
        Ok(bytes) => ChainSpecificParams::new("alice.near", bytes),
        Err(e) => panic!("encode: {e}"),
    };

    let mut group = c.benchmark_group("xs_01_registry");
    group.bench_with_input(BenchmarkId::new("validate_order_params", "near"), &near, |b, params| {
        b.iter(|| registry.validate_order_params(NEAR_MAINNET, black_box(params), 1_000_000))
    });
    group.bench_function("supported_chain_ids", |b| {
        b.iter(|| {
            let ids = registry.supported_chain_ids();
            assert_eq!(ids.len(), ALL_DESTINATION_CHAINS.len());
            ids
        })
    });
    group.finish();
}

criterion_group!(benches, bench_addressing, bench_hashlock, bench_registry_validation);
criterion_main!(benches);
