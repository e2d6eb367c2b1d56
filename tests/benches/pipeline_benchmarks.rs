//! # Log Decoding Pipeline Benchmarks
//!
//! | Path | Workload |
//! |------|----------|
//! | vs-01 `decode_logs` | historical batches of mixed events |
//! | vs-01 `match_log` | single log signature lookup + decode |
//! | vs-02 listing | full-history replay through the service |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_types::{Address, Hash, RawLog, U256};
use std::sync::Arc;
use std::time::Duration;
use vs_01_log_decoding::{decode_logs, ContractAbi, DynSolValue, LogCodec};
use vs_02_entity_orchestrator::{
    volume_subscription_abi, CreatePlanRequest, InMemoryLedger, OrchestratorConfig,
    VolumeSubscriptionApi, VolumeSubscriptionService,
};

fn random_created_plan(abi: &ContractAbi, rng: &mut impl Rng) -> RawLog {
    let identifier = Hash::from(rng.gen::<[u8; 32]>());
    abi.event("CreatedPlan")
        .and_then(|event| {
            event.encode_log(
                Address::repeat_byte(0xc0),
                &[
                    DynSolValue::Address(Address::from(rng.gen::<[u8; 20]>())),
                    DynSolValue::FixedBytes(identifier, 32),
                    DynSolValue::Address(Address::from(rng.gen::<[u8; 20]>())),
                    DynSolValue::Uint(U256::from(rng.gen::<u32>()), 256),
                    DynSolValue::Uint(U256::from(rng.gen::<u128>()), 256),
                ],
            )
        })
        .expect("CreatedPlan encodes")
}

fn bench_decode_logs(c: &mut Criterion) {
    let mut group = c.benchmark_group("vs-01-decode-logs");
    group.measurement_time(Duration::from_secs(5));

    let abi = volume_subscription_abi().expect("embedded ABI parses");
    let mut rng = rand::thread_rng();

    for size in [10usize, 100, 1_000] {
        let logs: Vec<RawLog> = (0..size)
            .map(|i| {
                if i % 10 == 9 {
                    // Foreign log: exercises the drop path.
                    RawLog::new(Address::ZERO, vec![], vec![0u8; 64])
                } else {
                    random_created_plan(&abi, &mut rng)
                }
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("mixed_batch", size), &logs, |b, logs| {
            b.iter(|| black_box(decode_logs(&abi, logs)))
        });
    }

    group.finish();
}

fn bench_match_single_log(c: &mut Criterion) {
    let abi = volume_subscription_abi().expect("embedded ABI parses");
    let log = random_created_plan(&abi, &mut rand::thread_rng());

    c.bench_function("vs-01-match-log", |b| {
        b.iter(|| black_box(abi.match_log(&log)))
    });
}

fn bench_plan_listing(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let contract = Address::repeat_byte(0xc0);
    let owner = Address::repeat_byte(0x11);

    let ledger = Arc::new(InMemoryLedger::new(contract).expect("embedded ABI parses"));
    let config = OrchestratorConfig::for_testing(contract).with_default_sender(owner);
    let service =
        VolumeSubscriptionService::new(Arc::clone(&ledger), config).expect("embedded ABI parses");

    runtime.block_on(async {
        for i in 0..200u64 {
            let request = CreatePlanRequest::new(
                owner,
                Address::repeat_byte(0x22),
                format!("plan-{i}"),
                30,
                U256::from(i),
                U256::ZERO,
            );
            service.create_plan(request, None).await.expect("plan created");
        }
    });

    let mut group = c.benchmark_group("vs-02-listing");
    group.throughput(Throughput::Elements(200));
    group.bench_function("get_plans_200", |b| {
        b.iter(|| runtime.block_on(async { black_box(service.get_plans(owner).await) }))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_decode_logs,
    bench_match_single_log,
    bench_plan_listing
);
criterion_main!(benches);
