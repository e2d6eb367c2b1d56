//! # Shared Fixtures
//!
//! A service wired to a fresh in-memory ledger, plus request builders.

use std::sync::Arc;

use shared_types::{Address, U256};
use vs_02_entity_orchestrator::{
    CreatePlanRequest, InMemoryLedger, OrchestratorConfig, VolumeSubscriptionService,
};

/// Address the contract is deployed at in every fixture.
pub fn contract_address() -> Address {
    Address::repeat_byte(0xc0)
}

/// Default sender of the fixture service.
pub fn merchant() -> Address {
    Address::repeat_byte(0x11)
}

/// A second account that subscribes to plans.
pub fn subscriber() -> Address {
    Address::repeat_byte(0x55)
}

/// Token every fixture plan is paid in.
pub fn token() -> Address {
    Address::repeat_byte(0x22)
}

/// Service plus a handle to its ledger.
pub struct Harness {
    /// The ledger, for fault injection and inspection.
    pub ledger: Arc<InMemoryLedger>,
    /// The service under test.
    pub service: VolumeSubscriptionService<InMemoryLedger>,
}

/// Fresh ledger and service with short finality waits and `merchant()` as
/// default sender.
pub fn harness() -> Harness {
    let ledger = Arc::new(
        InMemoryLedger::new(contract_address()).expect("embedded ABI parses"),
    );
    let config = OrchestratorConfig::for_testing(contract_address()).with_default_sender(merchant());
    let service = VolumeSubscriptionService::new(Arc::clone(&ledger), config)
        .expect("embedded ABI parses");
    Harness { ledger, service }
}

/// A plan owned by `merchant()` billed every `interval_days`.
pub fn plan_request(identifier: &str, interval_days: u64) -> CreatePlanRequest {
    CreatePlanRequest::new(
        merchant(),
        token(),
        identifier,
        interval_days,
        U256::from(10u64).pow(U256::from(18u64)),
        U256::from(1_000u64),
    )
}
