//! # VS-02 Domain Entity Orchestrator
//!
//! Plan and subscription operations against a deployed `VolumeSubscription`
//! contract.
//!
//! **Component ID:** vs-02
//! **Architecture:** Hexagonal (domain / ports / application / adapters)
//!
//! ## Operations
//!
//! | Operation | Kind | Result |
//! |-----------|------|--------|
//! | `create_plan` | write, awaits finality | plan key from `CreatedPlan` |
//! | `terminate_plan` | write | transaction hash |
//! | `get_plan` | storage read | `Plan` |
//! | `get_plans` | `CreatedPlan` scan + reads | `Vec<Plan>` |
//! | `create_subscription` | write, awaits finality | key from `CreatedSubscription` |
//! | `cancel_subscription` | write | transaction hash |
//! | `get_subscription` | storage read | `Subscription` |
//! | `get_subscriptions_by_user` / `_by_plan` | `CreatedSubscription` scan + reads | `Vec<Subscription>` |
//!
//! Reads of unknown keys return the contract's zero record rather than an
//! error; check [`Plan::is_empty`] / [`Subscription::is_empty`].
//!
//! Listings replay the contract's whole event history on every call. There
//! is no client-side index.
//!
//! ## Module Structure
//!
//! ```text
//! vs-02-entity-orchestrator/
//! ├── abi/           # VolumeSubscription.json (embedded)
//! ├── contract.rs    # function / event / argument names
//! ├── domain/        # Plan, Subscription, metadata rules, errors
//! ├── ports/         # VolumeSubscriptionApi (in), LedgerConnection (out)
//! ├── application/   # VolumeSubscriptionService
//! ├── adapters/      # InMemoryLedger
//! └── config.rs      # OrchestratorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod contract;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{FaultMode, InMemoryLedger, SubmittedCall};
pub use application::VolumeSubscriptionService;
pub use config::OrchestratorConfig;
pub use contract::{volume_subscription_abi, VOLUME_SUBSCRIPTION_ABI};
pub use domain::{
    CreatePlanRequest, DisplayFields, Metadata, OrchestratorError, Plan, Subscription,
};
pub use ports::{LedgerConnection, ResolvedTxSettings, VolumeSubscriptionApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
