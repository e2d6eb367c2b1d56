//! # Ports
//!
//! Hexagonal boundaries of the orchestrator.

pub mod inbound;
pub mod outbound;

pub use inbound::VolumeSubscriptionApi;
pub use outbound::{LedgerConnection, ResolvedTxSettings};
