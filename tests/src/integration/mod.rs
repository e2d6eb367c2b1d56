//! # Integration Flows
//!
//! The orchestrator, the decoding pipeline and the in-memory ledger wired
//! together the way an application would.

pub mod decoding;
pub mod failure_modes;
pub mod subscription_flows;
pub mod telemetry;
