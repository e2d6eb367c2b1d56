//! # Ports Module
//!
//! Outbound dependency of the pipeline: a source of transaction receipts.

pub mod outbound;

pub use outbound::*;
