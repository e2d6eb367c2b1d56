//! # Shared Types Crate
//!
//! Ledger primitives used by every crate in the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: addresses, hashes, raw logs and receipts are
//!   defined once here and never redefined per crate.
//! - **Opaque Ledger**: nothing in this crate knows about contract semantics;
//!   it only describes what the ledger node hands back.
//! - **Unchanged Propagation**: [`LedgerError`] is the collaborator's error
//!   type and is passed through every layer untouched.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
