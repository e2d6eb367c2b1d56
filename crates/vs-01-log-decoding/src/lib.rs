//! # VS-01 Log Decoding Pipeline
//!
//! Turns transaction receipts and historical log batches into typed
//! [`DecodedEvent`]s.
//!
//! **Component ID:** vs-01
//! **Architecture:** Hexagonal (domain / algorithms / ports / application)
//!
//! ## Pipeline
//!
//! ```text
//! RawLog ──match_log──▶ RawDecodedLog ──format_raw_decoded_log──▶ DecodedEvent
//!            │
//!            └─ no matching signature / malformed: dropped, batch continues
//! ```
//!
//! ## Guarantees
//!
//! | Property | How |
//! |----------|-----|
//! | Order preserved | Output follows receipt / batch order |
//! | Exact integers | Scalar `uintN` arguments are `U256` decimals |
//! | Raw uint arrays | `uintN[]` arguments stay lists of decimal text |
//! | No shared decoder state | The ABI is an argument of every decode call |
//! | Bounded wait | Finality polling runs under `FinalityPolicy::timeout` |
//!
//! ## Module Structure
//!
//! ```text
//! vs-01-log-decoding/
//! ├── abi/           # ContractAbi over alloy JsonAbi, log and call codecs
//! ├── domain/        # DecodedEvent, RawDecodedLog, errors
//! ├── algorithms/    # formatting + batch decoding
//! ├── ports/         # ReceiptSource (outbound) + mock
//! ├── application/   # await_finality, decode_and_await
//! └── config.rs      # FinalityPolicy
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use abi::{keccak256, CallCodec, ContractAbi, LogCodec};
pub use alloy_dyn_abi::{DynSolType, DynSolValue};
pub use alloy_json_abi::{Event, Function};
pub use algorithms::{decode_logs, decode_receipt, format_raw_decoded_log};
pub use application::{await_finality, decode_and_await};
pub use config::FinalityPolicy;
pub use domain::{
    AbiError, ArgumentValue, DecodeMismatch, DecodedEvent, DecodingError, EventArguments,
    RawDecodedLog, RawDecodedParam, RawValue,
};
pub use ports::{MockReceiptSource, ReceiptSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
