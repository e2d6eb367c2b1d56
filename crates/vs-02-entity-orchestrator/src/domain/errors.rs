//! # Domain Errors
//!
//! Error type for the entity orchestrator. Collaborator errors are wrapped
//! without reinterpretation.

use shared_types::LedgerError;
use thiserror::Error;
use vs_01_log_decoding::{AbiError, DecodingError};

/// Orchestrator error types.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The finalized transaction did not report the contract-assigned key.
    #[error("Event {event} carries no usable `{key}`")]
    MissingIdentifier {
        /// Name of the first decoded event, or `<none>` when nothing decoded
        event: String,
        /// Argument that was expected to hold the identifier
        key: &'static str,
    },

    /// A caller-supplied argument cannot be encoded for the contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Metadata could not be serialized.
    #[error("Metadata serialization failed: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Finality wait or receipt decoding failed.
    #[error(transparent)]
    Decoding(#[from] DecodingError),

    /// The ledger collaborator failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Call data or return data did not fit the contract ABI.
    #[error(transparent)]
    Abi(#[from] AbiError),
}
