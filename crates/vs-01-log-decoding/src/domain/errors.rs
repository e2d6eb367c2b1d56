//! # Domain Errors
//!
//! Error types for the log decoding pipeline.
//!
//! Only [`DecodingError`] ever reaches a caller of the pipeline operations.
//! [`DecodeMismatch`] is recovered locally by dropping the offending log.

use shared_types::{Hash, LedgerError, TxHash};
use thiserror::Error;

/// ABI schema and codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// The ABI document is not valid JSON or has the wrong shape.
    #[error("Invalid ABI JSON: {0}")]
    InvalidJson(String),

    /// A parameter type string could not be resolved.
    #[error("Unknown ABI type: {0}")]
    UnknownType(String),

    /// No event with this name in the ABI.
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// No function with this name or selector in the ABI.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Topics do not line up with the event's indexed parameters.
    #[error("Invalid ABI data: {0}")]
    InvalidData(String),

    /// The encoder or decoder rejected the values or bytes.
    #[error("ABI codec error: {0}")]
    Codec(String),

    /// Wrong number of values for a parameter list.
    #[error("Expected {expected} values, got {got}")]
    ArityMismatch {
        /// Number of declared parameters
        expected: usize,
        /// Number of supplied values
        got: usize,
    },

    /// A value does not fit its declared type.
    #[error("Value does not match type {0}")]
    TypeMismatch(String),
}

impl From<alloy_dyn_abi::Error> for AbiError {
    fn from(err: alloy_dyn_abi::Error) -> Self {
        AbiError::Codec(err.to_string())
    }
}

/// Why a raw log was not turned into an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeMismatch {
    /// The log has no topics, so no signature to match.
    #[error("Log has no signature topic")]
    NoSignature,

    /// Topic 0 is not the signature of any registered event.
    #[error("No registered event for topic {0:?}")]
    UnknownSignature(Hash),

    /// The signature matched but topics or data could not be decoded.
    #[error("Malformed {event} log: {source}")]
    Malformed {
        /// Event whose signature matched
        event: String,
        /// Underlying codec failure
        source: AbiError,
    },
}

/// Errors surfaced by the pipeline operations.
#[derive(Debug, Error)]
pub enum DecodingError {
    /// The ledger never produced a successful receipt for the transaction.
    #[error("Transaction {tx_hash:?} not finalized: {reason}")]
    TransactionNotFinalized {
        /// The submitted transaction
        tx_hash: TxHash,
        /// Timeout or revert description
        reason: String,
    },

    /// The ledger collaborator failed; passed through unchanged.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// ABI schema problem (e.g. unparseable ABI document).
    #[error(transparent)]
    Abi(#[from] AbiError),
}
