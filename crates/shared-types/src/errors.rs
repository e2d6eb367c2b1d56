//! # Error Types
//!
//! Errors raised by ledger adapters. Upper layers wrap but never rewrite them.

use thiserror::Error;

use crate::entities::TxHash;

/// Failures reported by the ledger collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The RPC transport failed (connection refused, malformed response, ...).
    #[error("Ledger transport error: {0}")]
    Transport(String),

    /// The node refused to accept the submission.
    #[error("Submission rejected: {0}")]
    Rejected(String),

    /// The call was included but execution reverted.
    #[error("Transaction {tx_hash:?} reverted")]
    Reverted {
        /// Hash of the reverted transaction.
        tx_hash: TxHash,
    },

    /// The node did not answer in time.
    #[error("Ledger request timed out: {0}")]
    Timeout(String),
}
