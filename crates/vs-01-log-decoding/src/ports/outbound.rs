//! # Outbound Ports
//!
//! Traits for the ledger collaborator as seen by the pipeline.

use async_trait::async_trait;
use shared_types::{LedgerError, TransactionReceipt, TxHash};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Receipt lookup - outbound port.
///
/// `Ok(None)` means "not finalized yet"; the pipeline keeps polling.
#[async_trait]
pub trait ReceiptSource: Send + Sync {
    /// Fetch the receipt of a submitted transaction, if it is final.
    async fn get_transaction_receipt(
        &self,
        tx_hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, LedgerError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Mock receipt source for testing.
#[derive(Default)]
pub struct MockReceiptSource {
    /// Receipts by transaction hash.
    pub receipts: HashMap<TxHash, TransactionReceipt>,
    /// Polls answered with `None` before a receipt is returned.
    pub pending_polls: usize,
    /// Should return errors?
    pub should_fail: bool,
    polls: AtomicUsize,
}

impl MockReceiptSource {
    /// Mock that already knows `receipt`.
    pub fn with_receipt(receipt: TransactionReceipt) -> Self {
        let mut receipts = HashMap::new();
        receipts.insert(receipt.transaction_hash, receipt);
        Self {
            receipts,
            ..Default::default()
        }
    }

    /// Mock whose every lookup fails with a transport error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Answer the first `polls` lookups with "not final yet".
    #[must_use]
    pub fn with_pending_polls(mut self, polls: usize) -> Self {
        self.pending_polls = polls;
        self
    }

    /// Number of lookups served so far.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReceiptSource for MockReceiptSource {
    async fn get_transaction_receipt(
        &self,
        tx_hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, LedgerError> {
        if self.should_fail {
            return Err(LedgerError::Transport("Mock failure".to_string()));
        }

        let served = self.polls.fetch_add(1, Ordering::SeqCst);
        if served < self.pending_polls {
            return Ok(None);
        }
        Ok(self.receipts.get(tx_hash).cloned())
    }
}
