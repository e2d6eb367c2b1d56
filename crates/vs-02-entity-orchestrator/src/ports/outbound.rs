//! # Outbound Ports
//!
//! What the orchestrator needs from the ledger node.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Address, BlockNumber, Bytes, Hash, LedgerError, RawLog, TxHash, U256};
use vs_01_log_decoding::ReceiptSource;

/// Transaction settings after defaults have been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTxSettings {
    /// Sending account.
    pub from: Address,
    /// Gas limit.
    pub gas: u64,
    /// Gas price; `None` lets the node choose.
    pub gas_price: Option<U256>,
}

/// Ledger connection - outbound port.
///
/// Receipt lookup comes from [`ReceiptSource`] so the same connection can be
/// handed to the decoding pipeline.
#[async_trait]
pub trait LedgerConnection: ReceiptSource {
    /// Submit a state-changing call. Returns once the node has accepted the
    /// transaction, not when it is final.
    async fn submit_call(
        &self,
        contract: Address,
        selector: [u8; 4],
        encoded_args: Bytes,
        settings: &ResolvedTxSettings,
    ) -> Result<TxHash, LedgerError>;

    /// Execute a read-only call and return the raw ABI-encoded result.
    async fn read_storage(
        &self,
        contract: Address,
        selector: [u8; 4],
        encoded_args: Bytes,
    ) -> Result<Bytes, LedgerError>;

    /// Logs emitted by `contract` with signature `topic` in
    /// `from_block..=to_block` (`None` = latest), in emission order.
    async fn fetch_historical_logs(
        &self,
        contract: Address,
        topic: Hash,
        from_block: BlockNumber,
        to_block: Option<BlockNumber>,
    ) -> Result<Vec<RawLog>, LedgerError>;
}
