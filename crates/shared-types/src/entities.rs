//! # Core Ledger Entities
//!
//! What the ledger node hands back to a client: raw logs and receipts, plus
//! the settings a client attaches to a submission.
//!
//! ## Clusters
//!
//! - **Primitives**: `Address`, `Hash`, `U256`, `Bytes`
//! - **Inclusion**: `RawLog`, `TransactionReceipt`
//! - **Submission**: `TxSettings`

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

// Fixed-size hashes and 256-bit integers from alloy
pub use alloy_primitives::{Address, B256 as Hash, U256};

// =============================================================================
// PRIMITIVES
// =============================================================================

/// Variable-length byte string (call data, log data, return data).
pub type Bytes = Vec<u8>;

/// Hash identifying a submitted transaction.
pub type TxHash = Hash;

/// Block height.
pub type BlockNumber = u64;

/// Number of seconds in one day. Plan intervals are exposed in days and
/// stored on-chain in seconds.
pub const SECONDS_IN_DAY: u64 = 86_400;

/// Renders bytes as lowercase `0x`-prefixed hex, the ledger-native text form
/// of addresses, hashes and byte strings.
pub fn to_hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Ledger-native text form of an address (full, lowercase, `0x` prefixed).
pub fn address_to_text(address: &Address) -> String {
    to_hex_string(address.as_slice())
}

/// Parses `0x`-prefixed (or bare) hex into an address.
pub fn parse_address(text: &str) -> Option<Address> {
    parse_fixed::<20>(text).map(Address::from)
}

/// Parses `0x`-prefixed (or bare) hex into a 32-byte hash.
pub fn parse_hash(text: &str) -> Option<Hash> {
    parse_fixed::<32>(text).map(Hash::from)
}

fn parse_fixed<const N: usize>(text: &str) -> Option<[u8; N]> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(digits).ok()?;
    bytes.try_into().ok()
}

// =============================================================================
// INCLUSION
// =============================================================================

/// An undecoded log entry as emitted by a contract.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract that emitted the log.
    pub address: Address,
    /// Indexed topics; topic 0 is the event signature for non-anonymous events.
    pub topics: Vec<Hash>,
    /// ABI-encoded non-indexed parameters.
    #[serde_as(as = "Hex")]
    pub data: Bytes,
    /// Block the log was included in.
    pub block_number: Option<BlockNumber>,
    /// Transaction that emitted the log.
    pub transaction_hash: Option<TxHash>,
    /// Position of the log within its block.
    pub log_index: Option<u64>,
}

impl RawLog {
    /// Creates a log that has not been placed in a block yet.
    pub fn new(address: Address, topics: Vec<Hash>, data: Bytes) -> Self {
        Self {
            address,
            topics,
            data,
            block_number: None,
            transaction_hash: None,
            log_index: None,
        }
    }

    /// Signature topic (topic 0), if any.
    pub fn signature_topic(&self) -> Option<&Hash> {
        self.topics.first()
    }
}

/// The finalized record of one submitted call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Hash of the transaction.
    pub transaction_hash: TxHash,
    /// Block that included the transaction.
    pub block_number: BlockNumber,
    /// `true` when execution succeeded, `false` when it reverted.
    pub status: bool,
    /// Logs emitted during execution, in emission order.
    pub logs: Vec<RawLog>,
}

impl TransactionReceipt {
    /// Whether the transaction executed successfully.
    pub fn is_success(&self) -> bool {
        self.status
    }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// Caller-supplied transaction overrides.
///
/// Every `None` field falls back to a default derived from the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSettings {
    /// Sending account.
    pub from: Option<Address>,
    /// Gas limit.
    pub gas: Option<u64>,
    /// Gas price in wei.
    pub gas_price: Option<U256>,
}

impl TxSettings {
    /// Settings that only override the sender.
    pub fn from_sender(from: Address) -> Self {
        Self {
            from: Some(from),
            ..Default::default()
        }
    }

    /// Fills every unset field from `fallback`.
    #[must_use]
    pub fn with_fallback(self, fallback: TxSettings) -> Self {
        Self {
            from: self.from.or(fallback.from),
            gas: self.gas.or(fallback.gas),
            gas_price: self.gas_price.or(fallback.gas_price),
        }
    }
}
