//! Batch decoding of receipts and historical log ranges.

use shared_types::{RawLog, TransactionReceipt};
use tracing::debug;
use vs_telemetry::metrics::{LOGS_DECODED, LOGS_DROPPED};

use super::format::format_raw_decoded_log;
use crate::abi::ContractAbi;
use crate::domain::DecodedEvent;

/// Decodes every log that matches an event of `abi`, in input order.
///
/// Logs from other contracts, unknown signatures and malformed payloads are
/// dropped; the batch never fails.
pub fn decode_logs(abi: &ContractAbi, logs: &[RawLog]) -> Vec<DecodedEvent> {
    logs.iter()
        .filter_map(|log| match abi.match_log(log) {
            Ok(raw) => {
                LOGS_DECODED.with_label_values(&[raw.name.as_str()]).inc();
                Some(format_raw_decoded_log(raw))
            }
            Err(mismatch) => {
                LOGS_DROPPED.inc();
                debug!(
                    contract = ?log.address,
                    reason = %mismatch,
                    "[vs-01] Dropping undecodable log"
                );
                None
            }
        })
        .collect()
}

/// Decodes the logs of a finalized receipt.
pub fn decode_receipt(abi: &ContractAbi, receipt: &TransactionReceipt) -> Vec<DecodedEvent> {
    decode_logs(abi, &receipt.logs)
}
