//! # Finality Wait
//!
//! Suspends the calling task until a submitted transaction has a receipt,
//! polling the ledger on a fixed interval under an overall timeout. Other
//! tasks on the runtime keep running while this one sleeps.

use shared_types::{TransactionReceipt, TxHash};
use tracing::{debug, warn};
use vs_telemetry::metrics::{HistogramTimer, FINALITY_FAILURES, FINALITY_WAIT_DURATION};

use crate::abi::ContractAbi;
use crate::algorithms::decode_receipt;
use crate::config::FinalityPolicy;
use crate::domain::{DecodedEvent, DecodingError};
use crate::ports::ReceiptSource;

/// Wait until `tx_hash` has a successful receipt.
///
/// Fails with [`DecodingError::TransactionNotFinalized`] on timeout or when
/// the receipt reports a revert. Ledger errors abort the wait unchanged; no
/// retry is attempted.
pub async fn await_finality<R>(
    source: &R,
    tx_hash: TxHash,
    policy: &FinalityPolicy,
) -> Result<TransactionReceipt, DecodingError>
where
    R: ReceiptSource + ?Sized,
{
    let _timer = HistogramTimer::new(&FINALITY_WAIT_DURATION);

    let receipt = match tokio::time::timeout(policy.timeout(), poll_receipt(source, tx_hash, policy))
        .await
    {
        Ok(result) => result?,
        Err(_) => {
            FINALITY_FAILURES.with_label_values(&["timeout"]).inc();
            warn!(?tx_hash, timeout_secs = policy.timeout_secs, "[vs-01] Gave up waiting for receipt");
            return Err(DecodingError::TransactionNotFinalized {
                tx_hash,
                reason: format!("no receipt after {}s", policy.timeout_secs),
            });
        }
    };

    if !receipt.is_success() {
        FINALITY_FAILURES.with_label_values(&["reverted"]).inc();
        return Err(DecodingError::TransactionNotFinalized {
            tx_hash,
            reason: "execution reverted".to_string(),
        });
    }

    debug!(?tx_hash, block = receipt.block_number, "[vs-01] Transaction finalized");
    Ok(receipt)
}

async fn poll_receipt<R>(
    source: &R,
    tx_hash: TxHash,
    policy: &FinalityPolicy,
) -> Result<TransactionReceipt, DecodingError>
where
    R: ReceiptSource + ?Sized,
{
    loop {
        if let Some(receipt) = source.get_transaction_receipt(&tx_hash).await? {
            return Ok(receipt);
        }
        tokio::time::sleep(policy.poll_interval()).await;
    }
}

/// Await finality of `tx_hash`, then decode its logs against `abi`.
///
/// The ABI is supplied per call, so concurrent decodes against different
/// contracts never interfere.
pub async fn decode_and_await<R>(
    source: &R,
    abi: &ContractAbi,
    tx_hash: TxHash,
    policy: &FinalityPolicy,
) -> Result<Vec<DecodedEvent>, DecodingError>
where
    R: ReceiptSource + ?Sized,
{
    let receipt = await_finality(source, tx_hash, policy).await?;
    Ok(decode_receipt(abi, &receipt))
}
