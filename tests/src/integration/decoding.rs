//! # Decoding Pipeline Against a Live Ledger
//!
//! Receipts and event history produced by the in-memory ledger, decoded by
//! vs-01 with the embedded contract ABI.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::{address_to_text, to_hex_string, U256};
    use vs_01_log_decoding::{
        decode_and_await, decode_logs, ArgumentValue, ContractAbi, LogCodec, RawValue,
        ReceiptSource,
    };
    use vs_02_entity_orchestrator::{
        volume_subscription_abi, LedgerConnection, VolumeSubscriptionApi,
    };

    use crate::fixtures::{contract_address, harness, merchant, plan_request, token};

    const ERC20_ABI: &str = r#"[
        {"type":"event","name":"Transfer","anonymous":false,
         "inputs":[{"indexed":true,"name":"from","type":"address"},
                   {"indexed":true,"name":"to","type":"address"},
                   {"indexed":false,"name":"value","type":"uint256"}]}
    ]"#;

    #[tokio::test]
    async fn test_created_plan_receipt_decodes_with_exact_integers() {
        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        let tx_hash = h.ledger.submitted_calls()[0].tx_hash;

        let receipt = h
            .ledger
            .get_transaction_receipt(&tx_hash)
            .await
            .unwrap()
            .unwrap();
        let abi = volume_subscription_abi().unwrap();
        let events = vs_01_log_decoding::decode_receipt(&abi, &receipt);

        assert_eq!(events.len(), 1);
        let created = &events[0];
        assert_eq!(created.name, "CreatedPlan");
        assert_eq!(created.contract_address, contract_address());

        let names: Vec<&str> = created.arguments.names().collect();
        assert_eq!(
            names,
            vec!["owner", "planIdentifier", "tokenAddress", "interval", "amount"]
        );
        assert_eq!(
            created.argument("owner").and_then(|v| v.as_text()),
            Some(address_to_text(&merchant()).as_str())
        );
        assert_eq!(
            created.argument("planIdentifier").and_then(|v| v.as_text()),
            Some(to_hex_string(plan_hash.as_slice()).as_str())
        );
        assert_eq!(
            created.argument("tokenAddress").and_then(|v| v.as_text()),
            Some(address_to_text(&token()).as_str())
        );
        assert_eq!(
            created.argument("interval").and_then(|v| v.as_decimal()),
            Some(&U256::from(30u64 * 86_400))
        );
        assert_eq!(
            created.argument("amount").and_then(|v| v.as_decimal()),
            Some(&U256::from(10u64).pow(U256::from(18u64)))
        );
    }

    /// `uint256[]` arguments stay raw lists of decimal text.
    #[tokio::test]
    async fn test_payment_amounts_stay_raw() {
        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        let subscription_hash = h
            .service
            .create_subscription(plan_hash, None, None)
            .await
            .unwrap();
        h.ledger.process_payment(subscription_hash).unwrap();

        let abi = volume_subscription_abi().unwrap();
        let topic = abi.event("ProcessedPayment").unwrap().topic();
        let logs = h
            .ledger
            .fetch_historical_logs(contract_address(), topic, 0, None)
            .await
            .unwrap();
        let events = decode_logs(&abi, &logs);

        assert_eq!(events.len(), 1);
        let expected = RawValue::List(vec![
            RawValue::Text(U256::from(10u64).pow(U256::from(18u64)).to_string()),
            RawValue::Text("1000".to_string()),
        ]);
        assert_eq!(
            events[0].argument("amounts"),
            Some(&ArgumentValue::Raw(expected))
        );
        assert!(events[0]
            .argument("paymentDate")
            .and_then(|v| v.as_decimal())
            .is_some());
    }

    /// Two decodes of the same receipt with different ABIs, running at the
    /// same time, see only their own events.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_decodes_with_different_abis() {
        let h = harness();
        h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        let tx_hash = h.ledger.submitted_calls()[0].tx_hash;
        let policy = h.service.config().finality.clone();

        let ledger = Arc::clone(&h.ledger);
        let erc20 = ContractAbi::from_json(ERC20_ABI).unwrap();
        let subscription_abi = volume_subscription_abi().unwrap();

        let (ours, foreign) = tokio::join!(
            decode_and_await(ledger.as_ref(), &subscription_abi, tx_hash, &policy),
            decode_and_await(ledger.as_ref(), &erc20, tx_hash, &policy),
        );

        let ours = ours.unwrap();
        assert_eq!(ours.len(), 1);
        assert_eq!(ours[0].name, "CreatedPlan");
        assert!(foreign.unwrap().is_empty());
    }

    /// History scans see every event kind in emission order.
    #[tokio::test]
    async fn test_history_contains_lifecycle_events() {
        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        let subscription_hash = h
            .service
            .create_subscription(plan_hash, None, None)
            .await
            .unwrap();
        h.service.cancel_subscription(subscription_hash, None).await.unwrap();
        h.service.terminate_plan(plan_hash, None).await.unwrap();

        let abi = volume_subscription_abi().unwrap();
        let mut names = Vec::new();
        for event in ["CreatedPlan", "CreatedSubscription", "CancelledSubscription", "TerminatedPlan"] {
            let topic = abi.event(event).unwrap().topic();
            let logs = h
                .ledger
                .fetch_historical_logs(contract_address(), topic, 0, None)
                .await
                .unwrap();
            names.extend(decode_logs(&abi, &logs).into_iter().map(|e| e.name));
        }
        assert_eq!(
            names,
            vec!["CreatedPlan", "CreatedSubscription", "CancelledSubscription", "TerminatedPlan"]
        );
    }
}
