//! # Failure Modes
//!
//! How ledger misbehaviour surfaces through the orchestrator.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shared_types::{Hash, LedgerError};
    use vs_01_log_decoding::DecodingError;
    use vs_02_entity_orchestrator::{FaultMode, OrchestratorError, VolumeSubscriptionApi};

    use crate::fixtures::{harness, plan_request};

    /// A write whose receipt never appears fails once the policy times out.
    #[tokio::test(start_paused = true)]
    async fn test_never_finalized_create_times_out() {
        let h = harness();
        h.ledger.set_fault(FaultMode::NeverFinalize);

        let started = tokio::time::Instant::now();
        let result = h.service.create_plan(plan_request("gold", 30), None).await;
        let waited = started.elapsed();

        match result {
            Err(OrchestratorError::Decoding(DecodingError::TransactionNotFinalized {
                reason,
                ..
            })) => assert!(reason.contains("no receipt")),
            other => panic!("unexpected: {other:?}"),
        }
        let timeout = h.service.config().finality.timeout();
        assert!(waited >= timeout);
        assert!(waited < timeout + Duration::from_secs(1));
        assert!(h.ledger.receipt_polls() > 1);
    }

    /// Slow finality within the timeout still succeeds.
    #[tokio::test(start_paused = true)]
    async fn test_delayed_finality_succeeds() {
        let h = harness();
        h.ledger.set_finality_delay(5);

        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        assert!(!h.service.get_plan(plan_hash).await.unwrap().is_empty());
        assert_eq!(h.ledger.receipt_polls(), 6);
    }

    #[tokio::test]
    async fn test_reverted_create_surfaces_as_not_finalized() {
        let h = harness();
        h.service.create_plan(plan_request("gold", 30), None).await.unwrap();

        // Same owner and identifier: the contract refuses the duplicate.
        let result = h.service.create_plan(plan_request("gold", 30), None).await;
        match result {
            Err(OrchestratorError::Decoding(DecodingError::TransactionNotFinalized {
                reason,
                ..
            })) => assert!(reason.contains("reverted")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    /// Subscribing to a plan that does not exist reverts.
    #[tokio::test]
    async fn test_subscribe_to_unknown_plan() {
        let h = harness();
        let result = h
            .service
            .create_subscription(Hash::repeat_byte(0x21), None, None)
            .await;
        assert!(matches!(
            result,
            Err(OrchestratorError::Decoding(
                DecodingError::TransactionNotFinalized { .. }
            ))
        ));
    }

    /// A successful transaction that emits no decodable event.
    #[tokio::test]
    async fn test_missing_event_is_reported() {
        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        h.ledger.set_fault(FaultMode::SuppressEvents);

        match h.service.create_subscription(plan_hash, None, None).await {
            Err(OrchestratorError::MissingIdentifier { event, key }) => {
                assert_eq!(event, "<none>");
                assert_eq!(key, "subscriptionIdentifier");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through_unchanged() {
        let h = harness();
        h.ledger.set_fault(FaultMode::Unavailable);

        let results = [
            h.service.create_plan(plan_request("gold", 30), None).await.err(),
            h.service.get_plan(Hash::ZERO).await.err(),
            h.service.get_subscriptions_by_user(crate::fixtures::subscriber()).await.err(),
            h.service.cancel_subscription(Hash::ZERO, None).await.err(),
        ];
        for error in results {
            assert!(matches!(
                error,
                Some(OrchestratorError::Ledger(LedgerError::Transport(_)))
            ));
        }
    }

    #[tokio::test]
    async fn test_recovery_after_fault_is_cleared() {
        let h = harness();
        h.ledger.set_fault(FaultMode::Unavailable);
        assert!(h.service.get_plans(crate::fixtures::merchant()).await.is_err());

        h.ledger.set_fault(FaultMode::None);
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        assert_eq!(
            h.service.get_plans(crate::fixtures::merchant()).await.unwrap()[0].plan_hash,
            plan_hash
        );
    }
}
