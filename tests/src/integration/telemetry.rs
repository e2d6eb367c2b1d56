//! # Telemetry
//!
//! Metrics recorded while the orchestrator drives the ledger.

#[cfg(test)]
mod tests {
    use vs_02_entity_orchestrator::VolumeSubscriptionApi;
    use vs_telemetry::{encode_metrics, register_metrics};

    use crate::fixtures::{harness, merchant, plan_request};

    #[tokio::test]
    async fn test_operations_show_up_in_exported_metrics() {
        let handle = register_metrics().unwrap();
        // Idempotent.
        register_metrics().unwrap();

        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        h.service.get_plan(plan_hash).await.unwrap();
        h.service.get_plans(merchant()).await.unwrap();

        let text = encode_metrics().unwrap();
        assert!(text.contains("vs_orchestrator_transactions_submitted_total"));
        assert!(text.contains(r#"operation="createPlan""#));
        assert!(text.contains("vs_orchestrator_storage_reads_total"));
        assert!(text.contains("vs_orchestrator_log_scans_total"));
        assert!(text.contains("vs_pipeline_logs_decoded_total"));
        assert!(handle.family_count() >= 4);
    }
}
