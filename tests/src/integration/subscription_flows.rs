//! # Subscription Flows
//!
//! Subscribe, list, pay and cancel end to end.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};
    use shared_types::{Hash, TxSettings};
    use vs_02_entity_orchestrator::VolumeSubscriptionApi;

    use crate::fixtures::{harness, merchant, plan_request, subscriber, token};

    fn as_subscriber() -> Option<TxSettings> {
        Some(TxSettings::from_sender(subscriber()))
    }

    #[tokio::test]
    async fn test_subscribe_and_read_back() {
        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();

        let metadata = match json!({"email": "someone@example.org"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let subscription_hash = h
            .service
            .create_subscription(plan_hash, Some(metadata), as_subscriber())
            .await
            .unwrap();

        let subscription = h.service.get_subscription(subscription_hash).await.unwrap();
        assert_eq!(subscription.identifier, subscription_hash);
        assert_eq!(subscription.owner, subscriber());
        assert_eq!(subscription.token_address, token());
        assert_eq!(subscription.plan_hash, plan_hash);
        assert_eq!(subscription.termination_date, 0);
        assert_eq!(subscription.data, r#"{"email":"someone@example.org"}"#);
    }

    #[tokio::test]
    async fn test_listings_by_user_and_plan() {
        let h = harness();
        let gold = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        let silver = h.service.create_plan(plan_request("silver", 30), None).await.unwrap();

        let merchant_gold = h.service.create_subscription(gold, None, None).await.unwrap();
        let subscriber_silver = h
            .service
            .create_subscription(silver, None, as_subscriber())
            .await
            .unwrap();
        let subscriber_gold = h
            .service
            .create_subscription(gold, None, as_subscriber())
            .await
            .unwrap();

        let ids = |subs: Vec<vs_02_entity_orchestrator::Subscription>| -> Vec<Hash> {
            subs.into_iter().map(|s| s.identifier).collect()
        };

        assert_eq!(
            ids(h.service.get_subscriptions_by_user(subscriber()).await.unwrap()),
            vec![subscriber_silver, subscriber_gold]
        );
        assert_eq!(
            ids(h.service.get_subscriptions_by_user(merchant()).await.unwrap()),
            vec![merchant_gold]
        );
        assert_eq!(
            ids(h.service.get_subscriptions_by_plan(gold).await.unwrap()),
            vec![merchant_gold, subscriber_gold]
        );
        assert_eq!(
            ids(h.service.get_subscriptions_by_plan(silver).await.unwrap()),
            vec![subscriber_silver]
        );
    }

    /// A plan nobody subscribed to lists nothing.
    #[tokio::test]
    async fn test_plan_without_subscribers() {
        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("lonely", 30), None).await.unwrap();
        assert!(h
            .service
            .get_subscriptions_by_plan(plan_hash)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_payment_then_cancel() {
        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        let subscription_hash = h
            .service
            .create_subscription(plan_hash, None, as_subscriber())
            .await
            .unwrap();
        let created = h.service.get_subscription(subscription_hash).await.unwrap();

        h.ledger.advance_time(30 * 86_400);
        h.ledger.process_payment(subscription_hash).unwrap();
        let paid = h.service.get_subscription(subscription_hash).await.unwrap();
        assert!(paid.last_payment_date >= created.last_payment_date + 30 * 86_400);

        h.service
            .cancel_subscription(subscription_hash, as_subscriber())
            .await
            .unwrap();
        let cancelled = h.service.get_subscription(subscription_hash).await.unwrap();
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.last_payment_date, paid.last_payment_date);

        // Cancelled subscriptions take no further payments.
        assert!(h.ledger.process_payment(subscription_hash).is_err());
    }

    /// Cancellation by someone else is mined but reverts on-chain.
    #[tokio::test]
    async fn test_cancel_by_stranger_has_no_effect() {
        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        let subscription_hash = h
            .service
            .create_subscription(plan_hash, None, as_subscriber())
            .await
            .unwrap();

        h.service.cancel_subscription(subscription_hash, None).await.unwrap();
        let subscription = h.service.get_subscription(subscription_hash).await.unwrap();
        assert!(!subscription.is_cancelled());
    }

    /// Concurrent reads from separate tasks see the same state.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads() {
        let h = harness();
        let plan_hash = h.service.create_plan(plan_request("gold", 30), None).await.unwrap();
        let mut expected = Vec::new();
        for _ in 0..5 {
            expected.push(
                h.service
                    .create_subscription(plan_hash, None, as_subscriber())
                    .await
                    .unwrap(),
            );
        }

        let service = Arc::new(h.service);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.get_subscriptions_by_plan(plan_hash).await })
            })
            .collect();

        for handle in handles {
            let subs = handle.await.unwrap().unwrap();
            let ids: Vec<Hash> = subs.iter().map(|s| s.identifier).collect();
            assert_eq!(ids, expected);
        }
    }
}
