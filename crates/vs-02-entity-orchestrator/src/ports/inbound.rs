//! # Inbound Ports
//!
//! API trait defining what the orchestrator can do for its callers.

use async_trait::async_trait;
use shared_types::{Address, Hash, TxHash, TxSettings};

use crate::domain::{CreatePlanRequest, Metadata, OrchestratorError, Plan, Subscription};

/// Volume subscription API - inbound port.
///
/// Writes that create an entity wait for finality and return the key the
/// contract assigned. Termination and cancellation return as soon as the
/// transaction is accepted.
#[async_trait]
pub trait VolumeSubscriptionApi: Send + Sync {
    /// Create a plan and return its contract-assigned key.
    async fn create_plan(
        &self,
        request: CreatePlanRequest,
        tx: Option<TxSettings>,
    ) -> Result<Hash, OrchestratorError>;

    /// Terminate a plan as of now. Does not wait for finality.
    async fn terminate_plan(
        &self,
        plan_hash: Hash,
        tx: Option<TxSettings>,
    ) -> Result<TxHash, OrchestratorError>;

    /// Read one plan from contract storage.
    async fn get_plan(&self, plan_hash: Hash) -> Result<Plan, OrchestratorError>;

    /// Every plan ever created by `owner`, in creation order.
    async fn get_plans(&self, owner: Address) -> Result<Vec<Plan>, OrchestratorError>;

    /// Subscribe to a plan and return the contract-assigned subscription key.
    async fn create_subscription(
        &self,
        plan_hash: Hash,
        metadata: Option<Metadata>,
        tx: Option<TxSettings>,
    ) -> Result<Hash, OrchestratorError>;

    /// Cancel a subscription. Does not wait for finality.
    async fn cancel_subscription(
        &self,
        subscription_hash: Hash,
        tx: Option<TxSettings>,
    ) -> Result<TxHash, OrchestratorError>;

    /// Read one subscription from contract storage.
    async fn get_subscription(
        &self,
        subscription_hash: Hash,
    ) -> Result<Subscription, OrchestratorError>;

    /// Every subscription ever created by `owner`, in creation order.
    async fn get_subscriptions_by_user(
        &self,
        owner: Address,
    ) -> Result<Vec<Subscription>, OrchestratorError>;

    /// Every subscription ever created for `plan_hash`, in creation order.
    async fn get_subscriptions_by_plan(
        &self,
        plan_hash: Hash,
    ) -> Result<Vec<Subscription>, OrchestratorError>;
}
