//! # Volume Subscription Service
//!
//! Application service driving the `VolumeSubscription` contract.
//!
//! Writes: encode → submit → (await finality → decode → first event's key).
//! Reads: storage getters for single entities, full-history event scans for
//! listings, resolved concurrently in discovery order.

use async_trait::async_trait;
use futures::future::try_join_all;
use shared_types::{
    address_to_text, parse_hash, to_hex_string, Address, Hash, TxHash, TxSettings, U256,
};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;
use vs_01_log_decoding::{
    decode_and_await, decode_logs, CallCodec, ContractAbi, DecodedEvent, DynSolValue, LogCodec,
};
use vs_telemetry::component_span;
use vs_telemetry::metrics::{LOG_SCANS, LOG_SCAN_SIZE, STORAGE_READS, TRANSACTIONS_SUBMITTED};

use crate::config::OrchestratorConfig;
use crate::contract::{arguments, events, functions, volume_subscription_abi};
use crate::domain::{
    days_to_seconds, encode_metadata, identifier_to_bytes32, merge_display_fields,
    CreatePlanRequest, Metadata, OrchestratorError, Plan, Subscription,
};
use crate::ports::{LedgerConnection, ResolvedTxSettings, VolumeSubscriptionApi};

const COMPONENT: &str = "vs-02";

/// `CreatedSubscription` argument a listing filters on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubscriptionField {
    Owner,
    Plan,
}

impl SubscriptionField {
    fn argument(self) -> &'static str {
        match self {
            SubscriptionField::Owner => arguments::OWNER,
            SubscriptionField::Plan => arguments::PLAN_IDENTIFIER,
        }
    }
}

/// Volume Subscription Service - orchestrates contract calls and decoding.
///
/// Holds no mutable state; every read goes back to the ledger.
pub struct VolumeSubscriptionService<L: LedgerConnection> {
    /// Ledger connection.
    ledger: Arc<L>,
    /// Contract ABI, shared with every decode call.
    abi: Arc<ContractAbi>,
    /// Configuration.
    config: OrchestratorConfig,
}

impl<L: LedgerConnection> VolumeSubscriptionService<L> {
    /// Create a service for the embedded `VolumeSubscription` ABI.
    pub fn new(ledger: Arc<L>, config: OrchestratorConfig) -> Result<Self, OrchestratorError> {
        Ok(Self::with_abi(
            ledger,
            Arc::new(volume_subscription_abi()?),
            config,
        ))
    }

    /// Create a service with an already parsed ABI.
    pub fn with_abi(ledger: Arc<L>, abi: Arc<ContractAbi>, config: OrchestratorConfig) -> Self {
        Self {
            ledger,
            abi,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Contract ABI in use.
    pub fn abi(&self) -> &ContractAbi {
        &self.abi
    }

    /// Apply configured defaults to per-call overrides.
    fn resolve_settings(
        &self,
        tx: Option<TxSettings>,
    ) -> Result<ResolvedTxSettings, OrchestratorError> {
        let merged = tx.unwrap_or_default().with_fallback(self.config.tx_defaults());
        let from = merged.from.ok_or_else(|| {
            OrchestratorError::InvalidArgument(
                "no sender: set TxSettings::from or a default sender".to_string(),
            )
        })?;
        Ok(ResolvedTxSettings {
            from,
            gas: merged.gas.unwrap_or(self.config.default_gas),
            gas_price: merged.gas_price,
        })
    }

    /// Encode and submit a contract call. Returns once accepted.
    async fn submit(
        &self,
        function_name: &'static str,
        args: &[DynSolValue],
        tx: Option<TxSettings>,
    ) -> Result<TxHash, OrchestratorError> {
        let function = self.abi.function(function_name)?;
        let call_data = function.encode_input(args)?;
        let settings = self.resolve_settings(tx)?;

        let tx_hash = self
            .ledger
            .submit_call(
                self.config.contract_address,
                function.selector().0,
                call_data,
                &settings,
            )
            .await?;

        TRANSACTIONS_SUBMITTED
            .with_label_values(&[function_name])
            .inc();
        info!(
            function = function_name,
            ?tx_hash,
            from = ?settings.from,
            gas = settings.gas,
            "[vs-02] Submitted contract call"
        );
        Ok(tx_hash)
    }

    /// Submit, wait for finality, and read `key` from the first decoded event.
    async fn submit_for_identifier(
        &self,
        function_name: &'static str,
        args: &[DynSolValue],
        tx: Option<TxSettings>,
        key: &'static str,
    ) -> Result<Hash, OrchestratorError> {
        let tx_hash = self.submit(function_name, args, tx).await?;
        let events =
            decode_and_await(self.ledger.as_ref(), &self.abi, tx_hash, &self.config.finality)
                .await?;
        extract_identifier(&events, key)
    }

    /// Call a `bytes32`-keyed storage getter and decode its outputs.
    async fn read_record(
        &self,
        function_name: &'static str,
        key: Hash,
    ) -> Result<Vec<DynSolValue>, OrchestratorError> {
        let function = self.abi.function(function_name)?;
        let call_data = function.encode_input(&[bytes32(key)])?;
        let raw = self
            .ledger
            .read_storage(self.config.contract_address, function.selector().0, call_data)
            .await?;

        STORAGE_READS.with_label_values(&[function_name]).inc();
        Ok(function.decode_output(&raw)?)
    }

    async fn load_plan(&self, plan_hash: Hash) -> Result<Plan, OrchestratorError> {
        let values = self.read_record(functions::PLANS, plan_hash).await?;
        let plan = Plan::from_storage(plan_hash, &values)?;
        if plan.is_empty() {
            debug!(?plan_hash, "[vs-02] Plan read returned the zero record");
        }
        Ok(plan)
    }

    async fn load_subscription(
        &self,
        subscription_hash: Hash,
    ) -> Result<Subscription, OrchestratorError> {
        let values = self
            .read_record(functions::SUBSCRIPTIONS, subscription_hash)
            .await?;
        let subscription = Subscription::from_storage(subscription_hash, &values)?;
        if subscription.is_empty() {
            debug!(?subscription_hash, "[vs-02] Subscription read returned the zero record");
        }
        Ok(subscription)
    }

    /// Every occurrence of `event_name` since the deployment block, decoded.
    async fn scan(&self, event_name: &'static str) -> Result<Vec<DecodedEvent>, OrchestratorError> {
        let topic = self.abi.event(event_name)?.topic();
        let logs = self
            .ledger
            .fetch_historical_logs(
                self.config.contract_address,
                topic,
                self.config.deployment_block,
                None,
            )
            .await?;

        LOG_SCANS.with_label_values(&[event_name]).inc();
        LOG_SCAN_SIZE.observe(logs.len() as f64);
        debug!(event = event_name, logs = logs.len(), "[vs-02] Scanned event history");
        Ok(decode_logs(&self.abi, &logs))
    }

    /// Subscriptions whose `CreatedSubscription` event has `field == value`.
    async fn subscriptions_matching(
        &self,
        field: SubscriptionField,
        value: String,
    ) -> Result<Vec<Subscription>, OrchestratorError> {
        let created = self.scan(events::CREATED_SUBSCRIPTION).await?;
        let ids = matching_identifiers(
            &created,
            field.argument(),
            &value,
            arguments::SUBSCRIPTION_IDENTIFIER,
        );
        try_join_all(ids.into_iter().map(|id| self.load_subscription(id))).await
    }
}

fn bytes32(hash: Hash) -> DynSolValue {
    DynSolValue::FixedBytes(hash, 32)
}

fn uint256(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

fn unix_now() -> U256 {
    U256::from(u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default())
}

/// The contract-assigned key reported by the first decoded event.
fn extract_identifier(
    events: &[DecodedEvent],
    key: &'static str,
) -> Result<Hash, OrchestratorError> {
    let missing = |event: &str| OrchestratorError::MissingIdentifier {
        event: event.to_string(),
        key,
    };

    let first = events.first().ok_or_else(|| missing("<none>"))?;
    first
        .argument(key)
        .and_then(|value| value.as_text())
        .filter(|text| !text.is_empty())
        .and_then(parse_hash)
        .ok_or_else(|| missing(&first.name))
}

/// Keys (`key` argument) of events whose `field` argument equals `value`.
fn matching_identifiers(
    events: &[DecodedEvent],
    field: &str,
    value: &str,
    key: &str,
) -> Vec<Hash> {
    events
        .iter()
        .filter(|event| event.argument(field).and_then(|v| v.as_text()) == Some(value))
        .filter_map(|event| {
            let id = event
                .argument(key)
                .and_then(|v| v.as_text())
                .and_then(parse_hash);
            if id.is_none() {
                warn!(event = %event.name, key, "[vs-02] Skipping event without a usable key");
            }
            id
        })
        .collect()
}

#[async_trait]
impl<L: LedgerConnection + 'static> VolumeSubscriptionApi for VolumeSubscriptionService<L> {
    async fn create_plan(
        &self,
        request: CreatePlanRequest,
        tx: Option<TxSettings>,
    ) -> Result<Hash, OrchestratorError> {
        let span = component_span!(
            "create_plan",
            component = COMPONENT,
            operation_id = %Uuid::new_v4(),
            identifier = %request.identifier
        );

        async move {
            let identifier = identifier_to_bytes32(&request.identifier)?;
            let metadata = merge_display_fields(
                request.metadata.unwrap_or_default(),
                request.name.as_deref(),
                request.description.as_deref(),
                request.image_url.as_deref(),
            );
            let data = encode_metadata(Some(&metadata))?;

            let args = [
                DynSolValue::Address(request.owner),
                DynSolValue::Address(request.token_address),
                bytes32(Hash::from(identifier)),
                uint256(days_to_seconds(request.interval_days)),
                uint256(request.amount),
                uint256(request.fee),
                DynSolValue::String(data),
            ];
            let plan_hash = self
                .submit_for_identifier(
                    functions::CREATE_PLAN,
                    &args,
                    tx,
                    arguments::PLAN_IDENTIFIER,
                )
                .await?;

            info!(?plan_hash, "[vs-02] Plan created");
            Ok(plan_hash)
        }
        .instrument(span)
        .await
    }

    async fn terminate_plan(
        &self,
        plan_hash: Hash,
        tx: Option<TxSettings>,
    ) -> Result<TxHash, OrchestratorError> {
        let span = component_span!(
            "terminate_plan",
            component = COMPONENT,
            operation_id = %Uuid::new_v4(),
            ?plan_hash
        );

        async move {
            let args = [bytes32(plan_hash), uint256(unix_now())];
            self.submit(functions::TERMINATE_PLAN, &args, tx).await
        }
        .instrument(span)
        .await
    }

    async fn get_plan(&self, plan_hash: Hash) -> Result<Plan, OrchestratorError> {
        self.load_plan(plan_hash).await
    }

    async fn get_plans(&self, owner: Address) -> Result<Vec<Plan>, OrchestratorError> {
        let created = self.scan(events::CREATED_PLAN).await?;
        let ids = matching_identifiers(
            &created,
            arguments::OWNER,
            &address_to_text(&owner),
            arguments::PLAN_IDENTIFIER,
        );
        debug!(?owner, plans = ids.len(), "[vs-02] Resolving plans");
        try_join_all(ids.into_iter().map(|id| self.load_plan(id))).await
    }

    async fn create_subscription(
        &self,
        plan_hash: Hash,
        metadata: Option<Metadata>,
        tx: Option<TxSettings>,
    ) -> Result<Hash, OrchestratorError> {
        let span = component_span!(
            "create_subscription",
            component = COMPONENT,
            operation_id = %Uuid::new_v4(),
            ?plan_hash
        );

        async move {
            let data = encode_metadata(metadata.as_ref())?;
            let args = [bytes32(plan_hash), DynSolValue::String(data)];
            let subscription_hash = self
                .submit_for_identifier(
                    functions::CREATE_SUBSCRIPTION,
                    &args,
                    tx,
                    arguments::SUBSCRIPTION_IDENTIFIER,
                )
                .await?;

            info!(?subscription_hash, "[vs-02] Subscription created");
            Ok(subscription_hash)
        }
        .instrument(span)
        .await
    }

    async fn cancel_subscription(
        &self,
        subscription_hash: Hash,
        tx: Option<TxSettings>,
    ) -> Result<TxHash, OrchestratorError> {
        let span = component_span!(
            "cancel_subscription",
            component = COMPONENT,
            operation_id = %Uuid::new_v4(),
            ?subscription_hash
        );

        async move {
            self.submit(functions::CANCEL_SUBSCRIPTION, &[bytes32(subscription_hash)], tx)
                .await
        }
        .instrument(span)
        .await
    }

    async fn get_subscription(
        &self,
        subscription_hash: Hash,
    ) -> Result<Subscription, OrchestratorError> {
        self.load_subscription(subscription_hash).await
    }

    async fn get_subscriptions_by_user(
        &self,
        owner: Address,
    ) -> Result<Vec<Subscription>, OrchestratorError> {
        self.subscriptions_matching(SubscriptionField::Owner, address_to_text(&owner))
            .await
    }

    async fn get_subscriptions_by_plan(
        &self,
        plan_hash: Hash,
    ) -> Result<Vec<Subscription>, OrchestratorError> {
        self.subscriptions_matching(
            SubscriptionField::Plan,
            to_hex_string(plan_hash.as_slice()),
        )
        .await
    }
}
