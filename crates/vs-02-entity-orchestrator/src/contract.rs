//! # VolumeSubscription Contract Schema
//!
//! The JSON ABI of the contract this crate drives, embedded at build time,
//! plus the names of the functions, events and event arguments the
//! orchestrator relies on.

use vs_01_log_decoding::{AbiError, ContractAbi};

/// Build artifact of the `VolumeSubscription` contract.
pub const VOLUME_SUBSCRIPTION_ABI: &str = include_str!("../abi/VolumeSubscription.json");

/// Contract functions.
pub mod functions {
    /// `createPlan(address,address,bytes32,uint256,uint256,uint256,string)`
    pub const CREATE_PLAN: &str = "createPlan";
    /// `terminatePlan(bytes32,uint256)`
    pub const TERMINATE_PLAN: &str = "terminatePlan";
    /// `plans(bytes32)` storage getter
    pub const PLANS: &str = "plans";
    /// `createSubscription(bytes32,string)`
    pub const CREATE_SUBSCRIPTION: &str = "createSubscription";
    /// `cancelSubscription(bytes32)`
    pub const CANCEL_SUBSCRIPTION: &str = "cancelSubscription";
    /// `subscriptions(bytes32)` storage getter
    pub const SUBSCRIPTIONS: &str = "subscriptions";
}

/// Contract events.
pub mod events {
    /// Emitted once per created plan.
    pub const CREATED_PLAN: &str = "CreatedPlan";
    /// Emitted when a plan is terminated.
    pub const TERMINATED_PLAN: &str = "TerminatedPlan";
    /// Emitted once per created subscription.
    pub const CREATED_SUBSCRIPTION: &str = "CreatedSubscription";
    /// Emitted when a subscription is cancelled.
    pub const CANCELLED_SUBSCRIPTION: &str = "CancelledSubscription";
    /// Emitted by payment processing, outside this client's write surface.
    pub const PROCESSED_PAYMENT: &str = "ProcessedPayment";
}

/// Event argument names.
pub mod arguments {
    /// Owner of a plan or subscription.
    pub const OWNER: &str = "owner";
    /// Contract-assigned plan key.
    pub const PLAN_IDENTIFIER: &str = "planIdentifier";
    /// Contract-assigned subscription key.
    pub const SUBSCRIPTION_IDENTIFIER: &str = "subscriptionIdentifier";
}

/// Parses the embedded ABI.
pub fn volume_subscription_abi() -> Result<ContractAbi, AbiError> {
    ContractAbi::from_json(VOLUME_SUBSCRIPTION_ABI)
}
