//! # Orchestrator Configuration
//!
//! Contract location, transaction defaults and the finality policy.

use serde::{Deserialize, Serialize};
use shared_types::{parse_address, Address, BlockNumber, TxSettings, U256};
use std::env;
use vs_01_log_decoding::FinalityPolicy;

/// Default gas limit for contract writes.
pub const DEFAULT_GAS: u64 = 6_000_000;

/// Orchestrator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Deployed `VolumeSubscription` contract.
    pub contract_address: Address,

    /// First block of historical log scans (the deployment block).
    pub deployment_block: BlockNumber,

    /// Sender used when a call supplies none.
    pub default_sender: Option<Address>,

    /// Gas limit used when a call supplies none.
    pub default_gas: u64,

    /// Gas price used when a call supplies none; `None` defers to the node.
    pub default_gas_price: Option<U256>,

    /// How writes wait for their receipt.
    pub finality: FinalityPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            contract_address: Address::ZERO,
            deployment_block: 0,
            default_sender: None,
            default_gas: DEFAULT_GAS,
            default_gas_price: None,
            finality: FinalityPolicy::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Create a config for testing (short finality waits).
    pub fn for_testing(contract_address: Address) -> Self {
        Self {
            contract_address,
            finality: FinalityPolicy::for_testing(),
            ..Default::default()
        }
    }

    /// Read configuration from `VS_*` environment variables. Unset or
    /// unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            contract_address: env::var("VS_CONTRACT_ADDRESS")
                .ok()
                .and_then(|v| parse_address(&v))
                .unwrap_or(defaults.contract_address),
            deployment_block: env::var("VS_DEPLOYMENT_BLOCK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.deployment_block),
            default_sender: env::var("VS_DEFAULT_SENDER")
                .ok()
                .and_then(|v| parse_address(&v)),
            default_gas: env::var("VS_DEFAULT_GAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_gas),
            default_gas_price: env::var("VS_DEFAULT_GAS_PRICE")
                .ok()
                .and_then(|v| v.parse::<U256>().ok()),
            finality: FinalityPolicy::from_env(),
        }
    }

    /// Builder: set the default sender.
    #[must_use]
    pub fn with_default_sender(mut self, sender: Address) -> Self {
        self.default_sender = Some(sender);
        self
    }

    /// Defaults applied to every call's [`TxSettings`].
    pub fn tx_defaults(&self) -> TxSettings {
        TxSettings {
            from: self.default_sender,
            gas: Some(self.default_gas),
            gas_price: self.default_gas_price,
        }
    }
}
