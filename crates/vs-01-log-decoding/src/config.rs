//! # Finality Policy
//!
//! How long and how often the pipeline polls for a receipt.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default delay between receipt polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default upper bound on the whole wait.
pub const DEFAULT_FINALITY_TIMEOUT_SECS: u64 = 120;

/// Bounded polling policy for awaiting finality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalityPolicy {
    /// Delay between receipt polls, in milliseconds.
    pub poll_interval_ms: u64,

    /// Give up after this many seconds.
    pub timeout_secs: u64,
}

impl Default for FinalityPolicy {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_secs: DEFAULT_FINALITY_TIMEOUT_SECS,
        }
    }
}

impl FinalityPolicy {
    /// Create a policy for testing (short waits).
    pub fn for_testing() -> Self {
        Self {
            poll_interval_ms: 10,
            timeout_secs: 2,
        }
    }

    /// Read `VS_FINALITY_POLL_MS` and `VS_FINALITY_TIMEOUT_SECS`, falling
    /// back to the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval_ms: env::var("VS_FINALITY_POLL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.poll_interval_ms),
            timeout_secs: env::var("VS_FINALITY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
