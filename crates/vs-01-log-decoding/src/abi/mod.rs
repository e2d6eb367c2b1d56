//! # Contract ABI
//!
//! Static event and function schema of one contract, parsed from the
//! standard JSON ABI with `alloy-json-abi` and encoded or decoded with
//! `alloy-dyn-abi`. A [`ContractAbi`] is immutable once built and is passed
//! explicitly to every decode call; there is no process-wide registry.

pub mod calls;
pub mod events;

use std::collections::HashMap;

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::{Event, Function, JsonAbi};
use serde::Deserialize;
use shared_types::{Hash, RawLog};

pub use alloy_primitives::keccak256;
pub use calls::CallCodec;
pub use events::{is_word_type, LogCodec};

use crate::domain::{AbiError, DecodeMismatch, RawDecodedLog};

/// Build artifact shape: `{"contractName": ..., "abi": [...]}`.
#[derive(Debug, Deserialize)]
struct Artifact {
    #[serde(rename = "contractName", default)]
    contract_name: Option<String>,
    abi: JsonAbi,
}

/// Event and function table of one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractAbi {
    /// Contract name when parsed from a build artifact.
    pub contract_name: Option<String>,
    abi: JsonAbi,
    by_topic: HashMap<Hash, Event>,
    by_selector: HashMap<[u8; 4], Function>,
}

impl ContractAbi {
    /// Parses a JSON ABI. Accepts a bare entry array or a build artifact
    /// object carrying `abi` (and optionally `contractName`).
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let invalid = |e: serde_json::Error| AbiError::InvalidJson(e.to_string());

        match json.trim_start().chars().next() {
            Some('[') => Ok(Self::new(None, serde_json::from_str(json).map_err(invalid)?)),
            Some('{') => {
                let artifact: Artifact = serde_json::from_str(json).map_err(invalid)?;
                Ok(Self::new(artifact.contract_name, artifact.abi))
            }
            _ => Err(AbiError::InvalidJson("expected array or object".into())),
        }
    }

    /// Wraps an already parsed ABI.
    pub fn new(contract_name: Option<String>, abi: JsonAbi) -> Self {
        let by_topic = abi
            .events()
            .filter(|event| !event.anonymous)
            .map(|event| (event.selector(), event.clone()))
            .collect();
        let by_selector = abi
            .functions()
            .map(|function| (function.selector().0, function.clone()))
            .collect();

        Self {
            contract_name,
            abi,
            by_topic,
            by_selector,
        }
    }

    /// The underlying `alloy` ABI.
    pub fn json_abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// All events, ordered by name.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.abi.events()
    }

    /// All functions, ordered by name.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.abi.functions()
    }

    /// Event by name (first overload).
    pub fn event(&self, name: &str) -> Result<&Event, AbiError> {
        self.abi
            .event(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| AbiError::UnknownEvent(name.to_string()))
    }

    /// Non-anonymous event whose topic is `topic`.
    pub fn event_by_topic(&self, topic: &Hash) -> Option<&Event> {
        self.by_topic.get(topic)
    }

    /// Function by name (first overload).
    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| AbiError::UnknownFunction(name.to_string()))
    }

    /// Function by selector.
    pub fn function_by_selector(&self, selector: [u8; 4]) -> Option<&Function> {
        self.by_selector.get(&selector)
    }

    /// Matches a raw log against the registered events.
    pub fn match_log(&self, log: &RawLog) -> Result<RawDecodedLog, DecodeMismatch> {
        let topic = log.signature_topic().ok_or(DecodeMismatch::NoSignature)?;
        let event = self
            .event_by_topic(topic)
            .ok_or(DecodeMismatch::UnknownSignature(*topic))?;
        event
            .decode_log(log)
            .map_err(|source| DecodeMismatch::Malformed {
                event: event.name.clone(),
                source,
            })
    }
}

/// Convenience: the decoded value of a parameter by name.
pub fn raw_param<'a>(log: &'a RawDecodedLog, name: &str) -> Option<&'a DynSolValue> {
    log.params.iter().find(|p| p.name == name).map(|p| &p.value)
}
