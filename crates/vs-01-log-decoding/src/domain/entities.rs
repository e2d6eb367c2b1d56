//! # Domain Entities
//!
//! Two shapes of a decoded log:
//!
//! - [`RawDecodedLog`]: what ABI matching produces, as typed
//!   [`DynSolValue`]s next to their declared [`DynSolType`]s.
//! - [`DecodedEvent`]: what callers consume. Scalar unsigned integers are
//!   exact [`U256`]s; everything else is in its ledger-native text form
//!   ([`RawValue`]: integers as decimal text, addresses and byte strings as
//!   `0x` hex text).

use alloy_dyn_abi::{DynSolType, DynSolValue};
use serde::Serialize;
use shared_types::{address_to_text, to_hex_string, Address, U256};
use std::fmt;

// =============================================================================
// RAW DECODED FORM
// =============================================================================

/// A ledger-native decoded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Addresses, byte strings, integers and strings.
    Text(String),
    /// Booleans.
    Bool(bool),
    /// Fixed or dynamic arrays.
    List(Vec<RawValue>),
}

impl RawValue {
    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&DynSolValue> for RawValue {
    fn from(value: &DynSolValue) -> Self {
        match value {
            DynSolValue::Bool(flag) => RawValue::Bool(*flag),
            DynSolValue::Int(number, _) => RawValue::Text(number.to_string()),
            DynSolValue::Uint(number, _) => RawValue::Text(number.to_string()),
            DynSolValue::FixedBytes(word, size) => {
                RawValue::Text(to_hex_string(&word[..(*size).min(32)]))
            }
            DynSolValue::Address(address) => RawValue::Text(address_to_text(address)),
            DynSolValue::Function(function) => RawValue::Text(to_hex_string(function.as_slice())),
            DynSolValue::Bytes(bytes) => RawValue::Text(to_hex_string(bytes)),
            DynSolValue::String(text) => RawValue::Text(text.clone()),
            DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
                RawValue::List(items.iter().map(RawValue::from).collect())
            }
            // struct values only exist with alloy's eip712 feature
            #[allow(unreachable_patterns)]
            other => RawValue::Text(format!("{other:?}")),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(text) => write!(f, "{text}"),
            RawValue::Bool(flag) => write!(f, "{flag}"),
            RawValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// One decoded parameter with its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDecodedParam {
    /// Parameter name from the ABI.
    pub name: String,
    /// Declared type (e.g. `uint256`, `address`, `uint8[]`).
    pub kind: DynSolType,
    /// Decoded value. Indexed parameters that are not value types carry
    /// their topic hash as `bytes32`.
    pub value: DynSolValue,
}

/// A log matched against an event definition, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDecodedLog {
    /// Event name.
    pub name: String,
    /// Emitting contract.
    pub address: Address,
    /// Parameters in ABI declaration order.
    pub params: Vec<RawDecodedParam>,
}

// =============================================================================
// DECODED EVENT
// =============================================================================

/// Value of one event argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    /// Scalar unsigned integer, exact over the full 256-bit range.
    Decimal(#[serde(serialize_with = "serialize_decimal")] U256),
    /// Any other value, unchanged from the raw decoded form.
    Raw(RawValue),
}

fn serialize_decimal<S: serde::Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

impl ArgumentValue {
    /// The decimal value, if this argument is a scalar unsigned integer.
    pub fn as_decimal(&self) -> Option<&U256> {
        match self {
            ArgumentValue::Decimal(value) => Some(value),
            ArgumentValue::Raw(_) => None,
        }
    }

    /// The text value, if this argument is carried as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgumentValue::Raw(raw) => raw.as_text(),
            ArgumentValue::Decimal(_) => None,
        }
    }

    /// The raw value, if this argument was passed through unconverted.
    pub fn as_raw(&self) -> Option<&RawValue> {
        match self {
            ArgumentValue::Raw(raw) => Some(raw),
            ArgumentValue::Decimal(_) => None,
        }
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Decimal(value) => write!(f, "{value}"),
            ArgumentValue::Raw(raw) => write!(f, "{raw}"),
        }
    }
}

/// Ordered argument map. Keys follow ABI declaration order and are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventArguments {
    entries: Vec<(String, ArgumentValue)>,
}

impl EventArguments {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: ArgumentValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Looks up an argument by name.
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Argument names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The canonical decoded form of one emitted log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    /// Event name from the ABI.
    pub name: String,
    /// Emitting contract.
    pub contract_address: Address,
    /// Decoded arguments.
    pub arguments: EventArguments,
}

impl DecodedEvent {
    /// Shorthand for `self.arguments.get(name)`.
    pub fn argument(&self, name: &str) -> Option<&ArgumentValue> {
        self.arguments.get(name)
    }
}
