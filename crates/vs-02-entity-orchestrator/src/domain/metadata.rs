//! # Metadata and Identifier Rules
//!
//! Conversions between caller-facing values and what the contract stores:
//! free-form JSON metadata as text, plan identifiers as `bytes32`, intervals
//! in seconds.

use serde_json::{Map, Value};
use shared_types::{U256, SECONDS_IN_DAY};

use super::errors::OrchestratorError;

/// Metadata key for a plan's display name.
pub const NAME_KEY: &str = "name";
/// Metadata key for a plan's description.
pub const DESCRIPTION_KEY: &str = "description";
/// Metadata key for a plan's image URL.
pub const IMAGE_URL_KEY: &str = "imageUrl";

/// Size of an on-chain plan identifier.
pub const IDENTIFIER_LEN: usize = 32;

/// Free-form metadata object.
pub type Metadata = Map<String, Value>;

/// Serializes metadata for storage. Keys keep their insertion order. No
/// object, or an empty one, becomes the empty string rather than `{}`.
pub fn encode_metadata(metadata: Option<&Metadata>) -> Result<String, OrchestratorError> {
    match metadata {
        Some(object) if !object.is_empty() => Ok(serde_json::to_string(object)?),
        _ => Ok(String::new()),
    }
}

/// Overwrites the display keys of `metadata` when a non-empty name is
/// supplied. An empty name counts as no name.
///
/// A missing description or image URL is written as JSON `null`.
pub fn merge_display_fields(
    mut metadata: Metadata,
    name: Option<&str>,
    description: Option<&str>,
    image_url: Option<&str>,
) -> Metadata {
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        metadata.insert(NAME_KEY.to_string(), Value::from(name));
        metadata.insert(DESCRIPTION_KEY.to_string(), optional_text(description));
        metadata.insert(IMAGE_URL_KEY.to_string(), optional_text(image_url));
    }
    metadata
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}

/// Display fields read back from stored plan data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayFields {
    /// `name`, when the data is a JSON object.
    pub name: Option<String>,
    /// `description`, when the data is a JSON object.
    pub description: Option<String>,
    /// `imageUrl`, when the data is a JSON object.
    pub image_url: Option<String>,
}

/// Parses stored plan data.
///
/// A JSON object yields each display key as text, or `""` when the key is
/// absent, null or not a string. Empty, invalid or non-object data yields
/// no display fields at all.
pub fn parse_display_fields(data: &str) -> DisplayFields {
    let object = match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(object)) => object,
        _ => return DisplayFields::default(),
    };

    let text = |key: &str| {
        Some(
            object
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        )
    };

    DisplayFields {
        name: text(NAME_KEY),
        description: text(DESCRIPTION_KEY),
        image_url: text(IMAGE_URL_KEY),
    }
}

/// Encodes an identifier as right-padded `bytes32`.
pub fn identifier_to_bytes32(identifier: &str) -> Result<[u8; IDENTIFIER_LEN], OrchestratorError> {
    let bytes = identifier.as_bytes();
    if bytes.len() > IDENTIFIER_LEN {
        return Err(OrchestratorError::InvalidArgument(format!(
            "identifier is {} bytes, at most {} fit in bytes32",
            bytes.len(),
            IDENTIFIER_LEN
        )));
    }
    let mut word = [0u8; IDENTIFIER_LEN];
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(word)
}

/// Decodes a stored `bytes32` identifier: trailing NULs stripped, invalid
/// UTF-8 replaced.
pub fn bytes32_to_identifier(word: &[u8]) -> String {
    let end = word.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&word[..end]).into_owned()
}

/// Days to on-chain seconds.
pub fn days_to_seconds(days: u64) -> U256 {
    U256::from(days) * U256::from(SECONDS_IN_DAY)
}

/// On-chain seconds to whole days.
pub fn seconds_to_days(seconds: U256) -> u64 {
    saturating_u64(seconds / U256::from(SECONDS_IN_DAY))
}

/// Narrows a ledger integer, saturating at `u64::MAX`.
pub fn saturating_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
