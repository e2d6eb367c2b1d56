//! Per-event formatting.
//!
//! Scalar unsigned integers become exact [`U256`](shared_types::U256) decimals. Unsigned integer
//! arrays are deliberately left in their raw form (lists of decimal text):
//! existing consumers read them that way.

use alloy_dyn_abi::{DynSolType, DynSolValue};

use crate::domain::{ArgumentValue, DecodedEvent, EventArguments, RawDecodedLog, RawValue};

/// `uint[]`, `uint8[]`, `uint256[3]`, ...
pub fn is_uint_array_type(kind: &DynSolType) -> bool {
    match kind {
        DynSolType::Array(inner) | DynSolType::FixedArray(inner, _) => {
            matches!(**inner, DynSolType::Uint(_))
        }
        _ => false,
    }
}

/// `uint8` ... `uint256`.
pub fn is_uint_scalar_type(kind: &DynSolType) -> bool {
    matches!(kind, DynSolType::Uint(_))
}

/// Converts a raw decoded log into a [`DecodedEvent`].
pub fn format_raw_decoded_log(raw: RawDecodedLog) -> DecodedEvent {
    let mut arguments = EventArguments::new();

    for param in raw.params {
        let value = match (&param.kind, &param.value) {
            (kind, DynSolValue::Uint(number, _)) if is_uint_scalar_type(kind) => {
                ArgumentValue::Decimal(*number)
            }
            // uint arrays never match the scalar pattern and stay raw
            (_, other) => ArgumentValue::Raw(RawValue::from(other)),
        };
        arguments.insert(param.name, value);
    }

    DecodedEvent {
        name: raw.name,
        contract_address: raw.address,
        arguments,
    }
}
