//! Event log codec over `alloy-dyn-abi`.
//!
//! Indexed value types (`bool`, `intN`, `uintN`, `bytesN`, `address`,
//! `function`) occupy their topic word directly. Every other indexed type,
//! static arrays and tuples included, is stored as the keccak-256 of its
//! packed encoding, so decoding can only recover the hash.

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::{Event, EventParam};
use shared_types::{Address, Hash, RawLog};

use super::keccak256;
use crate::domain::{AbiError, RawDecodedLog, RawDecodedParam};

/// Log encoding and decoding for an event definition.
pub trait LogCodec {
    /// Keccak-256 of the canonical signature (topic 0 of every emitted log).
    fn topic(&self) -> Hash;

    /// Decodes a log emitted by this event. Topic 0 is skipped for
    /// non-anonymous events and not checked here.
    fn decode_log(&self, log: &RawLog) -> Result<RawDecodedLog, AbiError>;

    /// Encodes a log for this event. Used by ledgers that emit events.
    fn encode_log(&self, address: Address, values: &[DynSolValue]) -> Result<RawLog, AbiError>;
}

/// Whether an indexed parameter of this type is stored in its topic as-is.
pub fn is_word_type(kind: &DynSolType) -> bool {
    matches!(
        kind,
        DynSolType::Bool
            | DynSolType::Int(_)
            | DynSolType::Uint(_)
            | DynSolType::FixedBytes(_)
            | DynSolType::Address
            | DynSolType::Function
    )
}

fn resolve(param: &EventParam) -> Result<DynSolType, AbiError> {
    param
        .resolve()
        .map_err(|e| AbiError::UnknownType(format!("{}: {e}", param.ty)))
}

fn topic_of(value: &DynSolValue) -> Hash {
    value
        .as_word()
        .unwrap_or_else(|| keccak256(value.abi_encode_packed()))
}

impl LogCodec for Event {
    fn topic(&self) -> Hash {
        self.selector()
    }

    fn decode_log(&self, log: &RawLog) -> Result<RawDecodedLog, AbiError> {
        let skip = usize::from(!self.anonymous);
        let topics = log.topics.get(skip..).unwrap_or_default();
        let indexed_count = self.inputs.iter().filter(|p| p.indexed).count();
        if topics.len() != indexed_count {
            return Err(AbiError::InvalidData(format!(
                "expected {} indexed topics, got {}",
                indexed_count,
                topics.len()
            )));
        }

        let body_types = self
            .inputs
            .iter()
            .filter(|p| !p.indexed)
            .map(resolve)
            .collect::<Result<Vec<_>, _>>()?;
        let body = match DynSolType::Tuple(body_types).abi_decode_params(&log.data)? {
            DynSolValue::Tuple(values) => values,
            other => vec![other],
        };

        let mut body = body.into_iter();
        let mut topics = topics.iter();
        let mut params = Vec::with_capacity(self.inputs.len());

        for input in &self.inputs {
            let kind = resolve(input)?;
            let value = if input.indexed {
                let topic = topics
                    .next()
                    .ok_or_else(|| AbiError::InvalidData("missing topic".into()))?;
                if is_word_type(&kind) {
                    kind.abi_decode(topic.as_slice())?
                } else {
                    DynSolValue::FixedBytes(*topic, 32)
                }
            } else {
                body.next()
                    .ok_or_else(|| AbiError::InvalidData("missing data value".into()))?
            };
            params.push(RawDecodedParam {
                name: input.name.clone(),
                kind,
                value,
            });
        }

        Ok(RawDecodedLog {
            name: self.name.clone(),
            address: log.address,
            params,
        })
    }

    fn encode_log(&self, address: Address, values: &[DynSolValue]) -> Result<RawLog, AbiError> {
        if values.len() != self.inputs.len() {
            return Err(AbiError::ArityMismatch {
                expected: self.inputs.len(),
                got: values.len(),
            });
        }

        let mut topics = Vec::with_capacity(self.inputs.len() + 1);
        if !self.anonymous {
            topics.push(self.selector());
        }
        let mut body = Vec::new();

        for (input, value) in self.inputs.iter().zip(values) {
            if !resolve(input)?.matches(value) {
                return Err(AbiError::TypeMismatch(input.ty.clone()));
            }
            if input.indexed {
                topics.push(topic_of(value));
            } else {
                body.push(value.clone());
            }
        }

        let data = DynSolValue::Tuple(body).abi_encode_params();
        Ok(RawLog::new(address, topics, data))
    }
}
