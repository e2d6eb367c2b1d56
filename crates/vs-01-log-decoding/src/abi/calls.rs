//! Call data and return data codec over `alloy-dyn-abi`.

use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::Function;
use shared_types::Bytes;

use crate::domain::AbiError;

/// Argument and return value encoding for a function definition.
///
/// Call data produced here never carries the selector; it travels next to
/// the encoded arguments instead.
pub trait CallCodec {
    /// Encodes call arguments (without the selector).
    fn encode_input(&self, values: &[DynSolValue]) -> Result<Bytes, AbiError>;

    /// Decodes call arguments (without the selector).
    fn decode_input(&self, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError>;

    /// Encodes return data.
    fn encode_output(&self, values: &[DynSolValue]) -> Result<Bytes, AbiError>;

    /// Decodes return data.
    fn decode_output(&self, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError>;
}

fn check_arity(expected: usize, got: usize) -> Result<(), AbiError> {
    if expected == got {
        Ok(())
    } else {
        Err(AbiError::ArityMismatch { expected, got })
    }
}

impl CallCodec for Function {
    fn encode_input(&self, values: &[DynSolValue]) -> Result<Bytes, AbiError> {
        check_arity(self.inputs.len(), values.len())?;
        Ok(self.abi_encode_input_raw(values)?)
    }

    fn decode_input(&self, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
        Ok(self.abi_decode_input(data, true)?)
    }

    fn encode_output(&self, values: &[DynSolValue]) -> Result<Bytes, AbiError> {
        check_arity(self.outputs.len(), values.len())?;
        Ok(self.abi_encode_output(values)?)
    }

    fn decode_output(&self, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
        Ok(self.abi_decode_output(data, true)?)
    }
}
