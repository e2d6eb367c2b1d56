//! # Algorithms
//!
//! - `format`: raw decoded log → [`DecodedEvent`](crate::domain::DecodedEvent)
//! - `receipt`: raw logs and receipts → decoded events, unmatched logs dropped

pub mod format;
pub mod receipt;

pub use format::{format_raw_decoded_log, is_uint_array_type, is_uint_scalar_type};
pub use receipt::{decode_logs, decode_receipt};
