//! # Domain Module
//!
//! Decoded event types and error types for the log decoding pipeline.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
