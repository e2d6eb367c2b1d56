//! # Application Layer
//!
//! Finality wait and the receipt-to-events pipeline.

pub mod finality;

pub use finality::{await_finality, decode_and_await};
