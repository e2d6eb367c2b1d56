//! # Domain Module
//!
//! Plans, subscriptions and the rules for storing them on the contract.

pub mod entities;
pub mod errors;
pub mod metadata;

pub use entities::*;
pub use errors::*;
pub use metadata::*;
