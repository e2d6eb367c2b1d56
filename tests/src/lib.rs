//! # Volume Subscription Test Suite
//!
//! Unified test crate for cross-crate flows.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── plan_flows.rs          # create / read / list / terminate plans
//! │   ├── subscription_flows.rs  # subscribe / cancel / list / payments
//! │   ├── failure_modes.rs       # finality, reverts, missing events, transport
//! │   └── decoding.rs            # pipeline over in-memory receipts
//! └── benches/
//!     └── pipeline_benchmarks.rs # decode throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p vs-tests
//!
//! # By area
//! cargo test -p vs-tests integration::plan_flows::
//!
//! # Benchmarks
//! cargo bench -p vs-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
