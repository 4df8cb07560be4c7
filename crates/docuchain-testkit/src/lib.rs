//! # Docuchain Testkit
//!
//! Testing utilities for the Docuchain registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: [`TestChain`], a stand-in host with named accounts and a
//!   monotonic block height
//! - **Generators**: Proptest strategies for property-based testing
//! - **Scenarios**: Scripted calls with the exact `(ok true)` / `(err uNNN)`
//!   responses each must produce
//!
//! ## Scenarios
//!
//! ```rust,no_run
//! use docuchain_testkit::{all_scenarios, memory_registry, run_scenario, TestChain};
//!
//! async fn replay() {
//!     for scenario in all_scenarios(&TestChain::new()) {
//!         let mut chain = TestChain::new();
//!         let mut registry = memory_registry();
//!         let outcomes = run_scenario(&mut registry, &mut chain, &scenario).await.unwrap();
//!         assert!(outcomes.iter().all(|o| o.passed()));
//!     }
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use docuchain_testkit::generators::StoreParams;
//!
//! proptest! {
//!     #[test]
//!     fn stored_records_verify(params: StoreParams) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod scenarios;

pub use fixtures::{memory_registry, sample_hash, Account, TestChain};
pub use generators::StoreParams;
pub use scenarios::{all_scenarios, run_scenario, Expected, Scenario, Step, StepOutcome};
