//! # PAWA Ledger Testkit
//!
//! Testing utilities for the PAWA ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Scenarios**: named call sequences with expected outcomes and final
//!   balances, exportable as JSON vectors
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: a deployed ledger with deterministic signers
//!
//! ## Scenarios
//!
//! ```rust
//! use pawa_ledger_testkit::scenarios::{all_scenarios, run_scenario};
//!
//! for scenario in all_scenarios() {
//!     run_scenario(&scenario).unwrap();
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pawa_ledger_testkit::fixtures::TestFixture;
//! use pawa_ledger_testkit::generators::{apply_op, ledger_ops};
//!
//! proptest! {
//!     #[test]
//!     fn supply_never_grows(ops in ledger_ops(3, 32)) {
//!         let mut f = TestFixture::with_config(Default::default(), 3);
//!         for op in &ops {
//!             let _ = apply_op(&mut f.ledger, &f.signers, op);
//!         }
//!         prop_assert!(f.ledger.total_supply() <= f.ledger.genesis_supply());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use pawa_ledger_testkit::fixtures::TestFixture;
//!
//! let mut fixture = TestFixture::new();
//! let (owner, addr1) = (fixture.owner(), fixture.addr1());
//! let amount = fixture.units("1000");
//! fixture.ledger.transfer(owner, addr1, amount).unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod scenarios;

pub use fixtures::{signers, TestFixture};
pub use generators::{apply_op, ledger_op, ledger_ops, LedgerOp};
pub use scenarios::{all_scenarios, run_scenario, Scenario};
