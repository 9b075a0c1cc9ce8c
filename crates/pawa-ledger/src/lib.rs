//! # PAWA Ledger
//!
//! A fungible token ledger with the familiar transfer / approve /
//! transferFrom / burn surface, deployed as the PAWA token.
//!
//! ## Overview
//!
//! - **Genesis**: the whole initial supply is credited to one owner
//! - **Transfers**: move tokens between accounts; the null address is never
//!   a valid destination
//! - **Allowances**: an owner authorizes a spender to move a bounded amount
//! - **Burns**: destroy tokens, permanently reducing total supply
//! - **Audit log**: every successful write appends one chained event
//!
//! Rejected operations leave state and the audit log untouched.
//!
//! ## Usage
//!
//! ```rust
//! use pawa_ledger::{Ledger, LedgerError};
//! use pawa_ledger::core::{whole, Address};
//!
//! let owner = Address::derive("owner");
//! let alice = Address::derive("alice");
//! let bob = Address::derive("bob");
//!
//! let mut ledger = Ledger::new(owner).unwrap();
//! assert_eq!(ledger.total_supply(), whole(21_000));
//!
//! ledger.transfer(owner, alice, whole(50)).unwrap();
//! ledger.approve(alice, bob, whole(20)).unwrap();
//! ledger.transfer_from(bob, alice, bob, whole(15)).unwrap();
//! ledger.burn(bob, whole(5)).unwrap();
//!
//! assert_eq!(ledger.balance_of(&bob), whole(10));
//! assert_eq!(ledger.total_supply(), whole(20_995));
//! assert!(matches!(
//!     ledger.transfer(alice, bob, whole(1_000)),
//!     Err(LedgerError::InsufficientBalance { .. })
//! ));
//! ```
//!
//! For concurrent callers, move the ledger into a [`LedgerService`] and
//! share [`LedgerHandle`]s.

pub mod config;
pub mod error;
pub mod invariants;
pub mod ledger;
pub mod service;
pub mod session;

pub use config::{LedgerConfig, ServiceConfig};
pub use error::{ConfigError, GenesisError, Result, ServiceError};
pub use invariants::{
    check_ledger_invariants, enforce_ledger_invariants, InvariantViolation, LedgerInvariant,
};
pub use ledger::Ledger;
pub use service::{LedgerHandle, LedgerService};
pub use session::Session;

// Re-export core types
pub use pawa_ledger_core::{Address, Amount, Event, LedgerError, LoggedEvent, TokenMetadata};

// Re-export sub-crates for advanced usage
pub use pawa_ledger_core as core;
pub use pawa_ledger_store as store;
