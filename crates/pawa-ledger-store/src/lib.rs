//! # PAWA Ledger Store
//!
//! Storage abstraction for the PAWA ledger. The ledger's state machine is
//! written against the [`LedgerStore`] trait; this crate provides the
//! in-memory implementation used by every ledger instance.
//!
//! ## Key Types
//!
//! - [`AmountMap`] - key-value container returning zero for absent keys
//! - [`LedgerStore`] - balances, allowances, supply and the audit log
//! - [`MemoryStore`] - in-memory implementation
//! - [`LedgerSnapshot`] - a full, comparable copy of ledger state
//!
//! ## Design Notes
//!
//! - **Lazy zero**: reading an absent balance or allowance yields zero, and
//!   writing zero removes the entry, so "absent" and "zero" are
//!   indistinguishable to callers.
//! - **Infallible writes**: store writes cannot fail. The ledger validates
//!   every precondition before its first write, which is what makes each
//!   operation all-or-nothing.
//! - **Chained log**: [`LedgerStore::append_event`] links each event to the
//!   previous entry's id.

pub mod map;
pub mod memory;
pub mod traits;

pub use map::AmountMap;
pub use memory::MemoryStore;
pub use traits::{LedgerSnapshot, LedgerStore};
