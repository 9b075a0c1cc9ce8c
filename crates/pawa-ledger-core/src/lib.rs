//! # PAWA Ledger Core
//!
//! Pure primitives for the PAWA token ledger: account addresses, 256-bit
//! amounts, token metadata, events and their canonical encoding.
//!
//! This crate contains no I/O and no mutable ledger state. It is pure
//! computation over the values the ledger is built from.
//!
//! ## Key Types
//!
//! - [`Address`] - 20-byte account identifier, with a reserved null address
//! - [`Amount`] - unsigned 256-bit integer with 18 implied decimals
//! - [`TokenMetadata`] - immutable name, symbol and decimals
//! - [`Event`] - `Transfer` / `Approval` notifications
//! - [`LoggedEvent`] - an event chained into the append-only audit log
//!
//! ## Canonicalization
//!
//! Logged events are identified by the Blake3 hash of their deterministic
//! CBOR encoding. See [`canonical`] module.

pub mod canonical;
pub mod error;
pub mod event;
pub mod metadata;
pub mod types;
pub mod units;
pub mod validation;

pub use canonical::{canonical_event_bytes, compute_event_id, decode_event, EVENT_ID_DOMAIN};
pub use error::{AuditError, CoreError, LedgerError, UnitsError};
pub use event::{Event, EventId, EventKind, LoggedEvent};
pub use metadata::{pawa_genesis_supply, TokenMetadata, PAWA_GENESIS_WHOLE_UNITS};
pub use types::Address;
pub use units::{format_units, parse_units, scale, whole, Amount, DECIMALS};
pub use validation::{replay_balances, verify_event_log, ReplayedState};
