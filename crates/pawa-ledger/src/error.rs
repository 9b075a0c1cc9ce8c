//! Error types for the ledger crate.
//!
//! Operation-level rejections are [`LedgerError`] from the core crate; this
//! module adds the errors of construction, configuration and the service.

use pawa_ledger_core::LedgerError;
use thiserror::Error;

/// Configuration rejected before a ledger is created.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("token name must not be empty")]
    EmptyName,

    #[error("token symbol must not be empty")]
    EmptySymbol,

    #[error("decimals {0} out of range (max 77)")]
    DecimalsOutOfRange(u8),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that prevent genesis.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Genesis runs exactly once, against an empty store.
    #[error("store already holds ledger state")]
    StoreNotEmpty,
}

/// Errors returned through a [`LedgerHandle`](crate::service::LedgerHandle).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("ledger service has stopped")]
    Closed,
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
