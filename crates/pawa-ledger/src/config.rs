//! Ledger and service configuration.

use serde::{Deserialize, Serialize};

use pawa_ledger_core::units::MAX_DECIMALS;
use pawa_ledger_core::{pawa_genesis_supply, Amount, TokenMetadata};

use crate::error::ConfigError;

/// Parameters fixed at genesis.
///
/// The default is the PAWA deployment: name and symbol "PAWA", 18 decimals,
/// 21000 whole tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Immutable token metadata.
    pub metadata: TokenMetadata,
    /// Supply credited to the owner at genesis.
    pub initial_supply: Amount,
    /// Whether `approve` rejects the null address as spender.
    pub reject_null_spender: bool,
    /// Re-check the ledger invariants after every successful write.
    ///
    /// The conservation check sums every balance, so each write costs time
    /// linear in the number of holders while this is on.
    pub check_invariants: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            metadata: TokenMetadata::pawa(),
            initial_supply: pawa_genesis_supply(),
            reject_null_spender: true,
            check_invariants: true,
        }
    }
}

impl LedgerConfig {
    /// The PAWA deployment parameters.
    pub fn pawa() -> Self {
        Self::default()
    }

    /// Load and validate a config from JSON. Missing fields take PAWA defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metadata.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.metadata.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.metadata.decimals > MAX_DECIMALS {
            return Err(ConfigError::DecimalsOutOfRange(self.metadata.decimals));
        }
        Ok(())
    }

    pub fn with_initial_supply(mut self, supply: Amount) -> Self {
        self.initial_supply = supply;
        self
    }

    pub fn with_metadata(mut self, metadata: TokenMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn allow_null_spender(mut self) -> Self {
        self.reject_null_spender = false;
        self
    }
}

/// Configuration for [`LedgerService`](crate::service::LedgerService).
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum queued commands before senders wait.
    pub channel_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}
