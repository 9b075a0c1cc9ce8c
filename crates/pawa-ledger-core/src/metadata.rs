//! Immutable token metadata.

use serde::{Deserialize, Serialize};

use crate::units::{whole, Amount, DECIMALS};

/// Name of the PAWA token.
pub const PAWA_NAME: &str = "PAWA";

/// Ticker symbol of the PAWA token.
pub const PAWA_SYMBOL: &str = "PAWA";

/// Whole tokens created at genesis.
pub const PAWA_GENESIS_WHOLE_UNITS: u64 = 21_000;

/// The PAWA genesis supply in base units (21000 × 10^18).
pub fn pawa_genesis_supply() -> Amount {
    whole(PAWA_GENESIS_WHOLE_UNITS)
}

/// Name, symbol and decimals, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// The PAWA token metadata.
    pub fn pawa() -> Self {
        Self::new(PAWA_NAME, PAWA_SYMBOL, DECIMALS)
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::pawa()
    }
}
