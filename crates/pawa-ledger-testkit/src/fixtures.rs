//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use pawa_ledger::{Ledger, LedgerConfig};
use pawa_ledger_core::{parse_units, Address, Amount};

/// Deterministic signer addresses. Signer 0 is the deployer.
pub fn signers(count: usize) -> Vec<Address> {
    (0..count)
        .map(|i| Address::derive(&format!("signer-{i}")))
        .collect()
}

/// A deployed ledger with a fixed set of signers.
pub struct TestFixture {
    pub ledger: Ledger,
    pub signers: Vec<Address>,
}

impl TestFixture {
    /// The PAWA token deployed by signer 0, with four signers.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::pawa(), 4)
    }

    /// Deploy with custom parameters and `count` signers (at least one).
    pub fn with_config(config: LedgerConfig, count: usize) -> Self {
        let signers = signers(count.max(1));
        let ledger =
            Ledger::with_config(signers[0], config).expect("fixture config must be valid");
        Self { ledger, signers }
    }

    pub fn owner(&self) -> Address {
        self.signers[0]
    }

    pub fn addr1(&self) -> Address {
        self.signers[1]
    }

    pub fn addr2(&self) -> Address {
        self.signers[2]
    }

    pub fn signer(&self, index: usize) -> Address {
        self.signers[index]
    }

    /// Parse a decimal amount at the ledger's decimals.
    pub fn units(&self, value: &str) -> Amount {
        parse_units(value, self.ledger.decimals()).expect("fixture amount must parse")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
