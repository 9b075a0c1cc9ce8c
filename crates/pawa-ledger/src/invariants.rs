//! Ledger invariants with explicit validation and fail-fast enforcement.
//!
//! Every write operation either rejects without touching state or commits a
//! state that satisfies all of the properties below. A violation is a bug in
//! the ledger itself, never a user error, so [`enforce_ledger_invariants`]
//! panics instead of returning.
//!
//! # Invariants
//!
//! - **Conservation**: the sum of all balances equals the total supply
//! - **NullAddressEmpty**: the null address never holds a balance
//! - **SupplyNonIncreasing**: total supply never exceeds the genesis supply

use pawa_ledger_core::{Address, Amount};
use pawa_ledger_store::LedgerStore;
use thiserror::Error;

/// Properties that hold after every committed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerInvariant {
    Conservation,
    NullAddressEmpty,
    SupplyNonIncreasing,
}

impl LedgerInvariant {
    pub const ALL: [LedgerInvariant; 3] = [
        Self::Conservation,
        Self::NullAddressEmpty,
        Self::SupplyNonIncreasing,
    ];

    /// Human-readable statement of the invariant.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Conservation => "sum of all balances must equal total supply",
            Self::NullAddressEmpty => "the null address must never hold a balance",
            Self::SupplyNonIncreasing => "total supply must never exceed the genesis supply",
        }
    }
}

/// A violated invariant together with the values that broke it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ledger invariant violated [{invariant:?}]: {detail}")]
pub struct InvariantViolation {
    pub invariant: LedgerInvariant,
    pub detail: String,
}

/// Ledger figures the invariants are checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyState {
    pub total_supply: Amount,
    pub genesis_supply: Amount,
    /// `None` when the balances overflow 256 bits.
    pub balance_sum: Option<Amount>,
    pub null_balance: Amount,
}

impl SupplyState {
    /// Read the figures out of a store.
    pub fn capture<S: LedgerStore + ?Sized>(store: &S, genesis_supply: Amount) -> Self {
        let balance_sum = store
            .balances()
            .into_iter()
            .try_fold(Amount::ZERO, |acc, (_, v)| acc.checked_add(v));
        Self {
            total_supply: store.total_supply(),
            genesis_supply,
            balance_sum,
            null_balance: store.balance(&Address::NULL),
        }
    }

    pub fn check(&self, invariant: LedgerInvariant) -> Result<(), InvariantViolation> {
        let detail = match invariant {
            LedgerInvariant::Conservation => match self.balance_sum {
                Some(sum) if sum == self.total_supply => return Ok(()),
                Some(sum) => format!(
                    "balances sum to {sum}, total supply is {}",
                    self.total_supply
                ),
                None => "balances overflow 256 bits".to_string(),
            },
            LedgerInvariant::NullAddressEmpty => {
                if self.null_balance.is_zero() {
                    return Ok(());
                }
                format!("null address holds {}", self.null_balance)
            }
            LedgerInvariant::SupplyNonIncreasing => {
                if self.total_supply <= self.genesis_supply {
                    return Ok(());
                }
                format!(
                    "total supply {} exceeds genesis supply {}",
                    self.total_supply, self.genesis_supply
                )
            }
        };
        Err(InvariantViolation { invariant, detail })
    }

    /// Every violated invariant, empty when all hold.
    pub fn violations(&self) -> Vec<InvariantViolation> {
        LedgerInvariant::ALL
            .iter()
            .filter_map(|inv| self.check(*inv).err())
            .collect()
    }
}

/// Check all invariants against `store`, returning the first violation.
pub fn check_ledger_invariants<S: LedgerStore + ?Sized>(
    store: &S,
    genesis_supply: Amount,
) -> Result<(), InvariantViolation> {
    let violations = SupplyState::capture(store, genesis_supply).violations();
    match violations.into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Check all invariants and halt on any violation.
///
/// # Panics
///
/// Panics listing every violated invariant. Continuing past a violation
/// would commit corrupted balances.
pub fn enforce_ledger_invariants<S: LedgerStore + ?Sized>(store: &S, genesis_supply: Amount) {
    let violations = SupplyState::capture(store, genesis_supply).violations();
    if violations.is_empty() {
        return;
    }

    let mut msg = String::from("LEDGER BUG: invariants violated:\n");
    for v in &violations {
        msg.push_str(&format!(
            "  - [{:?}] {}: {}\n",
            v.invariant,
            v.invariant.description(),
            v.detail
        ));
    }
    panic!("{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawa_ledger_core::whole;
    use pawa_ledger_store::MemoryStore;

    fn healthy_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set_total_supply(whole(100));
        store.set_balance(Address::derive("a"), whole(60));
        store.set_balance(Address::derive("b"), whole(40));
        store
    }

    #[test]
    fn test_healthy_store_passes() {
        let store = healthy_store();
        assert!(check_ledger_invariants(&store, whole(100)).is_ok());
        enforce_ledger_invariants(&store, whole(100));
    }

    #[test]
    fn test_conservation_violation() {
        let mut store = healthy_store();
        store.set_balance(Address::derive("c"), whole(1));

        let err = check_ledger_invariants(&store, whole(100)).unwrap_err();
        assert_eq!(err.invariant, LedgerInvariant::Conservation);
        assert!(err.to_string().contains("Conservation"));
    }

    #[test]
    fn test_null_balance_violation() {
        let mut store = healthy_store();
        store.set_balance(Address::derive("a"), whole(59));
        store.set_balance(Address::NULL, whole(1));

        let err = check_ledger_invariants(&store, whole(100)).unwrap_err();
        assert_eq!(err.invariant, LedgerInvariant::NullAddressEmpty);
    }

    #[test]
    fn test_supply_above_genesis_violation() {
        let store = healthy_store();
        let violations = SupplyState::capture(&store, whole(99)).violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].invariant, LedgerInvariant::SupplyNonIncreasing);
    }

    #[test]
    fn test_balance_overflow_reported() {
        let mut store = MemoryStore::new();
        store.set_balance(Address::derive("a"), Amount::MAX);
        store.set_balance(Address::derive("b"), whole(1));
        store.set_total_supply(Amount::MAX);

        let err = check_ledger_invariants(&store, Amount::MAX).unwrap_err();
        assert_eq!(err.invariant, LedgerInvariant::Conservation);
        assert!(err.detail.contains("overflow"));
    }

    #[test]
    #[should_panic(expected = "LEDGER BUG")]
    fn test_enforce_panics_on_violation() {
        let mut store = healthy_store();
        store.set_total_supply(whole(101));
        enforce_ledger_invariants(&store, whole(200));
    }
}
