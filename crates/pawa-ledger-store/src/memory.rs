//! In-memory implementation of the LedgerStore trait.
//!
//! Ledger state lives for as long as the hosting process; there is no
//! persistence format.

use pawa_ledger_core::{Address, Amount, LoggedEvent};

use crate::map::AmountMap;
use crate::traits::LedgerStore;

/// In-memory ledger storage.
///
/// Each instance is independent, so tests can run any number of ledgers
/// side by side.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Balances indexed by account.
    balances: AmountMap<Address>,

    /// Allowances indexed by (owner, spender).
    allowances: AmountMap<(Address, Address)>,

    total_supply: Amount,

    /// Audit log, oldest first.
    events: Vec<LoggedEvent>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account)
    }

    fn set_balance(&mut self, account: Address, amount: Amount) {
        self.balances.set(account, amount);
    }

    fn balances(&self) -> Vec<(Address, Amount)> {
        self.balances.iter().map(|(a, v)| (*a, *v)).collect()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances.get(&(*owner, *spender))
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        self.allowances.set((owner, spender), amount);
    }

    fn allowances(&self) -> Vec<((Address, Address), Amount)> {
        self.allowances.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn set_total_supply(&mut self, amount: Amount) {
        self.total_supply = amount;
    }

    fn push_event(&mut self, entry: LoggedEvent) {
        self.events.push(entry);
    }

    fn events(&self) -> &[LoggedEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawa_ledger_core::{verify_event_log, whole, Event};
    use proptest::prelude::*;

    #[test]
    fn test_memory_store_defaults() {
        let store = MemoryStore::new();
        let a = Address::derive("a");
        assert_eq!(store.balance(&a), Amount::ZERO);
        assert_eq!(store.allowance(&a, &Address::derive("b")), Amount::ZERO);
        assert_eq!(store.total_supply(), Amount::ZERO);
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_append_event_chains() {
        let mut store = MemoryStore::new();
        let owner = Address::derive("owner");

        let first = store.append_event(Event::transfer(Address::NULL, owner, whole(10)));
        let second = store.append_event(Event::approval(owner, Address::derive("s"), whole(1)));

        assert_eq!(first.seq, 1);
        assert_eq!(first.prev, None);
        assert_eq!(second.seq, 2);
        assert_eq!(second.prev, Some(first.id));
        assert!(verify_event_log(store.events()).is_ok());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut store = MemoryStore::new();
        let owner = Address::derive("owner");
        let spender = Address::derive("spender");

        store.set_total_supply(whole(100));
        store.set_balance(owner, whole(100));
        store.set_allowance(owner, spender, whole(7));
        store.append_event(Event::transfer(Address::NULL, owner, whole(100)));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_supply, whole(100));
        assert_eq!(snapshot.balances.get(&owner), Some(&whole(100)));
        assert_eq!(snapshot.allowances.get(&(owner, spender)), Some(&whole(7)));
        assert_eq!(snapshot.event_count, 1);
        assert_eq!(snapshot.sum_balances(), Some(whole(100)));
    }

    #[test]
    fn test_zero_allowance_matches_absent() {
        let mut store = MemoryStore::new();
        let owner = Address::derive("owner");
        let spender = Address::derive("spender");
        let before = store.snapshot();

        store.set_allowance(owner, spender, whole(500));
        store.set_allowance(owner, spender, Amount::ZERO);

        assert_eq!(store.snapshot(), before);
    }

    proptest! {
        #[test]
        fn test_balances_listing_matches_writes(
            writes in prop::collection::vec((0u8..8, 0u64..1_000), 0..64)
        ) {
            let mut store = MemoryStore::new();
            let mut expected = std::collections::BTreeMap::new();

            for (label, amount) in writes {
                let account = Address::derive(&format!("acct-{label}"));
                store.set_balance(account, Amount::from(amount));
                if amount == 0 {
                    expected.remove(&account);
                } else {
                    expected.insert(account, Amount::from(amount));
                }
            }

            let listed: std::collections::BTreeMap<_, _> = store.balances().into_iter().collect();
            prop_assert_eq!(listed, expected);
        }
    }
}
