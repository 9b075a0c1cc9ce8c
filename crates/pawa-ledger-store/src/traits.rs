//! LedgerStore trait: the abstract interface over ledger state.
//!
//! The ledger is storage-agnostic; it only needs the lazy-zero maps, the
//! supply counter and an append-only event log.

use std::collections::BTreeMap;

use pawa_ledger_core::{Address, Amount, Event, LoggedEvent};

/// A complete copy of ledger state, for comparing before and after a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub total_supply: Amount,
    /// Non-zero balances.
    pub balances: BTreeMap<Address, Amount>,
    /// Non-zero allowances, keyed by `(owner, spender)`.
    pub allowances: BTreeMap<(Address, Address), Amount>,
    /// Number of audit log entries.
    pub event_count: usize,
}

impl LedgerSnapshot {
    /// Sum of all balances, or `None` on overflow.
    pub fn sum_balances(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, v| acc.checked_add(*v))
    }
}

/// Storage for one ledger instance.
///
/// # Design Notes
///
/// - Reads of absent balances and allowances return zero.
/// - Writes of zero remove the entry.
/// - Writes are infallible; validation belongs to the caller.
pub trait LedgerStore {
    // ─────────────────────────────────────────────────────────────────────────
    // Balances
    // ─────────────────────────────────────────────────────────────────────────

    /// Balance of `account`, zero if absent.
    fn balance(&self, account: &Address) -> Amount;

    /// Write or re-write the balance of `account`.
    fn set_balance(&mut self, account: Address, amount: Amount);

    /// All non-zero balances in address order.
    fn balances(&self) -> Vec<(Address, Amount)>;

    // ─────────────────────────────────────────────────────────────────────────
    // Allowances
    // ─────────────────────────────────────────────────────────────────────────

    /// Remaining amount `spender` may move out of `owner`'s balance.
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Write or re-write an allowance.
    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount);

    /// All non-zero allowances as `((owner, spender), amount)`.
    fn allowances(&self) -> Vec<((Address, Address), Amount)>;

    // ─────────────────────────────────────────────────────────────────────────
    // Supply
    // ─────────────────────────────────────────────────────────────────────────

    fn total_supply(&self) -> Amount;

    fn set_total_supply(&mut self, amount: Amount);

    // ─────────────────────────────────────────────────────────────────────────
    // Audit log
    // ─────────────────────────────────────────────────────────────────────────

    /// Append an already-chained entry.
    fn push_event(&mut self, entry: LoggedEvent);

    /// All entries, oldest first.
    fn events(&self) -> &[LoggedEvent];

    /// Chain `event` after the current head of the log and append it.
    fn append_event(&mut self, event: Event) -> LoggedEvent {
        let entry = match self.events().last() {
            Some(head) => head.next(event),
            None => LoggedEvent::new(1, None, event),
        };
        self.push_event(entry);
        entry
    }

    /// Capture the full state.
    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            total_supply: self.total_supply(),
            balances: self.balances().into_iter().collect(),
            allowances: self.allowances().into_iter().collect(),
            event_count: self.events().len(),
        }
    }
}
