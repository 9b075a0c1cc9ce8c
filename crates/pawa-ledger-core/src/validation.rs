//! Audit log verification and replay.
//!
//! The event log is sufficient to reconstruct every balance: genesis is a
//! transfer from the null address, burns are transfers to it, and every
//! other movement is a transfer between two accounts.

use std::collections::BTreeMap;

use crate::canonical::compute_event_id;
use crate::error::AuditError;
use crate::event::{Event, LoggedEvent};
use crate::types::Address;
use crate::units::Amount;

/// Verify the hash chain of an audit log.
///
/// This checks:
/// - Sequence numbers start at 1 and are contiguous
/// - Each entry's `prev` is the id of the entry before it
/// - Each entry's `id` matches its canonical encoding
pub fn verify_event_log(events: &[LoggedEvent]) -> Result<(), AuditError> {
    let mut prev = None;
    for (index, entry) in events.iter().enumerate() {
        let expected = index as u64 + 1;
        if entry.seq != expected {
            return Err(AuditError::InvalidSequence {
                expected,
                got: entry.seq,
            });
        }
        if entry.prev != prev {
            return Err(AuditError::BrokenChain { seq: entry.seq });
        }
        if compute_event_id(entry.seq, entry.prev.as_ref(), &entry.event) != entry.id {
            return Err(AuditError::IdMismatch { seq: entry.seq });
        }
        prev = Some(entry.id);
    }
    Ok(())
}

/// Balances and supply reconstructed from transfer events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayedState {
    /// Non-zero balances only.
    pub balances: BTreeMap<Address, Amount>,
    pub total_supply: Amount,
}

/// Rebuild balances and total supply by replaying transfer events.
///
/// Approval events do not move tokens and are skipped.
pub fn replay_balances(events: &[LoggedEvent]) -> Result<ReplayedState, AuditError> {
    let mut state = ReplayedState::default();

    for entry in events {
        let seq = entry.seq;
        let (from, to, value) = match entry.event {
            Event::Transfer { from, to, value } => (from, to, value),
            Event::Approval { .. } => continue,
        };

        if from.is_null() {
            state.total_supply = state
                .total_supply
                .checked_add(value)
                .ok_or(AuditError::ReplayOverflow { seq })?;
        } else {
            let balance = state.balances.get(&from).copied().unwrap_or_default();
            let remaining = balance
                .checked_sub(value)
                .ok_or(AuditError::ReplayUnderflow { seq })?;
            set_or_remove(&mut state.balances, from, remaining);
        }

        if to.is_null() {
            state.total_supply = state
                .total_supply
                .checked_sub(value)
                .ok_or(AuditError::ReplayUnderflow { seq })?;
        } else {
            let balance = state.balances.get(&to).copied().unwrap_or_default();
            let credited = balance
                .checked_add(value)
                .ok_or(AuditError::ReplayOverflow { seq })?;
            set_or_remove(&mut state.balances, to, credited);
        }
    }

    Ok(state)
}

fn set_or_remove(balances: &mut BTreeMap<Address, Amount>, account: Address, amount: Amount) {
    if amount.is_zero() {
        balances.remove(&account);
    } else {
        balances.insert(account, amount);
    }
}
