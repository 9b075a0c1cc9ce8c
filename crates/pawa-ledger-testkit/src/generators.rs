//! Proptest generators for property-based testing.
//!
//! Operations refer to parties by index into a signer list. The index one
//! past the end stands for the null address, so generated sequences also
//! exercise the null-address rejections.

use proptest::prelude::*;

use pawa_ledger::Ledger;
use pawa_ledger_core::{whole, Address, Amount, LedgerError, LoggedEvent};
use pawa_ledger_store::LedgerStore;

/// Generate an arbitrary address, null included.
pub fn address() -> impl Strategy<Value = Address> {
    prop_oneof![
        1 => Just(Address::NULL),
        9 => any::<[u8; 20]>().prop_map(Address::from_bytes),
    ]
}

/// Generate an amount, biased toward values a PAWA holder could move.
pub fn amount() -> impl Strategy<Value = Amount> {
    prop_oneof![
        2 => Just(Amount::ZERO),
        6 => (1u64..=6_000).prop_map(whole),
        2 => any::<u64>().prop_map(Amount::from),
        1 => Just(Amount::MAX),
    ]
}

/// A party in a generated operation.
pub fn party(signers: usize) -> impl Strategy<Value = usize> {
    0..=signers
}

/// One ledger write, with parties given as signer indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOp {
    Transfer {
        caller: usize,
        to: usize,
        amount: Amount,
    },
    Approve {
        caller: usize,
        spender: usize,
        amount: Amount,
    },
    TransferFrom {
        caller: usize,
        owner: usize,
        to: usize,
        amount: Amount,
    },
    Burn {
        caller: usize,
        amount: Amount,
    },
    BurnFrom {
        caller: usize,
        owner: usize,
        amount: Amount,
    },
}

/// Generate a write over `signers` parties.
pub fn ledger_op(signers: usize) -> impl Strategy<Value = LedgerOp> {
    let p = move || party(signers);
    prop_oneof![
        4 => (p(), p(), amount())
            .prop_map(|(caller, to, amount)| LedgerOp::Transfer { caller, to, amount }),
        3 => (p(), p(), amount())
            .prop_map(|(caller, spender, amount)| LedgerOp::Approve { caller, spender, amount }),
        3 => (p(), p(), p(), amount()).prop_map(|(caller, owner, to, amount)| {
            LedgerOp::TransferFrom { caller, owner, to, amount }
        }),
        1 => (p(), amount()).prop_map(|(caller, amount)| LedgerOp::Burn { caller, amount }),
        1 => (p(), p(), amount())
            .prop_map(|(caller, owner, amount)| LedgerOp::BurnFrom { caller, owner, amount }),
    ]
}

/// Generate a sequence of writes.
pub fn ledger_ops(signers: usize, max_len: usize) -> impl Strategy<Value = Vec<LedgerOp>> {
    prop::collection::vec(ledger_op(signers), 0..=max_len)
}

fn resolve(signers: &[Address], index: usize) -> Address {
    signers.get(index).copied().unwrap_or(Address::NULL)
}

/// Apply `op` to `ledger`, mapping indices through `signers`.
pub fn apply_op<S: LedgerStore>(
    ledger: &mut Ledger<S>,
    signers: &[Address],
    op: &LedgerOp,
) -> Result<LoggedEvent, LedgerError> {
    let at = |i: usize| resolve(signers, i);
    match *op {
        LedgerOp::Transfer { caller, to, amount } => ledger.transfer(at(caller), at(to), amount),
        LedgerOp::Approve {
            caller,
            spender,
            amount,
        } => ledger.approve(at(caller), at(spender), amount),
        LedgerOp::TransferFrom {
            caller,
            owner,
            to,
            amount,
        } => ledger.transfer_from(at(caller), at(owner), at(to), amount),
        LedgerOp::Burn { caller, amount } => ledger.burn(at(caller), amount),
        LedgerOp::BurnFrom {
            caller,
            owner,
            amount,
        } => ledger.burn_from(at(caller), at(owner), amount),
    }
}
