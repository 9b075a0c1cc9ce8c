//! Caller-bound view of a ledger.

use pawa_ledger_core::{Address, Amount, LoggedEvent};
use pawa_ledger_store::LedgerStore;

use crate::error::Result;
use crate::ledger::Ledger;

/// Writes issued on behalf of one fixed caller.
///
/// ```
/// use pawa_ledger::{Ledger, core::{whole, Address}};
///
/// let owner = Address::derive("owner");
/// let alice = Address::derive("alice");
/// let mut ledger = Ledger::new(owner).unwrap();
///
/// ledger.as_caller(owner).transfer(alice, whole(5)).unwrap();
/// assert_eq!(ledger.balance_of(&alice), whole(5));
/// ```
pub struct Session<'a, S: LedgerStore> {
    ledger: &'a mut Ledger<S>,
    caller: Address,
}

impl<S: LedgerStore> Ledger<S> {
    /// Bind subsequent writes to `caller`.
    pub fn as_caller(&mut self, caller: Address) -> Session<'_, S> {
        Session {
            ledger: self,
            caller,
        }
    }
}

impl<'a, S: LedgerStore> Session<'a, S> {
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// The caller's own balance.
    pub fn balance(&self) -> Amount {
        self.ledger.balance_of(&self.caller)
    }

    /// What the caller may still draw from `owner`.
    pub fn allowance_from(&self, owner: &Address) -> Amount {
        self.ledger.allowance(owner, &self.caller)
    }

    pub fn transfer(&mut self, to: Address, amount: Amount) -> Result<LoggedEvent> {
        self.ledger.transfer(self.caller, to, amount)
    }

    pub fn approve(&mut self, spender: Address, amount: Amount) -> Result<LoggedEvent> {
        self.ledger.approve(self.caller, spender, amount)
    }

    pub fn transfer_from(
        &mut self,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<LoggedEvent> {
        self.ledger.transfer_from(self.caller, owner, to, amount)
    }

    pub fn burn(&mut self, amount: Amount) -> Result<LoggedEvent> {
        self.ledger.burn(self.caller, amount)
    }

    pub fn burn_from(&mut self, owner: Address, amount: Amount) -> Result<LoggedEvent> {
        self.ledger.burn_from(self.caller, owner, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawa_ledger_core::{whole, LedgerError};

    #[test]
    fn test_session_binds_caller() {
        let owner = Address::derive("owner");
        let spender = Address::derive("spender");
        let mut ledger = Ledger::new(owner).unwrap();

        {
            let mut session = ledger.as_caller(owner);
            assert_eq!(session.caller(), owner);
            session.approve(spender, whole(20)).unwrap();
        }

        let mut session = ledger.as_caller(spender);
        assert_eq!(session.allowance_from(&owner), whole(20));
        session.transfer_from(owner, spender, whole(15)).unwrap();
        session.burn(whole(5)).unwrap();
        assert_eq!(session.balance(), whole(10));
        assert_eq!(
            session.burn_from(owner, whole(6)),
            Err(LedgerError::InsufficientAllowance {
                allowance: whole(5),
                needed: whole(6)
            })
        );
        session.transfer(owner, whole(10)).unwrap();
        assert_eq!(session.balance(), Amount::ZERO);

        assert_eq!(ledger.total_supply(), whole(20_995));
    }
}
