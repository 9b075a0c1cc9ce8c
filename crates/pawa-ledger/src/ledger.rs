//! The Ledger: balances, allowances and supply for one token instance.
//!
//! Every write takes the caller explicitly. A write validates and computes
//! all of its new values before touching the store, so a rejected call
//! leaves state and the audit log exactly as they were.

use std::fmt;

use pawa_ledger_core::{Address, Amount, Event, LedgerError, LoggedEvent, TokenMetadata};
use pawa_ledger_store::{LedgerSnapshot, LedgerStore, MemoryStore};

use crate::config::LedgerConfig;
use crate::error::{GenesisError, Result};
use crate::invariants::enforce_ledger_invariants;

/// A single token ledger over a storage backend.
pub struct Ledger<S: LedgerStore = MemoryStore> {
    store: S,
    config: LedgerConfig,
    owner: Address,
}

impl Ledger<MemoryStore> {
    /// Deploy the PAWA token to `owner` in a fresh in-memory store.
    pub fn new(owner: Address) -> std::result::Result<Self, GenesisError> {
        Self::genesis(owner, LedgerConfig::pawa(), MemoryStore::new())
    }

    /// Deploy with custom parameters in a fresh in-memory store.
    pub fn with_config(
        owner: Address,
        config: LedgerConfig,
    ) -> std::result::Result<Self, GenesisError> {
        Self::genesis(owner, config, MemoryStore::new())
    }
}

impl<S: LedgerStore> Ledger<S> {
    /// Credit the initial supply to `owner` and log the mint.
    ///
    /// The store must be empty: genesis happens once per ledger.
    pub fn genesis(
        owner: Address,
        config: LedgerConfig,
        mut store: S,
    ) -> std::result::Result<Self, GenesisError> {
        config.validate()?;
        if owner.is_null() {
            return Err(LedgerError::InvalidDestination.into());
        }
        if !store.events().is_empty()
            || !store.total_supply().is_zero()
            || !store.balances().is_empty()
            || !store.allowances().is_empty()
        {
            return Err(GenesisError::StoreNotEmpty);
        }

        let supply = config.initial_supply;
        store.set_total_supply(supply);
        store.set_balance(owner, supply);
        let entry = store.append_event(Event::transfer(Address::NULL, owner, supply));

        tracing::info!(
            name = %config.metadata.name,
            symbol = %config.metadata.symbol,
            decimals = config.metadata.decimals,
            %owner,
            %supply,
            event = %entry.id,
            "ledger genesis"
        );

        let ledger = Self {
            store,
            config,
            owner,
        };
        ledger.check();
        Ok(ledger)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.config.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.config.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.config.metadata.decimals
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.config.metadata
    }

    pub fn total_supply(&self) -> Amount {
        self.store.total_supply()
    }

    /// Balance of `account`; zero for addresses never credited.
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.store.balance(account)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.store.allowance(owner, spender)
    }

    /// The account that received the genesis supply.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Supply minted at genesis.
    pub fn genesis_supply(&self) -> Amount {
        self.config.initial_supply
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Accounts with a non-zero balance, in address order.
    pub fn holders(&self) -> Vec<(Address, Amount)> {
        self.store.balances()
    }

    /// Audit log, oldest first. The first entry is the genesis mint.
    pub fn events(&self) -> &[LoggedEvent] {
        self.store.events()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.store.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Move `amount` from `caller` to `to`.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<LoggedEvent> {
        let result = self.try_transfer(caller, to, amount);
        self.finish("transfer", caller, result)
    }

    /// Set (replace, not add to) the amount `spender` may draw from `caller`.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<LoggedEvent> {
        let result = self.try_approve(caller, spender, amount);
        self.finish("approve", caller, result)
    }

    /// Move `amount` from `owner` to `to` on `owner`'s allowance to `caller`.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<LoggedEvent> {
        let result = self.try_transfer_from(caller, owner, to, amount);
        self.finish("transfer_from", caller, result)
    }

    /// Destroy `amount` of `caller`'s tokens, reducing total supply.
    pub fn burn(&mut self, caller: Address, amount: Amount) -> Result<LoggedEvent> {
        let result = self.try_burn(caller, amount);
        self.finish("burn", caller, result)
    }

    /// Destroy `amount` of `owner`'s tokens on `owner`'s allowance to `caller`.
    pub fn burn_from(
        &mut self,
        caller: Address,
        owner: Address,
        amount: Amount,
    ) -> Result<LoggedEvent> {
        let result = self.try_burn_from(caller, owner, amount);
        self.finish("burn_from", caller, result)
    }

    fn try_transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<LoggedEvent> {
        check_sender(&caller)?;
        check_destination(&to)?;
        let updates = self.plan_move(caller, to, amount)?;

        self.apply_balances(updates);
        Ok(self.store.append_event(Event::transfer(caller, to, amount)))
    }

    fn try_approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<LoggedEvent> {
        check_sender(&caller)?;
        if self.config.reject_null_spender && spender.is_null() {
            return Err(LedgerError::InvalidSpender);
        }

        self.store.set_allowance(caller, spender, amount);
        Ok(self.store.append_event(Event::approval(caller, spender, amount)))
    }

    fn try_transfer_from(
        &mut self,
        caller: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<LoggedEvent> {
        check_sender(&caller)?;
        check_sender(&owner)?;
        check_destination(&to)?;
        let remaining = self.plan_spend(owner, caller, amount)?;
        let updates = self.plan_move(owner, to, amount)?;

        self.store.set_allowance(owner, caller, remaining);
        self.apply_balances(updates);
        Ok(self.store.append_event(Event::transfer(owner, to, amount)))
    }

    fn try_burn(&mut self, caller: Address, amount: Amount) -> Result<LoggedEvent> {
        check_sender(&caller)?;
        let (balance, supply) = self.plan_burn(caller, amount)?;

        self.store.set_balance(caller, balance);
        self.store.set_total_supply(supply);
        Ok(self.store.append_event(Event::transfer(caller, Address::NULL, amount)))
    }

    fn try_burn_from(
        &mut self,
        caller: Address,
        owner: Address,
        amount: Amount,
    ) -> Result<LoggedEvent> {
        check_sender(&caller)?;
        check_sender(&owner)?;
        let remaining = self.plan_spend(owner, caller, amount)?;
        let (balance, supply) = self.plan_burn(owner, amount)?;

        self.store.set_allowance(owner, caller, remaining);
        self.store.set_balance(owner, balance);
        self.store.set_total_supply(supply);
        Ok(self.store.append_event(Event::transfer(owner, Address::NULL, amount)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Planning
    // ─────────────────────────────────────────────────────────────────────────

    /// New balances after moving `amount` from `from` to `to`.
    ///
    /// A self-transfer still requires sufficient balance but changes nothing.
    fn plan_move(
        &self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<(Address, Amount)>> {
        let balance = self.store.balance(&from);
        let debited = balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                balance,
                needed: amount,
            })?;
        if from == to {
            return Ok(Vec::new());
        }
        let credited = self
            .store
            .balance(&to)
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(vec![(from, debited), (to, credited)])
    }

    /// Allowance left after `spender` draws `amount` from `owner`.
    fn plan_spend(&self, owner: Address, spender: Address, amount: Amount) -> Result<Amount> {
        let allowance = self.store.allowance(&owner, &spender);
        allowance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                allowance,
                needed: amount,
            })
    }

    /// Balance and total supply after burning `amount` from `account`.
    fn plan_burn(&self, account: Address, amount: Amount) -> Result<(Amount, Amount)> {
        let balance = self.store.balance(&account);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                balance,
                needed: amount,
            })?;
        let supply = self
            .store
            .total_supply()
            .checked_sub(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok((remaining, supply))
    }

    fn apply_balances(&mut self, updates: Vec<(Address, Amount)>) {
        for (account, amount) in updates {
            self.store.set_balance(account, amount);
        }
    }

    fn finish(
        &self,
        op: &'static str,
        caller: Address,
        result: Result<LoggedEvent>,
    ) -> Result<LoggedEvent> {
        match &result {
            Ok(entry) => {
                tracing::debug!(
                    op,
                    %caller,
                    seq = entry.seq,
                    event = %entry.id,
                    value = %entry.event.value(),
                    "committed"
                );
                self.check();
            }
            Err(e) => tracing::debug!(op, %caller, error = %e, "rejected"),
        }
        result
    }

    fn check(&self) {
        if self.config.check_invariants {
            enforce_ledger_invariants(&self.store, self.config.initial_supply);
        }
    }
}

impl<S: LedgerStore> fmt::Debug for Ledger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("symbol", &self.config.metadata.symbol)
            .field("owner", &self.owner)
            .field("total_supply", &self.store.total_supply())
            .field("events", &self.store.events().len())
            .finish()
    }
}

fn check_sender(account: &Address) -> Result<()> {
    if account.is_null() {
        return Err(LedgerError::InvalidSender);
    }
    Ok(())
}

fn check_destination(account: &Address) -> Result<()> {
    if account.is_null() {
        return Err(LedgerError::InvalidDestination);
    }
    Ok(())
}
