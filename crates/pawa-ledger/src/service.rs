//! Serialized access to a ledger from concurrent tasks.
//!
//! The ledger is moved into a single task that owns it and processes
//! commands one at a time from a bounded channel. Every operation therefore
//! observes the full effect of all operations accepted before it, and no
//! two operations interleave.
//!
//! The task stops once every [`LedgerHandle`] is dropped, and its join
//! handle yields the ledger back.

use pawa_ledger_core::{Address, Amount, LoggedEvent};
use pawa_ledger_store::{LedgerSnapshot, LedgerStore};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::ledger::Ledger;

type Reply<T> = oneshot::Sender<T>;

/// A request to the ledger task.
#[derive(Debug)]
enum Command {
    Transfer {
        caller: Address,
        to: Address,
        amount: Amount,
        reply: Reply<Result<LoggedEvent>>,
    },
    Approve {
        caller: Address,
        spender: Address,
        amount: Amount,
        reply: Reply<Result<LoggedEvent>>,
    },
    TransferFrom {
        caller: Address,
        owner: Address,
        to: Address,
        amount: Amount,
        reply: Reply<Result<LoggedEvent>>,
    },
    Burn {
        caller: Address,
        amount: Amount,
        reply: Reply<Result<LoggedEvent>>,
    },
    BurnFrom {
        caller: Address,
        owner: Address,
        amount: Amount,
        reply: Reply<Result<LoggedEvent>>,
    },
    BalanceOf {
        account: Address,
        reply: Reply<Amount>,
    },
    Allowance {
        owner: Address,
        spender: Address,
        reply: Reply<Amount>,
    },
    TotalSupply {
        reply: Reply<Amount>,
    },
    Snapshot {
        reply: Reply<LedgerSnapshot>,
    },
    Events {
        reply: Reply<Vec<LoggedEvent>>,
    },
}

/// Spawns the task that owns a ledger.
pub struct LedgerService;

impl LedgerService {
    /// Move `ledger` into a new task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(
        ledger: Ledger<S>,
        config: ServiceConfig,
    ) -> (LedgerHandle, JoinHandle<Ledger<S>>)
    where
        S: LedgerStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let task = tokio::spawn(run(ledger, rx));
        (LedgerHandle { tx }, task)
    }
}

async fn run<S: LedgerStore>(
    mut ledger: Ledger<S>,
    mut rx: mpsc::Receiver<Command>,
) -> Ledger<S> {
    tracing::info!(symbol = %ledger.symbol(), "ledger service started");
    let mut handled = 0u64;

    while let Some(command) = rx.recv().await {
        handled += 1;
        // A dropped reply receiver only means the caller stopped waiting.
        match command {
            Command::Transfer {
                caller,
                to,
                amount,
                reply,
            } => {
                let _ = reply.send(ledger.transfer(caller, to, amount));
            }
            Command::Approve {
                caller,
                spender,
                amount,
                reply,
            } => {
                let _ = reply.send(ledger.approve(caller, spender, amount));
            }
            Command::TransferFrom {
                caller,
                owner,
                to,
                amount,
                reply,
            } => {
                let _ = reply.send(ledger.transfer_from(caller, owner, to, amount));
            }
            Command::Burn {
                caller,
                amount,
                reply,
            } => {
                let _ = reply.send(ledger.burn(caller, amount));
            }
            Command::BurnFrom {
                caller,
                owner,
                amount,
                reply,
            } => {
                let _ = reply.send(ledger.burn_from(caller, owner, amount));
            }
            Command::BalanceOf { account, reply } => {
                let _ = reply.send(ledger.balance_of(&account));
            }
            Command::Allowance {
                owner,
                spender,
                reply,
            } => {
                let _ = reply.send(ledger.allowance(&owner, &spender));
            }
            Command::TotalSupply { reply } => {
                let _ = reply.send(ledger.total_supply());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(ledger.snapshot());
            }
            Command::Events { reply } => {
                let _ = reply.send(ledger.events().to_vec());
            }
        }
    }

    tracing::info!(handled, "ledger service stopped");
    ledger
}

/// Cloneable handle for submitting operations to a [`LedgerService`].
#[derive(Debug, Clone)]
pub struct LedgerHandle {
    tx: mpsc::Sender<Command>,
}

impl LedgerHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> Command,
    ) -> std::result::Result<T, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| ServiceError::Closed)?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    async fn write(
        &self,
        make: impl FnOnce(Reply<Result<LoggedEvent>>) -> Command,
    ) -> std::result::Result<LoggedEvent, ServiceError> {
        Ok(self.request(make).await??)
    }

    pub async fn transfer(
        &self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> std::result::Result<LoggedEvent, ServiceError> {
        self.write(|reply| Command::Transfer {
            caller,
            to,
            amount,
            reply,
        })
        .await
    }

    pub async fn approve(
        &self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> std::result::Result<LoggedEvent, ServiceError> {
        self.write(|reply| Command::Approve {
            caller,
            spender,
            amount,
            reply,
        })
        .await
    }

    pub async fn transfer_from(
        &self,
        caller: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> std::result::Result<LoggedEvent, ServiceError> {
        self.write(|reply| Command::TransferFrom {
            caller,
            owner,
            to,
            amount,
            reply,
        })
        .await
    }

    pub async fn burn(
        &self,
        caller: Address,
        amount: Amount,
    ) -> std::result::Result<LoggedEvent, ServiceError> {
        self.write(|reply| Command::Burn {
            caller,
            amount,
            reply,
        })
        .await
    }

    pub async fn burn_from(
        &self,
        caller: Address,
        owner: Address,
        amount: Amount,
    ) -> std::result::Result<LoggedEvent, ServiceError> {
        self.write(|reply| Command::BurnFrom {
            caller,
            owner,
            amount,
            reply,
        })
        .await
    }

    pub async fn balance_of(&self, account: Address) -> std::result::Result<Amount, ServiceError> {
        self.request(|reply| Command::BalanceOf { account, reply }).await
    }

    pub async fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> std::result::Result<Amount, ServiceError> {
        self.request(|reply| Command::Allowance {
            owner,
            spender,
            reply,
        })
        .await
    }

    pub async fn total_supply(&self) -> std::result::Result<Amount, ServiceError> {
        self.request(|reply| Command::TotalSupply { reply }).await
    }

    pub async fn snapshot(&self) -> std::result::Result<LedgerSnapshot, ServiceError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn events(&self) -> std::result::Result<Vec<LoggedEvent>, ServiceError> {
        self.request(|reply| Command::Events { reply }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawa_ledger_core::{verify_event_log, whole, LedgerError};

    fn spawn_pawa() -> (LedgerHandle, JoinHandle<Ledger>, Address) {
        let owner = Address::derive("owner");
        let ledger = Ledger::new(owner).unwrap();
        let (handle, task) = LedgerService::spawn(ledger, ServiceConfig::default());
        (handle, task, owner)
    }

    #[tokio::test]
    async fn test_service_roundtrip() {
        let (handle, task, owner) = spawn_pawa();
        let alice = Address::derive("alice");

        handle.transfer(owner, alice, whole(10)).await.unwrap();
        handle.approve(alice, owner, whole(3)).await.unwrap();
        handle.transfer_from(owner, alice, owner, whole(2)).await.unwrap();
        handle.burn(alice, whole(1)).await.unwrap();

        assert_eq!(handle.balance_of(alice).await.unwrap(), whole(7));
        assert_eq!(handle.allowance(alice, owner).await.unwrap(), whole(1));
        assert_eq!(handle.total_supply().await.unwrap(), whole(20_999));

        drop(handle);
        let ledger = task.await.unwrap();
        assert_eq!(ledger.events().len(), 5);
    }

    #[tokio::test]
    async fn test_service_returns_ledger_errors() {
        let (handle, _task, owner) = spawn_pawa();
        let nobody = Address::derive("nobody");

        let err = handle.burn(nobody, whole(1)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Ledger(LedgerError::InsufficientBalance { .. })
        ));

        let err = handle.burn_from(nobody, owner, whole(1)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Ledger(LedgerError::InsufficientAllowance { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_transfers_serialize() {
        let (handle, task, owner) = spawn_pawa();

        let mut tasks = Vec::new();
        for i in 0..16 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                let to = Address::derive(&format!("holder-{i}"));
                handle.transfer(owner, to, whole(100)).await
            }));
        }
        for t in tasks {
            t.await.unwrap().unwrap();
        }

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.sum_balances(), Some(snapshot.total_supply));
        assert_eq!(snapshot.balances.get(&owner), Some(&whole(21_000 - 1_600)));

        let events = handle.events().await.unwrap();
        assert_eq!(events.len(), 17);
        assert!(verify_event_log(&events).is_ok());

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_service() {
        let (handle, task, _) = spawn_pawa();
        task.abort();
        let _ = task.await;

        assert!(matches!(
            handle.total_supply().await,
            Err(ServiceError::Closed)
        ));
    }
}
