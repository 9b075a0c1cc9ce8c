//! Named scenario vectors for the PAWA token.
//!
//! A scenario is a sequence of calls against a fresh PAWA deployment, each
//! with its expected outcome, followed by the balances and supply that must
//! result. Scenarios serialize to JSON so other implementations can replay
//! the same vectors.

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

use pawa_ledger::{Ledger, LedgerConfig};
use pawa_ledger_core::{parse_units, Address, Amount, Event, LedgerError, LoggedEvent, DECIMALS};

use crate::fixtures::signers;

/// Number of signers every scenario may refer to.
pub const SCENARIO_SIGNERS: usize = 3;

/// A participant: one of the deterministic signers, or the null address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Null,
    Signer(usize),
}

/// The deployer.
pub const OWNER: Party = Party::Signer(0);
pub const ADDR1: Party = Party::Signer(1);
pub const ADDR2: Party = Party::Signer(2);

impl Party {
    fn resolve(&self, pool: &[Address]) -> Result<Address> {
        match self {
            Party::Null => Ok(Address::NULL),
            Party::Signer(i) => pool
                .get(*i)
                .copied()
                .with_context(|| format!("unknown signer {i}")),
        }
    }
}

/// A write call. Amounts are decimal strings in whole tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum Call {
    Transfer {
        caller: Party,
        to: Party,
        amount: String,
    },
    Approve {
        caller: Party,
        spender: Party,
        amount: String,
    },
    TransferFrom {
        caller: Party,
        owner: Party,
        to: Party,
        amount: String,
    },
    Burn {
        caller: Party,
        amount: String,
    },
    BurnFrom {
        caller: Party,
        owner: Party,
        amount: String,
    },
}

/// Expected outcome of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Succeeds and emits a transfer event.
    Transfer,
    /// Succeeds and emits an approval event.
    Approval,
    InvalidSender,
    InvalidDestination,
    InvalidSpender,
    InsufficientBalance,
    InsufficientAllowance,
}

impl Outcome {
    fn matches(&self, result: &std::result::Result<LoggedEvent, LedgerError>) -> bool {
        matches!(
            (self, result),
            (Outcome::Transfer, Ok(LoggedEvent { event: Event::Transfer { .. }, .. }))
                | (Outcome::Approval, Ok(LoggedEvent { event: Event::Approval { .. }, .. }))
                | (Outcome::InvalidSender, Err(LedgerError::InvalidSender))
                | (Outcome::InvalidDestination, Err(LedgerError::InvalidDestination))
                | (Outcome::InvalidSpender, Err(LedgerError::InvalidSpender))
                | (Outcome::InsufficientBalance, Err(LedgerError::InsufficientBalance { .. }))
                | (Outcome::InsufficientAllowance, Err(LedgerError::InsufficientAllowance { .. }))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub call: Call,
    pub expect: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<Step>,
    /// Expected final balances of the listed parties.
    pub balances: Vec<(Party, String)>,
    /// Expected final allowances as `(owner, spender, amount)`.
    #[serde(default)]
    pub allowances: Vec<(Party, Party, String)>,
    pub total_supply: String,
}

fn units(value: &str) -> Result<Amount> {
    parse_units(value, DECIMALS).with_context(|| format!("bad amount {value:?}"))
}

fn step(call: Call, expect: Outcome) -> Step {
    Step { call, expect }
}

fn transfer(caller: Party, to: Party, amount: &str) -> Call {
    Call::Transfer {
        caller,
        to,
        amount: amount.into(),
    }
}

fn approve(caller: Party, spender: Party, amount: &str) -> Call {
    Call::Approve {
        caller,
        spender,
        amount: amount.into(),
    }
}

fn transfer_from(caller: Party, owner: Party, to: Party, amount: &str) -> Call {
    Call::TransferFrom {
        caller,
        owner,
        to,
        amount: amount.into(),
    }
}

fn burn(caller: Party, amount: &str) -> Call {
    Call::Burn {
        caller,
        amount: amount.into(),
    }
}

fn burn_from(caller: Party, owner: Party, amount: &str) -> Call {
    Call::BurnFrom {
        caller,
        owner,
        amount: amount.into(),
    }
}

/// All built-in scenarios.
pub fn all_scenarios() -> Vec<Scenario> {
    use Outcome::*;

    vec![
        Scenario {
            name: "burn own tokens".into(),
            steps: vec![step(burn(OWNER, "1000"), Transfer)],
            balances: vec![(OWNER, "20000".into())],
            allowances: vec![],
            total_supply: "20000".into(),
        },
        Scenario {
            name: "burn more than held".into(),
            steps: vec![step(burn(OWNER, "21000.000000000000000001"), InsufficientBalance)],
            balances: vec![(OWNER, "21000".into())],
            allowances: vec![],
            total_supply: "21000".into(),
        },
        Scenario {
            name: "transfer between accounts".into(),
            steps: vec![step(transfer(OWNER, ADDR1, "1000"), Transfer)],
            balances: vec![(OWNER, "20000".into()), (ADDR1, "1000".into())],
            allowances: vec![],
            total_supply: "21000".into(),
        },
        Scenario {
            name: "transferFrom within allowance".into(),
            steps: vec![
                step(approve(OWNER, ADDR1, "300"), Approval),
                step(transfer_from(ADDR1, OWNER, ADDR1, "300"), Transfer),
            ],
            balances: vec![(OWNER, "20700".into()), (ADDR1, "300".into())],
            allowances: vec![(OWNER, ADDR1, "0".into())],
            total_supply: "21000".into(),
        },
        Scenario {
            name: "transferFrom over allowance".into(),
            steps: vec![
                step(approve(OWNER, ADDR1, "500"), Approval),
                step(
                    transfer_from(ADDR1, OWNER, ADDR1, "500.000000000000000001"),
                    InsufficientAllowance,
                ),
            ],
            balances: vec![(OWNER, "21000".into()), (ADDR1, "0".into())],
            allowances: vec![(OWNER, ADDR1, "500".into())],
            total_supply: "21000".into(),
        },
        Scenario {
            name: "approve zero resets".into(),
            steps: vec![
                step(approve(OWNER, ADDR1, "500"), Approval),
                step(approve(OWNER, ADDR1, "0"), Approval),
            ],
            balances: vec![(OWNER, "21000".into())],
            allowances: vec![(OWNER, ADDR1, "0".into())],
            total_supply: "21000".into(),
        },
        Scenario {
            name: "zero transfer and zero burn".into(),
            steps: vec![
                step(transfer(OWNER, ADDR1, "0"), Transfer),
                step(burn(OWNER, "0"), Transfer),
            ],
            balances: vec![(OWNER, "21000".into()), (ADDR1, "0".into())],
            allowances: vec![],
            total_supply: "21000".into(),
        },
        Scenario {
            name: "null address rejections".into(),
            steps: vec![
                step(transfer(OWNER, Party::Null, "1000"), InvalidDestination),
                step(approve(OWNER, Party::Null, "1"), InvalidSpender),
                step(transfer(Party::Null, ADDR1, "0"), InvalidSender),
                step(transfer_from(ADDR1, OWNER, Party::Null, "1"), InvalidDestination),
            ],
            balances: vec![(OWNER, "21000".into())],
            allowances: vec![],
            total_supply: "21000".into(),
        },
        Scenario {
            name: "delegated burn".into(),
            steps: vec![
                step(transfer(OWNER, ADDR1, "100"), Transfer),
                step(approve(ADDR1, ADDR2, "40"), Approval),
                step(burn_from(ADDR2, ADDR1, "25"), Transfer),
                step(burn_from(ADDR2, ADDR1, "20"), InsufficientAllowance),
            ],
            balances: vec![
                (OWNER, "20900".into()),
                (ADDR1, "75".into()),
                (ADDR2, "0".into()),
            ],
            allowances: vec![(ADDR1, ADDR2, "15".into())],
            total_supply: "20975".into(),
        },
        Scenario {
            name: "allowance checked before balance".into(),
            steps: vec![
                step(approve(ADDR1, ADDR2, "10"), Approval),
                step(transfer_from(ADDR2, ADDR1, ADDR2, "11"), InsufficientAllowance),
                step(transfer_from(ADDR2, ADDR1, ADDR2, "10"), InsufficientBalance),
            ],
            balances: vec![(ADDR1, "0".into()), (ADDR2, "0".into())],
            allowances: vec![(ADDR1, ADDR2, "10".into())],
            total_supply: "21000".into(),
        },
    ]
}

/// Run `scenario` against a fresh PAWA deployment and return the ledger.
pub fn run_scenario(scenario: &Scenario) -> Result<Ledger> {
    let pool = signers(SCENARIO_SIGNERS);
    let mut ledger = Ledger::with_config(pool[0], LedgerConfig::pawa())?;

    for (i, s) in scenario.steps.iter().enumerate() {
        let result = match &s.call {
            Call::Transfer { caller, to, amount } => {
                ledger.transfer(caller.resolve(&pool)?, to.resolve(&pool)?, units(amount)?)
            }
            Call::Approve {
                caller,
                spender,
                amount,
            } => ledger.approve(caller.resolve(&pool)?, spender.resolve(&pool)?, units(amount)?),
            Call::TransferFrom {
                caller,
                owner,
                to,
                amount,
            } => ledger.transfer_from(
                caller.resolve(&pool)?,
                owner.resolve(&pool)?,
                to.resolve(&pool)?,
                units(amount)?,
            ),
            Call::Burn { caller, amount } => ledger.burn(caller.resolve(&pool)?, units(amount)?),
            Call::BurnFrom {
                caller,
                owner,
                amount,
            } => ledger.burn_from(caller.resolve(&pool)?, owner.resolve(&pool)?, units(amount)?),
        };
        if !s.expect.matches(&result) {
            bail!(
                "{}: step {i} ({:?}) expected {:?}, got {:?}",
                scenario.name,
                s.call,
                s.expect,
                result
            );
        }
    }

    for (party, expected) in &scenario.balances {
        let actual = ledger.balance_of(&party.resolve(&pool)?);
        ensure!(
            actual == units(expected)?,
            "{}: balance of {party:?} is {actual}, expected {expected}",
            scenario.name
        );
    }
    for (owner, spender, expected) in &scenario.allowances {
        let actual = ledger.allowance(&owner.resolve(&pool)?, &spender.resolve(&pool)?);
        ensure!(
            actual == units(expected)?,
            "{}: allowance {owner:?} -> {spender:?} is {actual}, expected {expected}",
            scenario.name
        );
    }
    let supply = ledger.total_supply();
    ensure!(
        supply == units(&scenario.total_supply)?,
        "{}: total supply is {supply}, expected {}",
        scenario.name,
        scenario.total_supply
    );

    Ok(ledger)
}

pub fn scenarios_to_json(scenarios: &[Scenario]) -> Result<String> {
    Ok(serde_json::to_string_pretty(scenarios)?)
}

pub fn scenarios_from_json(json: &str) -> Result<Vec<Scenario>> {
    serde_json::from_str(json).context("invalid scenario JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_names_unique() {
        let scenarios = all_scenarios();
        let mut names: Vec<_> = scenarios.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), scenarios.len());
    }

    #[test]
    fn test_wrong_expectation_reported() {
        let scenario = Scenario {
            name: "mislabelled".into(),
            steps: vec![step(burn(OWNER, "1"), Outcome::InsufficientBalance)],
            balances: vec![],
            allowances: vec![],
            total_supply: "20999".into(),
        };
        let err = run_scenario(&scenario).unwrap_err();
        assert!(err.to_string().contains("mislabelled: step 0"));
    }

    #[test]
    fn test_unknown_signer_rejected() {
        let scenario = Scenario {
            name: "ghost".into(),
            steps: vec![step(burn(Party::Signer(9), "0"), Outcome::Transfer)],
            balances: vec![],
            allowances: vec![],
            total_supply: "21000".into(),
        };
        assert!(run_scenario(&scenario).is_err());
    }

    #[test]
    fn test_party_json_shape() {
        assert_eq!(serde_json::to_string(&Party::Null).unwrap(), r#""null""#);
        assert_eq!(serde_json::to_string(&ADDR1).unwrap(), r#"{"signer":1}"#);
    }
}
