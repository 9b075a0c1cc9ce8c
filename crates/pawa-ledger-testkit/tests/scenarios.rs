//! Built-in scenario vectors, run directly, through JSON, and through the
//! ledger service.

use anyhow::Result;

use pawa_ledger::{LedgerService, ServiceConfig};
use pawa_ledger_core::{verify_event_log, whole};
use pawa_ledger_testkit::scenarios::{all_scenarios, scenarios_from_json, scenarios_to_json};
use pawa_ledger_testkit::{run_scenario, TestFixture};

#[test]
fn test_all_scenarios_pass() -> Result<()> {
    for scenario in all_scenarios() {
        let ledger = run_scenario(&scenario)?;
        verify_event_log(ledger.events())?;
    }
    Ok(())
}

#[test]
fn test_scenarios_survive_json() -> Result<()> {
    let json = scenarios_to_json(&all_scenarios())?;
    let loaded = scenarios_from_json(&json)?;
    assert_eq!(loaded, all_scenarios());
    for scenario in &loaded {
        run_scenario(scenario)?;
    }
    Ok(())
}

#[test]
fn test_handwritten_scenario_json() -> Result<()> {
    let json = r#"[{
        "name": "hand written",
        "steps": [
            {"call": {"call": "transfer", "caller": {"signer": 0}, "to": {"signer": 1},
                      "amount": "2.5"},
             "expect": "transfer"},
            {"call": {"call": "burn", "caller": {"signer": 1}, "amount": "3"},
             "expect": "insufficient_balance"},
            {"call": {"call": "approve", "caller": {"signer": 1}, "spender": "null", "amount": "1"},
             "expect": "invalid_spender"}
        ],
        "balances": [[{"signer": 1}, "2.5"]],
        "total_supply": "21000"
    }]"#;

    let scenarios = scenarios_from_json(json)?;
    assert_eq!(scenarios.len(), 1);
    assert!(scenarios[0].allowances.is_empty());
    run_scenario(&scenarios[0])?;
    Ok(())
}

#[tokio::test]
async fn test_service_matches_direct_calls() -> Result<()> {
    let mut direct = TestFixture::new();
    let served = TestFixture::new();
    let (owner, addr1, addr2) = (served.owner(), served.addr1(), served.addr2());

    let (handle, task) = LedgerService::spawn(served.ledger, ServiceConfig::default());

    handle.transfer(owner, addr1, whole(100)).await?;
    handle.approve(addr1, addr2, whole(60)).await?;
    handle.transfer_from(addr2, addr1, addr2, whole(50)).await?;
    handle.burn_from(addr2, addr1, whole(10)).await?;
    assert!(handle.burn(addr1, whole(1_000)).await.is_err());

    direct.ledger.transfer(owner, addr1, whole(100))?;
    direct.ledger.approve(addr1, addr2, whole(60))?;
    direct.ledger.transfer_from(addr2, addr1, addr2, whole(50))?;
    direct.ledger.burn_from(addr2, addr1, whole(10))?;

    assert_eq!(handle.snapshot().await?, direct.ledger.snapshot());
    assert_eq!(handle.events().await?, direct.ledger.events().to_vec());

    drop(handle);
    let ledger = task.await?;
    assert_eq!(ledger.total_supply(), whole(20_990));
    Ok(())
}
