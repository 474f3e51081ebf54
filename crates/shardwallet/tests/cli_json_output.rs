//! Integration tests for CLI JSON output behavior
//!
//! These tests verify that --json produces valid, parseable JSON output
//! for automation and scripting workflows.

mod common;

use common::Workspace;

#[test]
fn test_shards_json() {
    let workspace = Workspace::new();
    let json = workspace.run_json(&["shards", "--json"]);

    assert_eq!(
        json["account"].as_str().map(str::to_lowercase).as_deref(),
        Some("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
    );
    assert_eq!(json["shardwallet"], "0x221e1B033E10063Ae3Fba737Ce40ef682fbfcCcC");
    assert_eq!(json["shard_ids"], serde_json::json!(["9", "10"]));
    assert_eq!(json["selected_shard"], "9");
}

#[test]
fn test_balances_json_for_selected_shard() {
    let workspace = Workspace::new();
    let json = workspace.run_json(&["balances", "--shard", "10", "--json"]);

    assert_eq!(json["shard"], "10");
    let balances = json["balances"].as_array().expect("balances should be an array");
    assert_eq!(balances.len(), 2);

    assert_eq!(balances[0]["currency"], "ETH");
    assert_eq!(balances[0]["amount"], "2000000000000000000");
    assert_eq!(balances[0]["formatted"], "2.0");
    assert_eq!(balances[0]["usd"], "$4000.00");

    assert_eq!(balances[1]["currency"], "WETH");
    assert_eq!(balances[1]["formatted"], "1.0");
    assert_eq!(balances[1]["usd"], "$2000.00");

    assert_eq!(json["total_usd"], "$6000.00");
    assert_eq!(json["price"]["rate"], "200000000000");
    assert!(json["price_error"].is_null());
}

#[test]
fn test_balances_json_without_oracle() {
    let fixture = common::FIXTURE.replace(
        "0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419",
        "0x1111111111111111111111111111111111111111",
    );
    let workspace = Workspace::with_fixture(&fixture);
    let json = workspace.run_json(&["balances", "--json"]);

    assert_eq!(json["shard"], "9");
    assert!(json["price"].is_null());
    assert!(json["total_usd"].is_null());
    assert!(json["balances"][0]["usd"].is_null());
    assert!(
        json["price_error"]
            .as_str()
            .is_some_and(|e| e.contains("No contract deployed")),
        "got: {}",
        json
    );
}

#[test]
fn test_price_json() {
    let workspace = Workspace::new();
    let json = workspace.run_json(&["price", "--json"]);

    assert_eq!(json["oracle"], "0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419");
    assert_eq!(json["rate"], "200000000000");
    assert_eq!(json["decimals"], 8);
    assert_eq!(json["usd"], "$2000.00");
    assert_eq!(json["stale"], true);
}

#[test]
fn test_claim_then_balances_reflect_payout() {
    let workspace = Workspace::new();
    workspace.run_ok(&["claim"]);

    let json = workspace.run_json(&["balances", "--json"]);
    assert_eq!(json["shard"], "9");
    assert_eq!(json["balances"][0]["amount"], "0");
    assert_eq!(json["balances"][0]["usd"], "$0.00");
}
