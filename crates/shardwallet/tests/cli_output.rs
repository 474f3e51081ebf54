//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.

mod common;

use common::Workspace;

#[test]
fn test_shards_lists_owned_ids_in_numeric_order() {
    let workspace = Workspace::new();
    let output = workspace.run_ok(&["shards"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let lines: Vec<&str> = stdout.lines().collect();
    assert!(
        lines[0].contains("0x221e1B033E10063Ae3Fba737Ce40ef682fbfcCcC"),
        "header should name the shardwallet, got: {}",
        stdout
    );
    assert_eq!(lines[1], "* 9");
    assert_eq!(lines[2], "  10");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_stdout_is_clean_in_default_mode() {
    let workspace = Workspace::new();
    let output = workspace.run_ok(&["shards"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should not emit INFO logs, got: {}",
        stderr
    );
}

#[test]
fn test_verbose_mode_emits_logs_on_stderr() {
    let workspace = Workspace::new();
    let output = workspace.run_ok(&["-v", "shards"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains(r#""event":"cli.shards_started""#),
        "Verbose mode should log command events, got: {}",
        stderr
    );
    assert!(
        stderr.contains(r#""event":"core.shards.enumerate_completed""#),
        "Verbose mode should log core events, got: {}",
        stderr
    );
    for line in stdout.lines() {
        assert!(
            !line.trim_start().starts_with('{'),
            "stdout should not contain JSON lines, got: {}",
            line
        );
    }
}

#[test]
fn test_balances_shows_usd_conversion() {
    let workspace = Workspace::new();
    let output = workspace.run_ok(&["balances"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Shard 9 in"), "got: {}", stdout);
    assert!(stdout.contains("$8000.00"), "got: {}", stdout);
    assert!(stdout.contains("Total claimable: $8000.00"), "got: {}", stdout);
    assert!(
        stdout.contains("Conversions using ETH price of $2000.00 as of 2023-11-14 22:13:20 UTC."),
        "got: {}",
        stdout
    );
}

#[test]
fn test_balances_of_unowned_shard_fails() {
    let workspace = Workspace::new();
    let output = workspace.run(&["balances", "--shard", "3"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not owned"), "got: {}", stderr);
}

#[test]
fn test_invalid_shard_id_fails() {
    let workspace = Workspace::new();
    let output = workspace.run(&["balances", "--shard", "0x10"]);
    assert!(!output.status.success());
}

#[test]
fn test_price_warns_when_stale() {
    let workspace = Workspace::new();
    let output = workspace.run_ok(&["price"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("ETH/USD: $2000.00"), "got: {}", stdout);
    assert!(stderr.contains("Warning: the price answer is"), "got: {}", stderr);
}

#[test]
fn test_claim_updates_fixture() {
    let workspace = Workspace::new();
    let output = workspace.run_ok(&["claim", "--shard", "10", "--percent", "50"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.contains("Claiming 50% of shard 10 (~$3000.00)"),
        "got: {}",
        stdout
    );
    assert!(stdout.contains("Claim confirmed in block 101"), "got: {}", stdout);
    assert!(stdout.contains("Transaction: 0x"), "got: {}", stdout);

    let fixture = std::fs::read_to_string(workspace.fixture_path()).unwrap();
    let fixture: serde_json::Value = serde_json::from_str(&fixture).unwrap();
    assert_eq!(fixture["block_number"], 101);
    let shard = &fixture["shardwallets"][0]["shards"][0];
    assert_eq!(shard["id"], "10");
    assert_eq!(
        shard["balances"]["0x0000000000000000000000000000000000000000"],
        "1000000000000000000"
    );
}

#[test]
fn test_claim_of_unowned_shard_leaves_fixture_untouched() {
    let workspace = Workspace::new();
    let output = workspace.run(&[
        "claim",
        "--shardwallet",
        "0x221e1B033E10063Ae3Fba737Ce40ef682fbfcCcC",
        "--shard",
        "3",
    ]);
    assert!(!output.status.success());
    assert!(
        std::fs::read_to_string(workspace.fixture_path())
            .unwrap()
            .contains("\"block_number\": 100")
    );
}

#[test]
fn test_missing_fixture_fails() {
    let workspace = Workspace::new();
    std::fs::remove_file(workspace.fixture_path()).unwrap();
    let output = workspace.run(&["shards"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load fixture"), "got: {}", stderr);
}

#[test]
fn test_unknown_shardwallet_fails() {
    let workspace = Workspace::new();
    let output = workspace.run(&[
        "shards",
        "--shardwallet",
        "0x1111111111111111111111111111111111111111",
    ]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to list shards"), "got: {}", stderr);
}
