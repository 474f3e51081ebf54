//! Shared fixture setup for CLI integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Alice owns shards 10 (2 ETH, 1 WETH) and 9 (4 ETH), minted in that
/// order; Bob owns shard 3. ETH trades at $2000.00.
pub const FIXTURE: &str = r#"{
  "chain_id": 1,
  "block_number": 100,
  "accounts": ["0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"],
  "shardwallets": [
    {
      "address": "0x221e1B033E10063Ae3Fba737Ce40ef682fbfcCcC",
      "shards": [
        {
          "id": "10",
          "owner": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
          "balances": {
            "0x0000000000000000000000000000000000000000": "2000000000000000000",
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2": "1000000000000000000"
          }
        },
        {
          "id": "3",
          "owner": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
          "balances": {
            "0x0000000000000000000000000000000000000000": "5000000000000000000"
          }
        },
        {
          "id": "9",
          "owner": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
          "balances": {
            "0x0000000000000000000000000000000000000000": "4000000000000000000"
          }
        }
      ]
    }
  ],
  "oracles": [
    {
      "address": "0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419",
      "decimals": 8,
      "answer": "200000000000",
      "updated_at": 1700000000,
      "round_id": 1
    }
  ]
}"#;

/// A scratch directory holding `chain.json`, also used as HOME and working
/// directory so no real config file is picked up.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_fixture(FIXTURE)
    }

    pub fn with_fixture(fixture: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("chain.json"), fixture).expect("Failed to write fixture");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn fixture_path(&self) -> PathBuf {
        self.dir.path().join("chain.json")
    }

    /// Run `shardwallet <args> --fixture chain.json`.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_shardwallet"))
            .args(args)
            .arg("--fixture")
            .arg(self.fixture_path())
            .env("HOME", self.path())
            .env_remove("RUST_LOG")
            .current_dir(self.path())
            .output()
            .expect("Failed to execute shardwallet")
    }

    /// Like [`run`](Self::run), asserting success.
    pub fn run_ok(&self, args: &[&str]) -> Output {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "shardwallet {:?} failed with exit code {:?}. stderr: {}",
            args,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run_ok(args);
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("stdout should be valid JSON ({}): {}", e, stdout))
    }
}
