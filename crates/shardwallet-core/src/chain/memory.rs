//! In-memory chain backed by a JSON fixture.
//!
//! Implements the full [`ChainProvider`](super::ChainProvider) surface so the
//! coordinator can run without a node: the CLI drives it from a fixture file
//! and tests use its delay and failure knobs to stage races.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::types::{Address, ShardId};

use super::errors::{ChainError, FixtureError};
use super::types::{ClaimCall, PriceOracle, RoundData, ShardwalletContract, TxHash, TxReceipt};

/// A raw token amount stored as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Amount(#[serde(with = "crate::types::decimal")] pub U256);

fn default_chain_id() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainFixture {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default)]
    pub block_number: u64,
    /// Accounts the wallet exposes; the first one is active.
    #[serde(default)]
    pub accounts: Vec<Address>,
    #[serde(default)]
    pub shardwallets: Vec<ShardwalletFixture>,
    #[serde(default)]
    pub oracles: Vec<OracleFixture>,
}

impl Default for ChainFixture {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            block_number: 0,
            accounts: Vec::new(),
            shardwallets: Vec::new(),
            oracles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardwalletFixture {
    pub address: Address,
    /// Shards in mint order. An owner's enumeration index follows this order.
    #[serde(default)]
    pub shards: Vec<ShardFixture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardFixture {
    pub id: ShardId,
    pub owner: Address,
    /// Claimable amount per currency address.
    #[serde(default)]
    pub balances: BTreeMap<Address, Amount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleFixture {
    pub address: Address,
    pub decimals: u8,
    pub answer: Amount,
    pub updated_at: u64,
    #[serde(default)]
    pub round_id: u64,
}

impl ChainFixture {
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| FixtureError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), FixtureError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| FixtureError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn shardwallet(&self, address: Address) -> Result<&ShardwalletFixture, ChainError> {
        self.shardwallets
            .iter()
            .find(|w| w.address == address)
            .ok_or(ChainError::UnknownContract { address })
    }

    fn shardwallet_mut(&mut self, address: Address) -> Result<&mut ShardwalletFixture, ChainError> {
        self.shardwallets
            .iter_mut()
            .find(|w| w.address == address)
            .ok_or(ChainError::UnknownContract { address })
    }

    fn oracle(&self, address: Address) -> Result<&OracleFixture, ChainError> {
        self.oracles
            .iter()
            .find(|o| o.address == address)
            .ok_or(ChainError::UnknownContract { address })
    }
}

impl ShardwalletFixture {
    fn owned_shard(&self, id: ShardId, owner: Address) -> Result<&ShardFixture, ChainError> {
        let shard = self
            .shards
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ChainError::Reverted {
                method: "claim",
                reason: format!("shard {} does not exist", id),
            })?;
        if shard.owner != owner {
            return Err(ChainError::Reverted {
                method: "claim",
                reason: format!("{} does not own shard {}", owner, id),
            });
        }
        Ok(shard)
    }
}

/// What a configured delay applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayTarget {
    Shardwallet(Address),
    Owner(Address),
    Shard(ShardId),
    Oracle(Address),
}

#[derive(Default)]
struct Inner {
    fixture: ChainFixture,
    delays: HashMap<DelayTarget, Duration>,
    failures: HashMap<&'static str, String>,
    calls: HashMap<&'static str, usize>,
    receipts: HashMap<TxHash, TxReceipt>,
    revert_claims: bool,
    nonce: u64,
}

pub struct MemoryChain {
    inner: Mutex<Inner>,
}

impl fmt::Debug for MemoryChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryChain")
            .field("chain_id", &self.lock().fixture.chain_id)
            .finish_non_exhaustive()
    }
}

impl MemoryChain {
    pub fn new(fixture: ChainFixture) -> Self {
        Self {
            inner: Mutex::new(Inner {
                fixture,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current chain state, including claims applied so far.
    pub fn fixture(&self) -> ChainFixture {
        self.lock().fixture.clone()
    }

    pub fn chain_id(&self) -> u64 {
        self.lock().fixture.chain_id
    }

    pub fn accounts(&self) -> Vec<Address> {
        self.lock().fixture.accounts.clone()
    }

    /// Delay every call touching `target`. Overlapping delays use the longest.
    pub fn set_delay(&self, target: DelayTarget, delay: Duration) {
        self.lock().delays.insert(target, delay);
    }

    pub fn clear_delay(&self, target: DelayTarget) {
        self.lock().delays.remove(&target);
    }

    /// Make every call to `method` fail with an RPC error.
    pub fn fail_method(&self, method: &'static str, message: &str) {
        self.lock().failures.insert(method, message.to_string());
    }

    pub fn clear_failure(&self, method: &'static str) {
        self.lock().failures.remove(method);
    }

    /// Mine submitted claims as reverted transactions.
    pub fn set_revert_claims(&self, revert: bool) {
        self.lock().revert_claims = revert;
    }

    /// Number of times `method` has been called.
    pub fn call_count(&self, method: &str) -> usize {
        self.lock().calls.get(method).copied().unwrap_or(0)
    }

    pub fn shard_balance(&self, shardwallet: Address, shard: ShardId, currency: Address) -> U256 {
        let inner = self.lock();
        inner
            .fixture
            .shardwallet(shardwallet)
            .ok()
            .and_then(|w| w.shards.iter().find(|s| s.id == shard))
            .and_then(|s| s.balances.get(&currency))
            .map(|a| a.0)
            .unwrap_or_default()
    }

    pub fn set_oracle_answer(&self, oracle: Address, answer: U256, updated_at: u64) {
        let mut inner = self.lock();
        if let Some(o) = inner.fixture.oracles.iter_mut().find(|o| o.address == oracle) {
            o.answer = Amount(answer);
            o.updated_at = updated_at;
            o.round_id += 1;
        }
    }

    /// Count the call, apply the longest matching delay, then any injected failure.
    async fn enter(&self, method: &'static str, targets: &[DelayTarget]) -> Result<(), ChainError> {
        let (delay, failure) = {
            let mut inner = self.lock();
            *inner.calls.entry(method).or_default() += 1;
            let delay = targets
                .iter()
                .filter_map(|t| inner.delays.get(t).copied())
                .max()
                .unwrap_or_default();
            (delay, inner.failures.get(method).cloned())
        };

        debug!(
            event = "core.memory_chain.call_started",
            method = method,
            delay_ms = delay.as_millis() as u64
        );

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(message) => Err(ChainError::Rpc { method, message }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ShardwalletContract for MemoryChain {
    async fn balance_of(&self, shardwallet: Address, owner: Address) -> Result<U256, ChainError> {
        self.enter(
            "balanceOf",
            &[DelayTarget::Shardwallet(shardwallet), DelayTarget::Owner(owner)],
        )
        .await?;
        let inner = self.lock();
        let wallet = inner.fixture.shardwallet(shardwallet)?;
        Ok(U256::from(
            wallet.shards.iter().filter(|s| s.owner == owner).count(),
        ))
    }

    async fn token_of_owner_by_index(
        &self,
        shardwallet: Address,
        owner: Address,
        index: U256,
    ) -> Result<ShardId, ChainError> {
        self.enter(
            "tokenOfOwnerByIndex",
            &[DelayTarget::Shardwallet(shardwallet), DelayTarget::Owner(owner)],
        )
        .await?;
        let inner = self.lock();
        let wallet = inner.fixture.shardwallet(shardwallet)?;
        let out_of_bounds = || ChainError::Reverted {
            method: "tokenOfOwnerByIndex",
            reason: "owner index out of bounds".to_string(),
        };
        if index > U256::from(u32::MAX) {
            return Err(out_of_bounds());
        }
        let index = index.low_u64() as usize;
        wallet
            .shards
            .iter()
            .filter(|s| s.owner == owner)
            .nth(index)
            .map(|s| s.id)
            .ok_or_else(out_of_bounds)
    }

    async fn simulate_claim(
        &self,
        shardwallet: Address,
        from: Address,
        call: &ClaimCall,
    ) -> Result<Vec<U256>, ChainError> {
        self.enter(
            "simulateClaim",
            &[
                DelayTarget::Shardwallet(shardwallet),
                DelayTarget::Owner(from),
                DelayTarget::Shard(call.shard),
            ],
        )
        .await?;
        let inner = self.lock();
        let shard = inner
            .fixture
            .shardwallet(shardwallet)?
            .owned_shard(call.shard, from)?;
        Ok(call
            .currencies
            .iter()
            .map(|c| {
                let available = shard.balances.get(c).map(|a| a.0).unwrap_or_default();
                call.fraction.apply(available)
            })
            .collect())
    }

    async fn submit_claim(
        &self,
        shardwallet: Address,
        from: Address,
        call: &ClaimCall,
    ) -> Result<TxHash, ChainError> {
        self.enter(
            "claim",
            &[
                DelayTarget::Shardwallet(shardwallet),
                DelayTarget::Owner(from),
                DelayTarget::Shard(call.shard),
            ],
        )
        .await?;
        let mut inner = self.lock();
        inner
            .fixture
            .shardwallet(shardwallet)?
            .owned_shard(call.shard, from)?;

        inner.nonce += 1;
        inner.fixture.block_number += 1;
        let block_number = inner.fixture.block_number;

        let mut hasher = Keccak256::new();
        hasher.update(shardwallet.as_bytes());
        hasher.update(from.as_bytes());
        hasher.update(inner.nonce.to_be_bytes());
        let tx_hash = TxHash(hasher.finalize().into());

        let success = !inner.revert_claims;
        if success {
            let wallet = inner.fixture.shardwallet_mut(shardwallet)?;
            if let Some(shard) = wallet.shards.iter_mut().find(|s| s.id == call.shard) {
                for currency in &call.currencies {
                    if let Some(balance) = shard.balances.get_mut(currency) {
                        let claimed = call.fraction.apply(balance.0);
                        balance.0 -= claimed;
                    }
                }
            }
        }

        inner.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                block_number,
                success,
            },
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx: TxHash) -> Result<TxReceipt, ChainError> {
        self.enter("waitForReceipt", &[]).await?;
        self.lock()
            .receipts
            .get(&tx)
            .copied()
            .ok_or(ChainError::TransactionNotFound { hash: tx })
    }
}

#[async_trait]
impl PriceOracle for MemoryChain {
    async fn decimals(&self, oracle: Address) -> Result<u8, ChainError> {
        self.enter("decimals", &[DelayTarget::Oracle(oracle)]).await?;
        Ok(self.lock().fixture.oracle(oracle)?.decimals)
    }

    async fn latest_round_data(&self, oracle: Address) -> Result<RoundData, ChainError> {
        self.enter("latestRoundData", &[DelayTarget::Oracle(oracle)])
            .await?;
        let inner = self.lock();
        let o = inner.fixture.oracle(oracle)?;
        Ok(RoundData {
            round_id: o.round_id.into(),
            answer: o.answer.0,
            started_at: o.updated_at,
            updated_at: o.updated_at,
            answered_in_round: o.round_id.into(),
        })
    }
}
