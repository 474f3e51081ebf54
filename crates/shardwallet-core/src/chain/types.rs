use std::fmt;

use async_trait::async_trait;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{Address, ClaimFraction, ShardId};

use super::errors::ChainError;

/// Arguments of the shardwallet `claim(tokenId, currencies, fractionMicros)`
/// call, shared by the dry-run and the real transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimCall {
    pub shard: ShardId,
    pub currencies: Vec<Address>,
    pub fraction: ClaimFraction,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(TxHash(bytes))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// `false` when the transaction was mined but reverted.
    pub success: bool,
}

/// Result of the oracle's `latestRoundData()`.
///
/// `answer` is signed on-chain; implementations reject negative answers
/// with [`ChainError::InvalidResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundData {
    pub round_id: u128,
    pub answer: U256,
    pub started_at: u64,
    /// Seconds since the Unix epoch.
    pub updated_at: u64,
    pub answered_in_round: u128,
}

/// Calls against a shardwallet contract.
#[async_trait]
pub trait ShardwalletContract: Send + Sync {
    /// Number of shards owned by `owner`.
    async fn balance_of(&self, shardwallet: Address, owner: Address) -> Result<U256, ChainError>;

    async fn token_of_owner_by_index(
        &self,
        shardwallet: Address,
        owner: Address,
        index: U256,
    ) -> Result<ShardId, ChainError>;

    /// Run `claim` as a read-only call from `from`. Returns one amount per
    /// entry of `call.currencies`, in the same order.
    async fn simulate_claim(
        &self,
        shardwallet: Address,
        from: Address,
        call: &ClaimCall,
    ) -> Result<Vec<U256>, ChainError>;

    /// Sign and broadcast `claim` from `from`.
    async fn submit_claim(
        &self,
        shardwallet: Address,
        from: Address,
        call: &ClaimCall,
    ) -> Result<TxHash, ChainError>;

    /// Wait until `tx` is mined.
    async fn wait_for_receipt(&self, tx: TxHash) -> Result<TxReceipt, ChainError>;
}

/// Calls against a Chainlink-style aggregator.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn decimals(&self, oracle: Address) -> Result<u8, ChainError>;

    async fn latest_round_data(&self, oracle: Address) -> Result<RoundData, ChainError>;
}

/// Everything the coordinator needs from a connected chain.
pub trait ChainProvider: ShardwalletContract + PriceOracle {}

impl<T: ShardwalletContract + PriceOracle + ?Sized> ChainProvider for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_hash_display_and_serde() {
        let hash = TxHash([0xab; 32]);
        let s = hash.to_string();
        assert!(s.starts_with("0xabab"));
        assert_eq!(s.len(), 66);

        let json = serde_json::to_string(&hash).unwrap();
        let back: TxHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
