use futures::future::try_join_all;
use primitive_types::U256;
use tracing::{debug, info};

use crate::chain::{ChainError, ShardwalletContract};
use crate::types::{Address, ShardId};

/// Upper bound on the owned-token count we are willing to enumerate.
const MAX_SHARDS_PER_OWNER: u64 = 1 << 16;

/// List the shards `owner` holds in `shardwallet`, lowest id first.
///
/// The count is read first, then every `tokenOfOwnerByIndex` lookup runs
/// concurrently. Any failed lookup fails the whole enumeration.
pub async fn enumerate_shards<C>(
    contract: &C,
    shardwallet: Address,
    owner: Address,
) -> Result<Vec<ShardId>, ChainError>
where
    C: ShardwalletContract + ?Sized,
{
    debug!(
        event = "core.shards.enumerate_started",
        shardwallet = %shardwallet,
        owner = %owner
    );

    let count = owned_count(contract.balance_of(shardwallet, owner).await?)?;

    let lookups = (0..count)
        .map(|index| contract.token_of_owner_by_index(shardwallet, owner, U256::from(index)));
    let mut ids = try_join_all(lookups).await?;
    sort_shard_ids(&mut ids);

    info!(
        event = "core.shards.enumerate_completed",
        shardwallet = %shardwallet,
        owner = %owner,
        count = ids.len()
    );

    Ok(ids)
}

/// Numeric ascending order.
pub fn sort_shard_ids(ids: &mut [ShardId]) {
    ids.sort_unstable();
}

fn owned_count(count: U256) -> Result<u64, ChainError> {
    if count > U256::from(MAX_SHARDS_PER_OWNER) {
        return Err(ChainError::InvalidResponse {
            method: "balanceOf",
            message: format!("owner holds {} shards", count),
        });
    }
    Ok(count.low_u64())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::chain::memory::test_fixtures::*;
    use crate::chain::{DelayTarget, MemoryChain};

    #[tokio::test]
    async fn test_ids_sorted_numerically() {
        let chain = MemoryChain::new(sample_fixture());
        let ids = enumerate_shards(&chain, SHARDWALLET, ALICE).await.unwrap();
        let rendered: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["9", "10", "340282366920938463463374607431768211457"]
        );
    }

    #[tokio::test]
    async fn test_owner_without_shards() {
        let chain = MemoryChain::new(sample_fixture());
        let ids = enumerate_shards(&chain, OTHER_SHARDWALLET, BOB).await.unwrap();
        assert!(ids.is_empty());
        assert_eq!(chain.call_count("tokenOfOwnerByIndex"), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_enumeration() {
        let chain = MemoryChain::new(sample_fixture());
        chain.fail_method("tokenOfOwnerByIndex", "node unavailable");
        let err = enumerate_shards(&chain, SHARDWALLET, ALICE).await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::Rpc {
                method: "tokenOfOwnerByIndex",
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookups_run_concurrently() {
        let chain = MemoryChain::new(sample_fixture());
        chain.set_delay(DelayTarget::Owner(ALICE), Duration::from_secs(1));

        let start = tokio::time::Instant::now();
        let ids = enumerate_shards(&chain, SHARDWALLET, ALICE).await.unwrap();
        assert_eq!(ids.len(), 3);
        // One round trip for the count, one for all three lookups together.
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_sort_beyond_u64() {
        let mut ids: Vec<ShardId> = ["18446744073709551616", "2", "18446744073709551615"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        sort_shard_ids(&mut ids);
        assert_eq!(ids[0], ShardId::from(2u64));
        assert_eq!(ids[1], ShardId::from(u64::MAX));
        assert_eq!(ids[2].to_string(), "18446744073709551616");
    }

    #[test]
    fn test_absurd_count_rejected() {
        assert!(owned_count(U256::MAX).is_err());
        assert_eq!(owned_count(U256::from(4)).unwrap(), 4);
    }
}
