use chrono::DateTime;
use tracing::{debug, info};

use crate::chain::{ChainError, PriceOracle};
use crate::price::types::PriceSnapshot;
use crate::types::Address;

/// Read the feed's precision and latest answer together.
///
/// Both reads run concurrently and the snapshot is only built once both
/// have succeeded.
pub async fn fetch_price<O>(oracle: &O, address: Address) -> Result<PriceSnapshot, ChainError>
where
    O: PriceOracle + ?Sized,
{
    debug!(event = "core.price.fetch_started", oracle = %address);

    let (decimals, round) = tokio::try_join!(
        oracle.decimals(address),
        oracle.latest_round_data(address)
    )?;

    let updated_at = i64::try_from(round.updated_at)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| ChainError::InvalidResponse {
            method: "latestRoundData",
            message: format!("updatedAt {} is out of range", round.updated_at),
        })?;

    info!(
        event = "core.price.fetch_completed",
        oracle = %address,
        rate = %round.answer,
        decimals = decimals,
        updated_at = %updated_at
    );

    Ok(PriceSnapshot {
        rate: round.answer,
        decimals,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use primitive_types::U256;

    use super::*;
    use crate::chain::memory::test_fixtures::*;
    use crate::chain::{DelayTarget, MemoryChain};

    #[tokio::test]
    async fn test_fetch_price() {
        let chain = MemoryChain::new(sample_fixture());
        let price = fetch_price(&chain, ORACLE).await.unwrap();
        assert_eq!(price.rate, U256::from(200_000_000_000u64));
        assert_eq!(price.decimals, 8);
        assert_eq!(price.updated_at.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_one_failed_read_fails_whole_snapshot() {
        let chain = MemoryChain::new(sample_fixture());
        chain.fail_method("latestRoundData", "stale round");
        let err = fetch_price(&chain, ORACLE).await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::Rpc {
                method: "latestRoundData",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_oracle() {
        let chain = MemoryChain::new(sample_fixture());
        let err = fetch_price(&chain, BOB).await.unwrap_err();
        assert_eq!(err, ChainError::UnknownContract { address: BOB });
    }

    #[tokio::test]
    async fn test_timestamp_out_of_range() {
        let chain = MemoryChain::new(sample_fixture());
        chain.set_oracle_answer(ORACLE, U256::from(1u64), u64::MAX);
        let err = fetch_price(&chain, ORACLE).await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::InvalidResponse {
                method: "latestRoundData",
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_run_concurrently() {
        let chain = MemoryChain::new(sample_fixture());
        chain.set_delay(DelayTarget::Oracle(ORACLE), Duration::from_secs(2));
        let start = tokio::time::Instant::now();
        fetch_price(&chain, ORACLE).await.unwrap();
        assert!(start.elapsed() < Duration::from_secs(4));
    }
}
