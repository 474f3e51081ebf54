use tracing::{debug, info, warn};

use crate::chain::{ChainError, ClaimCall, ShardwalletContract, TxHash, TxReceipt};
use crate::claims::errors::ClaimError;
use crate::claims::types::BalancesSnapshot;
use crate::types::{Address, ClaimFraction, Currency, ShardId, currency_addresses};

pub fn claim_call(shard: ShardId, currencies: &[Currency], fraction: ClaimFraction) -> ClaimCall {
    ClaimCall {
        shard,
        currencies: currency_addresses(currencies),
        fraction,
    }
}

/// Dry-run a full claim to learn what `shard` would pay out right now.
///
/// Runs as a read-only call, so nothing on chain changes.
pub async fn preview_claim<C>(
    contract: &C,
    shardwallet: Address,
    account: Address,
    shard: ShardId,
    currencies: &[Currency],
) -> Result<BalancesSnapshot, ChainError>
where
    C: ShardwalletContract + ?Sized,
{
    debug!(
        event = "core.claims.preview_started",
        shardwallet = %shardwallet,
        shard = %shard
    );

    let call = claim_call(shard, currencies, ClaimFraction::FULL);
    let amounts = contract.simulate_claim(shardwallet, account, &call).await?;
    let snapshot = BalancesSnapshot::from_amounts(shard, currencies, amounts)?;

    debug!(
        event = "core.claims.preview_completed",
        shardwallet = %shardwallet,
        shard = %shard
    );

    Ok(snapshot)
}

pub async fn submit_claim<C>(
    contract: &C,
    shardwallet: Address,
    account: Address,
    call: &ClaimCall,
) -> Result<TxHash, ClaimError>
where
    C: ShardwalletContract + ?Sized,
{
    info!(
        event = "core.claims.submit_started",
        shardwallet = %shardwallet,
        shard = %call.shard,
        fraction_micros = call.fraction.micros()
    );

    let tx_hash = contract.submit_claim(shardwallet, account, call).await?;

    info!(
        event = "core.claims.submit_completed",
        shard = %call.shard,
        tx_hash = %tx_hash
    );

    Ok(tx_hash)
}

/// Wait for `tx_hash` to be mined. A reverted receipt is an error.
pub async fn confirm_claim<C>(contract: &C, tx_hash: TxHash) -> Result<TxReceipt, ClaimError>
where
    C: ShardwalletContract + ?Sized,
{
    let receipt = contract.wait_for_receipt(tx_hash).await?;
    if !receipt.success {
        warn!(
            event = "core.claims.confirm_reverted",
            tx_hash = %tx_hash,
            block_number = receipt.block_number
        );
        return Err(ClaimError::Reverted { tx_hash });
    }

    info!(
        event = "core.claims.confirm_completed",
        tx_hash = %tx_hash,
        block_number = receipt.block_number
    );

    Ok(receipt)
}
