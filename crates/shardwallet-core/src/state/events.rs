use crate::chain::{TxHash, TxReceipt};
use crate::claims::ClaimError;
use crate::price::PriceSnapshot;
use crate::state::view::FetchFailure;
use crate::types::{Address, ShardId};

/// Lifecycle notifications broadcast by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ShardsLoaded {
        shardwallet: Address,
        account: Address,
        shard_ids: Vec<ShardId>,
    },
    BalancesLoaded {
        shard: ShardId,
    },
    PriceLoaded {
        price: PriceSnapshot,
    },
    FetchFailed(FetchFailure),
    ClaimSubmitted {
        shard: ShardId,
        tx_hash: TxHash,
    },
    ClaimConfirmed {
        shard: ShardId,
        receipt: TxReceipt,
    },
    ClaimFailed {
        shard: ShardId,
        error: ClaimError,
    },
}
