use std::fmt;

use serde::Serialize;

use crate::claims::BalancesSnapshot;
use crate::price::PriceSnapshot;
use crate::types::{Address, ShardId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStage {
    Shards,
    Balances,
    Price,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchStage::Shards => "shards",
            FetchStage::Balances => "balances",
            FetchStage::Price => "price",
        })
    }
}

/// A background read that failed for the current generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub stage: FetchStage,
    pub message: String,
}

/// Everything a presentation layer renders, published as one value.
///
/// `selected_shard` is `None` iff `shard_ids` is empty once enumeration has
/// finished, and `balances` is `None` whenever `selected_shard` is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShardwalletView {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub shardwallet: Option<Address>,
    pub shard_ids: Vec<ShardId>,
    pub selected_shard: Option<ShardId>,
    pub balances: Option<BalancesSnapshot>,
    pub claiming: bool,
    pub price: Option<PriceSnapshot>,
    pub last_error: Option<FetchFailure>,
}
