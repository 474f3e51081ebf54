//! Shard directory: which shards an account owns in a shardwallet.

pub mod operations;

pub use operations::{enumerate_shards, sort_shard_ids};
