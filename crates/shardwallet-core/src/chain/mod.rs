//! On-chain collaborator interface.
//!
//! The coordinator never talks to a node directly; it goes through the
//! [`ShardwalletContract`] and [`PriceOracle`] traits so the transport (JSON-RPC,
//! an injected browser provider, or [`memory::MemoryChain`]) stays swappable.

pub mod errors;
pub mod memory;
pub mod types;

pub use errors::{ChainError, FixtureError};
pub use memory::{ChainFixture, DelayTarget, MemoryChain};
pub use types::{
    ChainProvider, ClaimCall, PriceOracle, RoundData, ShardwalletContract, TxHash, TxReceipt,
};
