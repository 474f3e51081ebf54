//! shardwallet-core: shard discovery, claim preview and claim execution
//!
//! A shardwallet is a contract that holds pooled funds and splits them among
//! the holders of its shard tokens. This library finds the shards an account
//! owns, previews what each would pay out, executes claims and converts
//! balances to USD through an ETH/USD price feed.
//!
//! # Main Entry Points
//!
//! - [`state`] - The reactive [`ShardwalletStore`] tying everything together
//! - [`wallet`] - Wallet connection state
//! - [`shards`], [`claims`], [`price`] - The individual chain reads and writes
//! - [`display`] - Integer USD conversion and amount formatting
//! - [`chain`] - Collaborator traits and the in-memory fixture chain
//! - [`config`] - Configuration management

pub mod chain;
pub mod claims;
pub mod config;
pub mod display;
pub mod errors;
pub mod events;
pub mod logging;
pub mod price;
pub mod shards;
pub mod state;
pub mod types;
pub mod wallet;

// Re-export commonly used types at crate root for convenience
pub use chain::{ChainError, ChainFixture, ChainProvider, MemoryChain, TxHash, TxReceipt};
pub use claims::{BalancesSnapshot, ClaimError};
pub use config::ShardwalletConfig;
pub use display::Conversion;
pub use errors::ShardwalletError;
pub use price::PriceSnapshot;
pub use state::{Event, FetchFailure, FetchStage, ShardwalletStore, ShardwalletView, StoreError};
pub use types::{Address, ClaimFraction, Currency, ShardId};
pub use wallet::{MemoryWallet, WalletError, WalletSession, WalletState};

// Re-export logging initialization
pub use logging::init_logging;
