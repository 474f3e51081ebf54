//! Built-in fallback values used when no config file sets them.

use crate::types::Address;

/// The shard collection the application was deployed against.
pub const DEFAULT_SHARDWALLET_ADDRESS: Address =
    Address::from_hex_const("0x221e1B033E10063Ae3Fba737Ce40ef682fbfcCcC");

/// Chainlink ETH/USD aggregator on mainnet.
pub const DEFAULT_ORACLE_ADDRESS: Address =
    Address::from_hex_const("0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419");

/// The aggregator heartbeat is one hour.
pub const DEFAULT_MAX_PRICE_AGE_SECS: u64 = 3600;
