//! Configuration type definitions.
//!
//! Every field is optional in the file so that a project config can override
//! a single value from the user config. Resolved values, with built-in
//! defaults applied, come from the accessor methods.
//!
//! # Example Configuration
//!
//! ```toml
//! [shardwallet]
//! address = "0x221e1B033E10063Ae3Fba737Ce40ef682fbfcCcC"
//!
//! [oracle]
//! address = "0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419"
//! max_age_secs = 3600
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::types::Address;

/// Configuration loaded from TOML config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardwalletConfig {
    /// Shard collection to operate on
    #[serde(default)]
    pub shardwallet: ContractConfig,

    /// ETH/USD price feed
    #[serde(default)]
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    /// Age in seconds after which a price answer is reported as stale.
    /// Default: 3600.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_secs: Option<u64>,
}

impl ShardwalletConfig {
    pub fn shardwallet_address(&self) -> Address {
        self.shardwallet
            .address
            .unwrap_or(defaults::DEFAULT_SHARDWALLET_ADDRESS)
    }

    pub fn oracle_address(&self) -> Address {
        self.oracle.address.unwrap_or(defaults::DEFAULT_ORACLE_ADDRESS)
    }

    pub fn max_price_age(&self) -> Duration {
        Duration::from_secs(
            self.oracle
                .max_age_secs
                .unwrap_or(defaults::DEFAULT_MAX_PRICE_AGE_SECS),
        )
    }
}
