use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::ShardIdError;

/// Token id of a shard within a shardwallet.
///
/// Ids are 256-bit and routinely exceed 64 bits, so ordering and formatting
/// go through [`U256`]. `Ord` is numeric: `"9" < "10"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShardId(U256);

impl ShardId {
    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl From<u64> for ShardId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for ShardId {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl FromStr for ShardId {
    type Err = ShardIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ShardIdError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ShardIdError::NotDecimal {
                input: s.to_string(),
            });
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| ShardIdError::Overflow {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShardId({})", self.0)
    }
}

impl Serialize for ShardId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
