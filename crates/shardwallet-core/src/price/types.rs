use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::Serialize;

/// One consistent reading of the ETH/USD feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceSnapshot {
    /// USD per ETH, scaled by `10^decimals`.
    #[serde(with = "crate::types::decimal")]
    pub rate: U256,
    pub decimals: u8,
    pub updated_at: DateTime<Utc>,
}

impl PriceSnapshot {
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.updated_at)
    }

    /// True once the answer is older than `max_age`. Answers from the
    /// future (clock skew) are never stale.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: std::time::Duration) -> bool {
        match self.age(now).to_std() {
            Ok(age) => age > max_age,
            Err(_) => false,
        }
    }
}
