use std::fmt;

use primitive_types::U256;

use super::operations::format_usd;

/// Outcome of converting a raw balance to USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Value in US cents.
    Usd(U256),
    /// No price reading yet, or the value is out of range.
    Unavailable,
    /// The currency is not priced by the ETH/USD feed.
    NotPriced,
}

impl Conversion {
    pub fn cents(&self) -> Option<U256> {
        match self {
            Conversion::Usd(cents) => Some(*cents),
            _ => None,
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversion::Usd(cents) => f.write_str(&format_usd(*cents)),
            Conversion::Unavailable => f.write_str("unavailable"),
            Conversion::NotPriced => f.write_str("n/a"),
        }
    }
}
