use std::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use super::errors::FractionError;

/// Portion of the available balance to claim, in parts per million.
///
/// Mirrors the contract's `uint24 fractionMicros` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ClaimFraction(u32);

impl ClaimFraction {
    pub const MAX_MICROS: u32 = 1_000_000;

    /// Claim everything that is available.
    pub const FULL: ClaimFraction = ClaimFraction(Self::MAX_MICROS);

    pub fn from_micros(micros: u32) -> Result<Self, FractionError> {
        if micros > Self::MAX_MICROS {
            return Err(FractionError::MicrosOutOfRange {
                micros: micros.into(),
            });
        }
        Ok(Self(micros))
    }

    /// Whole-percent input as entered by a user, scaled by 10,000.
    pub fn from_percent(percent: u32) -> Result<Self, FractionError> {
        if percent > 100 {
            return Err(FractionError::PercentOutOfRange {
                percent: percent.into(),
            });
        }
        Ok(Self(percent * 10_000))
    }

    pub fn micros(&self) -> u32 {
        self.0
    }

    /// `floor(amount * micros / 1_000_000)` without widening.
    pub fn apply(&self, amount: U256) -> U256 {
        let denominator = U256::from(Self::MAX_MICROS);
        let micros = U256::from(self.0);
        let quotient = amount / denominator;
        let remainder = amount % denominator;
        quotient * micros + remainder * micros / denominator
    }
}

impl TryFrom<u32> for ClaimFraction {
    type Error = FractionError;

    fn try_from(micros: u32) -> Result<Self, Self::Error> {
        Self::from_micros(micros)
    }
}

impl From<ClaimFraction> for u32 {
    fn from(fraction: ClaimFraction) -> Self {
        fraction.0
    }
}

impl fmt::Display for ClaimFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 10_000;
        let rest = self.0 % 10_000;
        if rest == 0 {
            write!(f, "{}%", whole)
        } else {
            write!(f, "{}.{:04}%", whole, rest)
        }
    }
}
