use primitive_types::U256;
use serde::Serialize;

use crate::chain::ChainError;
use crate::types::{Address, Currency, ShardId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyBalance {
    pub currency: Address,
    #[serde(with = "crate::types::decimal")]
    pub amount: U256,
}

/// Claimable amounts of one shard, one entry per configured currency.
///
/// Only ever built complete: a dry-run result that does not cover every
/// currency is rejected rather than stored partially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalancesSnapshot {
    shard: ShardId,
    entries: Vec<CurrencyBalance>,
}

impl BalancesSnapshot {
    pub fn from_amounts(
        shard: ShardId,
        currencies: &[Currency],
        amounts: Vec<U256>,
    ) -> Result<Self, ChainError> {
        if amounts.len() != currencies.len() {
            return Err(ChainError::InvalidResponse {
                method: "claim",
                message: format!(
                    "expected {} amounts, got {}",
                    currencies.len(),
                    amounts.len()
                ),
            });
        }
        let entries = currencies
            .iter()
            .zip(amounts)
            .map(|(c, amount)| CurrencyBalance {
                currency: c.address,
                amount,
            })
            .collect();
        Ok(Self { shard, entries })
    }

    pub fn shard(&self) -> ShardId {
        self.shard
    }

    pub fn get(&self, currency: &Address) -> Option<U256> {
        self.entries
            .iter()
            .find(|e| e.currency == *currency)
            .map(|e| e.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurrencyBalance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CURRENCIES, ETH, WETH};

    #[test]
    fn test_snapshot_covers_every_currency() {
        let snapshot = BalancesSnapshot::from_amounts(
            ShardId::from(1u64),
            CURRENCIES,
            vec![U256::from(5), U256::from(7)],
        )
        .unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(&ETH.address), Some(U256::from(5)));
        assert_eq!(snapshot.get(&WETH.address), Some(U256::from(7)));
        assert_eq!(snapshot.get(&Address::new([9; 20])), None);
    }

    #[test]
    fn test_partial_result_rejected() {
        let err = BalancesSnapshot::from_amounts(
            ShardId::from(1u64),
            CURRENCIES,
            vec![U256::from(5)],
        )
        .unwrap_err();
        assert!(matches!(err, ChainError::InvalidResponse { method: "claim", .. }));
    }

    #[test]
    fn test_serializes_amounts_as_decimal() {
        let snapshot = BalancesSnapshot::from_amounts(
            ShardId::from(4u64),
            &CURRENCIES[..1],
            vec![U256::exp10(18)],
        )
        .unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["shard"], "4");
        assert_eq!(json["entries"][0]["amount"], "1000000000000000000");
    }
}
