use primitive_types::{U256, U512};

use crate::claims::BalancesSnapshot;
use crate::display::types::Conversion;
use crate::price::PriceSnapshot;
use crate::types::{ClaimFraction, Currency, ETH};

/// Largest `n` with `10^n` representable in a U256.
const MAX_U256_EXP10: usize = 77;

/// `floor(balance * rate * 100 / 10^(price_decimals + asset_decimals))`.
///
/// The product is taken in 512 bits so realistic balances never overflow.
/// Returns `None` when the result does not fit back into 256 bits.
pub fn to_display_minor_units(
    balance: U256,
    asset_decimals: u8,
    price: &PriceSnapshot,
) -> Option<U256> {
    let exponent = u32::from(price.decimals) + u32::from(asset_decimals);
    let numerator = balance.full_mul(price.rate).checked_mul(U512::from(100u8))?;
    // A divisor past 512 bits exceeds every numerator.
    let Some(denominator) = U512::from(10u8).checked_pow(U512::from(exponent)) else {
        return Some(U256::zero());
    };
    U256::try_from(numerator / denominator).ok()
}

pub fn convert_balance(
    balance: U256,
    currency: &Currency,
    price: Option<&PriceSnapshot>,
) -> Conversion {
    if !currency.priced_like_reference {
        return Conversion::NotPriced;
    }
    let Some(price) = price else {
        return Conversion::Unavailable;
    };
    match to_display_minor_units(balance, currency.decimals, price) {
        Some(cents) => Conversion::Usd(cents),
        None => Conversion::Unavailable,
    }
}

/// `$1234.56`, no grouping separators.
pub fn format_usd(cents: U256) -> String {
    let hundred = U256::from(100u8);
    format!("${}.{:02}", cents / hundred, (cents % hundred).low_u64())
}

/// Render a raw amount with `decimals` fractional digits.
///
/// Trailing fractional zeros are trimmed down to a single digit, so one
/// ether prints as `1.0`. With zero decimals no point is printed.
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let (whole, remainder) = if usize::from(decimals) > MAX_U256_EXP10 {
        (U256::zero(), value)
    } else {
        let multiplier = U256::exp10(usize::from(decimals));
        (value / multiplier, value % multiplier)
    };
    let fraction = format!(
        "{:0>width$}",
        remainder.to_string(),
        width = usize::from(decimals)
    );
    let trimmed = fraction.trim_end_matches('0');
    let fraction = if trimmed.is_empty() { "0" } else { trimmed };
    format!("{}.{}", whole, fraction)
}

/// Sum of the balances whose currency is priced by the ETH/USD feed.
pub fn priced_total(balances: &BalancesSnapshot, currencies: &[Currency]) -> U256 {
    balances
        .iter()
        .filter(|entry| {
            currencies
                .iter()
                .any(|c| c.address == entry.currency && c.priced_like_reference)
        })
        .fold(U256::zero(), |acc, entry| acc.saturating_add(entry.amount))
}

/// USD value of claiming `fraction` of every priced balance.
pub fn claim_preview(
    balances: &BalancesSnapshot,
    currencies: &[Currency],
    fraction: ClaimFraction,
    price: Option<&PriceSnapshot>,
) -> Conversion {
    let claimed = fraction.apply(priced_total(balances, currencies));
    convert_balance(claimed, &ETH, price)
}

/// USD value of one whole ether.
pub fn unit_price(price: &PriceSnapshot) -> Conversion {
    convert_balance(U256::exp10(ETH.decimals as usize), &ETH, Some(price))
}

/// Tooltip-style description of the reading used for conversions.
pub fn price_description(price: &PriceSnapshot) -> String {
    format!(
        "Conversions using ETH price of {} as of {}.",
        unit_price(price),
        price.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::types::{Address, CURRENCIES, ShardId, WETH};

    const USDC: Currency = Currency {
        name: "USDC",
        address: Address::from_hex_const("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        decimals: 6,
        priced_like_reference: false,
    };

    fn eth_at_2000() -> PriceSnapshot {
        PriceSnapshot {
            rate: U256::from(200_000_000_000u64),
            decimals: 8,
            updated_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn test_one_ether_at_2000_dollars() {
        let cents = to_display_minor_units(ether(1), 18, &eth_at_2000()).unwrap();
        assert_eq!(cents, U256::from(200_000u64));
        assert_eq!(format_usd(cents), "$2000.00");
        assert_eq!(
            convert_balance(ether(1), &ETH, Some(&eth_at_2000())).to_string(),
            "$2000.00"
        );
    }

    #[test]
    fn test_conversion_floors_sub_cent_values() {
        // 1 wei is worth far less than a cent.
        assert_eq!(
            to_display_minor_units(U256::one(), 18, &eth_at_2000()),
            Some(U256::zero())
        );
        // 0.123456 ETH * 2000 = 246.912 USD
        let balance = U256::from(123_456u64) * U256::exp10(12);
        assert_eq!(
            to_display_minor_units(balance, 18, &eth_at_2000()),
            Some(U256::from(24_691u64))
        );
    }

    #[test]
    fn test_huge_balance_does_not_overflow() {
        let balance = U256::MAX / U256::from(1_000_000u64);
        let cents = to_display_minor_units(balance, 18, &eth_at_2000());
        assert!(cents.is_some());
    }

    #[test]
    fn test_missing_price_is_unavailable() {
        for currency in CURRENCIES {
            assert_eq!(
                convert_balance(ether(1), currency, None),
                Conversion::Unavailable
            );
        }
        assert_eq!(Conversion::Unavailable.to_string(), "unavailable");
    }

    #[test]
    fn test_unpriced_currency_never_converts() {
        assert_eq!(
            convert_balance(U256::from(5_000_000u64), &USDC, Some(&eth_at_2000())),
            Conversion::NotPriced
        );
        assert_eq!(
            convert_balance(U256::from(5_000_000u64), &USDC, None),
            Conversion::NotPriced
        );
        assert_eq!(Conversion::NotPriced.cents(), None);
    }

    #[test]
    fn test_format_usd_pads_cents() {
        assert_eq!(format_usd(U256::from(5u64)), "$0.05");
        assert_eq!(format_usd(U256::from(123_410u64)), "$1234.10");
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(ether(1), 18), "1.0");
        assert_eq!(format_units(U256::from(1_500_000_000_000_000_000u128), 18), "1.5");
        assert_eq!(format_units(U256::one(), 18), "0.000000000000000001");
        assert_eq!(format_units(U256::zero(), 18), "0.0");
        assert_eq!(format_units(U256::from(1_234_500u64), 6), "1.2345");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_format_units_beyond_u256_precision() {
        assert_eq!(
            format_units(U256::from(5u64), 80),
            format!("0.{}5", "0".repeat(79))
        );
        let digits = U256::MAX.to_string();
        assert_eq!(
            format_units(U256::MAX, 255),
            format!("0.{}{}", "0".repeat(255 - digits.len()), digits)
        );
        assert_eq!(format_units(U256::zero(), 200), "0.0");
    }

    #[test]
    fn test_extreme_precision_floors_to_zero() {
        let price = PriceSnapshot {
            rate: U256::one(),
            decimals: 255,
            updated_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        assert_eq!(
            to_display_minor_units(U256::one(), 255, &price),
            Some(U256::zero())
        );
        assert_eq!(
            convert_balance(U256::MAX, &Currency { decimals: 255, ..ETH }, Some(&price)),
            Conversion::Usd(U256::zero())
        );
    }

    #[test]
    fn test_claim_preview_scales_by_fraction() {
        let balances = BalancesSnapshot::from_amounts(
            ShardId::from(1u64),
            &[ETH],
            vec![ether(2)],
        )
        .unwrap();
        let half = ClaimFraction::from_micros(500_000).unwrap();

        assert_eq!(half.apply(priced_total(&balances, &[ETH])), ether(1));
        assert_eq!(
            claim_preview(&balances, &[ETH], half, Some(&eth_at_2000())).to_string(),
            "$2000.00"
        );
        assert_eq!(
            claim_preview(&balances, &[ETH], half, None),
            Conversion::Unavailable
        );
    }

    #[test]
    fn test_priced_total_skips_unpriced_currencies() {
        let currencies = [ETH, WETH, USDC];
        let balances = BalancesSnapshot::from_amounts(
            ShardId::from(1u64),
            &currencies,
            vec![ether(1), ether(2), U256::from(7_000_000u64)],
        )
        .unwrap();
        assert_eq!(priced_total(&balances, &currencies), ether(3));
    }

    #[test]
    fn test_unit_price() {
        assert_eq!(unit_price(&eth_at_2000()).cents(), Some(U256::from(200_000u64)));
    }

    #[test]
    fn test_price_description() {
        assert_eq!(
            price_description(&eth_at_2000()),
            "Conversions using ETH price of $2000.00 as of 2023-11-14 22:13:20 UTC."
        );
    }
}
