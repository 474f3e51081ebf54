use serde::Serialize;

use super::address::Address;

/// A currency a shardwallet can hold and pay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub name: &'static str,
    /// Token contract, or the zero address for native ether.
    pub address: Address,
    pub decimals: u8,
    /// Whether the ETH/USD feed prices this currency one-to-one.
    pub priced_like_reference: bool,
}

pub const ETH: Currency = Currency {
    name: "ETH",
    address: Address::ZERO,
    decimals: 18,
    priced_like_reference: true,
};

pub const WETH: Currency = Currency {
    name: "WETH",
    address: Address::from_hex_const("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
    decimals: 18,
    priced_like_reference: true,
};

/// Every currency claimed and previewed, in contract argument order.
pub const CURRENCIES: &[Currency] = &[ETH, WETH];

pub fn currency_by_address(address: &Address) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.address == *address)
}

pub fn currency_addresses(currencies: &[Currency]) -> Vec<Address> {
    currencies.iter().map(|c| c.address).collect()
}
