//! Chain primitives shared by every component.

pub mod address;
pub mod currency;
pub mod decimal;
pub mod errors;
pub mod fraction;
pub mod shard;

pub use address::Address;
pub use currency::{CURRENCIES, Currency, ETH, WETH, currency_addresses, currency_by_address};
pub use errors::{AddressError, FractionError, ShardIdError};
pub use fraction::ClaimFraction;
pub use shard::ShardId;
