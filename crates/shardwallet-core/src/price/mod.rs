//! ETH/USD price feed reader.

pub mod operations;
pub mod types;

pub use operations::fetch_price;
pub use types::PriceSnapshot;
