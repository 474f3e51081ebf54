//! Balance formatting and USD conversion.
//!
//! All arithmetic stays in integers; a float never touches a balance.

pub mod operations;
pub mod types;

pub use operations::{
    claim_preview, convert_balance, format_units, format_usd, price_description, priced_total,
    to_display_minor_units, unit_price,
};
pub use types::Conversion;
