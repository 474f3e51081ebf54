//! Claim preview (dry-run) and claim execution against a shardwallet.

pub mod errors;
pub mod operations;
pub mod types;

pub use errors::ClaimError;
pub use operations::{claim_call, confirm_claim, preview_claim, submit_claim};
pub use types::{BalancesSnapshot, CurrencyBalance};
