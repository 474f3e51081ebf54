//! Wallet connection state.
//!
//! A [`WalletSession`] turns wallet notifications (connect, account change,
//! chain change, disconnect) into a single watched [`WalletState`].

pub mod errors;
pub mod memory;
pub mod session;
pub mod types;

pub use errors::WalletError;
pub use memory::MemoryWallet;
pub use session::WalletSession;
pub use types::{ProviderHandle, WalletBackend, WalletState};
