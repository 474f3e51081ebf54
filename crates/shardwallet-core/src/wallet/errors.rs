use crate::errors::ShardwalletError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("No wallet available")]
    NoWallet,

    #[error("User rejected the connection request")]
    Rejected,

    #[error("Wallet request failed: {message}")]
    Backend { message: String },
}

impl ShardwalletError for WalletError {
    fn error_code(&self) -> &'static str {
        match self {
            WalletError::NoWallet => "WALLET_NOT_FOUND",
            WalletError::Rejected => "WALLET_REJECTED",
            WalletError::Backend { .. } => "WALLET_BACKEND_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WalletError::NoWallet | WalletError::Rejected)
    }
}
