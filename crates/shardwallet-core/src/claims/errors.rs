use crate::chain::{ChainError, TxHash};
use crate::errors::ShardwalletError;
use crate::types::FractionError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("A claim is already in progress")]
    AlreadyClaiming,

    #[error("Wallet is not connected")]
    Disconnected,

    #[error("No shard selected")]
    NoShardSelected,

    #[error("Invalid claim fraction: {source}")]
    Fraction {
        #[from]
        source: FractionError,
    },

    #[error("Claim transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },

    #[error("Claim failed: {source}")]
    Chain {
        #[from]
        source: ChainError,
    },
}

impl ShardwalletError for ClaimError {
    fn error_code(&self) -> &'static str {
        match self {
            ClaimError::AlreadyClaiming => "CLAIM_IN_PROGRESS",
            ClaimError::Disconnected => "CLAIM_DISCONNECTED",
            ClaimError::NoShardSelected => "CLAIM_NO_SHARD",
            ClaimError::Fraction { .. } => "CLAIM_INVALID_FRACTION",
            ClaimError::Reverted { .. } => "CLAIM_REVERTED",
            ClaimError::Chain { .. } => "CLAIM_CHAIN_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ClaimError::AlreadyClaiming
                | ClaimError::Disconnected
                | ClaimError::NoShardSelected
                | ClaimError::Fraction { .. }
        )
    }
}
