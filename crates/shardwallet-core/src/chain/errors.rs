use crate::errors::ShardwalletError;
use crate::types::Address;

use super::types::TxHash;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("RPC call '{method}' failed: {message}")]
    Rpc {
        method: &'static str,
        message: String,
    },

    #[error("Call '{method}' reverted: {reason}")]
    Reverted {
        method: &'static str,
        reason: String,
    },

    #[error("Invalid response from '{method}': {message}")]
    InvalidResponse {
        method: &'static str,
        message: String,
    },

    #[error("No contract deployed at {address}")]
    UnknownContract { address: Address },

    #[error("Transaction {hash} not found")]
    TransactionNotFound { hash: TxHash },
}

impl ShardwalletError for ChainError {
    fn error_code(&self) -> &'static str {
        match self {
            ChainError::Rpc { .. } => "CHAIN_RPC_FAILED",
            ChainError::Reverted { .. } => "CHAIN_CALL_REVERTED",
            ChainError::InvalidResponse { .. } => "CHAIN_INVALID_RESPONSE",
            ChainError::UnknownContract { .. } => "CHAIN_UNKNOWN_CONTRACT",
            ChainError::TransactionNotFound { .. } => "CHAIN_TX_NOT_FOUND",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ChainError::Reverted { .. } | ChainError::UnknownContract { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Failed to read chain fixture '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse chain fixture '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ShardwalletError for FixtureError {
    fn error_code(&self) -> &'static str {
        match self {
            FixtureError::Io { .. } => "FIXTURE_IO_ERROR",
            FixtureError::Parse { .. } => "FIXTURE_PARSE_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, FixtureError::Parse { .. })
    }
}
