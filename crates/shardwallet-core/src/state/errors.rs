use crate::errors::ShardwalletError;
use crate::types::ShardId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Shard {shard} is not owned by the connected account")]
    ShardNotOwned { shard: ShardId },
}

impl ShardwalletError for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            StoreError::ShardNotOwned { .. } => "SHARD_NOT_OWNED",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
