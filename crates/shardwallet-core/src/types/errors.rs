use crate::errors::ShardwalletError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Address '{input}' must start with 0x")]
    MissingPrefix { input: String },

    #[error("Address '{input}' must have 40 hex digits, got {len}")]
    InvalidLength { input: String, len: usize },

    #[error("Address '{input}' contains non-hex characters")]
    InvalidHex { input: String },

    #[error("Address '{input}' has an invalid EIP-55 checksum")]
    InvalidChecksum { input: String },
}

impl ShardwalletError for AddressError {
    fn error_code(&self) -> &'static str {
        match self {
            AddressError::MissingPrefix { .. } => "ADDRESS_MISSING_PREFIX",
            AddressError::InvalidLength { .. } => "ADDRESS_INVALID_LENGTH",
            AddressError::InvalidHex { .. } => "ADDRESS_INVALID_HEX",
            AddressError::InvalidChecksum { .. } => "ADDRESS_INVALID_CHECKSUM",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShardIdError {
    #[error("Shard id cannot be empty")]
    Empty,

    #[error("Shard id '{input}' is not a decimal integer")]
    NotDecimal { input: String },

    #[error("Shard id '{input}' does not fit in 256 bits")]
    Overflow { input: String },
}

impl ShardwalletError for ShardIdError {
    fn error_code(&self) -> &'static str {
        match self {
            ShardIdError::Empty => "SHARD_ID_EMPTY",
            ShardIdError::NotDecimal { .. } => "SHARD_ID_NOT_DECIMAL",
            ShardIdError::Overflow { .. } => "SHARD_ID_OVERFLOW",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FractionError {
    #[error("Claim fraction {micros} is out of range (0..=1000000 parts per million)")]
    MicrosOutOfRange { micros: u64 },

    #[error("Claim percentage {percent} is out of range (0..=100)")]
    PercentOutOfRange { percent: u64 },
}

impl ShardwalletError for FractionError {
    fn error_code(&self) -> &'static str {
        match self {
            FractionError::MicrosOutOfRange { .. } => "FRACTION_OUT_OF_RANGE",
            FractionError::PercentOutOfRange { .. } => "PERCENT_OUT_OF_RANGE",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
