use std::error::Error;

/// Implemented by every error enum in the crate.
pub trait ShardwalletError: Error + Send + Sync + 'static {
    /// Stable code for logs and scripts, e.g. `CHAIN_CALL_REVERTED`.
    fn error_code(&self) -> &'static str;

    /// Caused by input or chain state rather than a fault; logged as a warning.
    fn is_user_error(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found at '{path}'")]
    ConfigNotFound { path: String },

    #[error("Failed to parse config file '{path}': {message}")]
    ConfigParseError { path: String, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ShardwalletError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigParseError { .. } | ConfigError::InvalidConfiguration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration() {
        let error = ConfigError::InvalidConfiguration {
            message: "oracle.max_age_secs must be greater than 0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration: oracle.max_age_secs must be greater than 0"
        );
        assert_eq!(error.error_code(), "INVALID_CONFIGURATION");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let error = ConfigError::ConfigParseError {
            path: ".shardwallet/config.toml".to_string(),
            message: "expected `=`".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse config file '.shardwallet/config.toml': expected `=`"
        );
        assert!(error.is_user_error());
    }

    #[test]
    fn test_io_error_is_a_fault() {
        let error = ConfigError::IoError {
            path: "/etc/config.toml".to_string(),
            source: std::io::Error::other("permission denied"),
        };
        assert_eq!(error.error_code(), "CONFIG_IO_ERROR");
        assert!(!error.is_user_error());
        assert!(error.source().is_some());
    }
}
