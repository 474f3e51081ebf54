use crate::config::types::ShardwalletConfig;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidConfiguration`] when `oracle.max_age_secs`
/// is zero or either address is the zero address.
pub fn validate_config(config: &ShardwalletConfig) -> Result<(), ConfigError> {
    if config.oracle.max_age_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "oracle.max_age_secs must be greater than 0".to_string(),
        });
    }

    if config.shardwallet_address().is_zero() {
        return Err(ConfigError::InvalidConfiguration {
            message: "shardwallet.address must not be the zero address".to_string(),
        });
    }

    if config.oracle_address().is_zero() {
        return Err(ConfigError::InvalidConfiguration {
            message: "oracle.address must not be the zero address".to_string(),
        });
    }

    Ok(())
}
