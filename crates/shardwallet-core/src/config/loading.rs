//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.shardwallet/config.toml`
//! 3. **Project config** - `./.shardwallet/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::types::{ContractConfig, OracleConfig, ShardwalletConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

const CONFIG_DIR: &str = ".shardwallet";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed, or
/// if validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<ShardwalletConfig, ConfigError> {
    let mut config = ShardwalletConfig::default();

    for path in [user_config_path(), project_config_path()]
        .into_iter()
        .flatten()
    {
        match load_config_file(&path) {
            Ok(file_config) => config = merge_configs(config, file_config),
            Err(ConfigError::ConfigNotFound { .. }) => {
                debug!(event = "core.config.file_skipped", path = %path.display());
            }
            Err(e) => return Err(e),
        }
    }

    validate_config(&config)?;

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load a single configuration file.
pub fn load_config_file(path: &Path) -> Result<ShardwalletConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::ConfigNotFound {
            path: path.display().to_string(),
        },
        _ => ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        },
    })?;
    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.message().to_string(),
    })?;
    debug!(event = "core.config.file_loaded", path = %path.display());
    Ok(config)
}

/// Merge two configurations, with `override_config` taking precedence for
/// every value it sets.
pub fn merge_configs(base: ShardwalletConfig, override_config: ShardwalletConfig) -> ShardwalletConfig {
    ShardwalletConfig {
        shardwallet: ContractConfig {
            address: override_config
                .shardwallet
                .address
                .or(base.shardwallet.address),
        },
        oracle: OracleConfig {
            address: override_config.oracle.address.or(base.oracle.address),
            max_age_secs: override_config
                .oracle
                .max_age_secs
                .or(base.oracle.max_age_secs),
        },
    }
}
