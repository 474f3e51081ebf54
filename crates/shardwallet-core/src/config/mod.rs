//! # Configuration System
//!
//! Hierarchical TOML configuration. See [`loading`] for the order in which
//! sources are applied.
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use shardwallet_core::config::ShardwalletConfig;
//!
//! fn example() -> Result<(), shardwallet_core::errors::ConfigError> {
//!     let config = ShardwalletConfig::load_hierarchy()?;
//!     println!("{}", config.shardwallet_address());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use defaults::{DEFAULT_MAX_PRICE_AGE_SECS, DEFAULT_ORACLE_ADDRESS, DEFAULT_SHARDWALLET_ADDRESS};
pub use loading::{load_config_file, merge_configs};
pub use types::{ContractConfig, OracleConfig, ShardwalletConfig};
pub use validation::validate_config;

impl ShardwalletConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
