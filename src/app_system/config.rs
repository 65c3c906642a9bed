use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::domain::StockPolicy;
use crate::storage::DEFAULT_STORAGE_KEY;

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "cart.toml";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Runtime settings of the cart.
///
/// Sources, later ones winning: built-in defaults, the TOML file, then
/// `CART_`-prefixed environment variables (e.g. `CART_API_BASE_URL`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Base URL of the catalog/stock service.
    pub api_base_url: Url,
    /// JSON file backing the local key-value store.
    pub storage_path: PathBuf,
    /// Key under which the cart snapshot is stored.
    pub storage_key: String,
    pub stock_policy: StockPolicy,
    /// Capacity of the cart service request channel.
    pub channel_buffer: usize,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid"),
            storage_path: PathBuf::from(".rocketshoes/storage.json"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            stock_policy: StockPolicy::default(),
            channel_buffer: 32,
        }
    }
}

impl CartConfig {
    /// Loads from [`DEFAULT_CONFIG_FILE`] and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Loads from a TOML file and the environment. A missing file is skipped.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("CART_"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid {
                field: "channel_buffer",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(CartConfig::default()))
    }
}
