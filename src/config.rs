//! Runtime settings, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working configuration:
//!
//! ```toml
//! channel_buffer = 32
//! accepted_payment_methods = ["cod"]
//!
//! [pricing]
//! shipping_fee = 5.99
//! tax_rate = 0.10
//!
//! [pagination]
//! default_limit = 10
//! max_limit = 100
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use crate::domain::PaymentMethod;

/// Environment variable naming the config file read by [`AppConfig::from_env`].
pub const CONFIG_ENV_VAR: &str = "ORDER_LIFECYCLE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub shipping_fee: f64,
    /// Fraction of the subtotal, e.g. `0.10` for 10%.
    pub tax_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { shipping_fee: 5.99, tax_rate: 0.10 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { default_limit: 10, max_limit: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Mailbox size of every actor.
    pub channel_buffer: usize,
    pub pricing: PricingConfig,
    pub pagination: PaginationConfig,
    pub accepted_payment_methods: Vec<PaymentMethod>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            pricing: PricingConfig::default(),
            pagination: PaginationConfig::default(),
            accepted_payment_methods: vec![PaymentMethod::Cod],
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Loads the file named by `ORDER_LIFECYCLE_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => {
                debug!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn accepts(&self, method: PaymentMethod) -> bool {
        self.accepted_payment_methods.contains(&method)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid("channel_buffer must be positive".to_string()));
        }
        if !(self.pricing.shipping_fee >= 0.0 && self.pricing.shipping_fee.is_finite()) {
            return Err(ConfigError::Invalid("pricing.shipping_fee must be non-negative".to_string()));
        }
        if !(0.0..=1.0).contains(&self.pricing.tax_rate) {
            return Err(ConfigError::Invalid("pricing.tax_rate must be between 0 and 1".to_string()));
        }
        let pagination = &self.pagination;
        if pagination.default_limit == 0 || pagination.default_limit > pagination.max_limit {
            return Err(ConfigError::Invalid(
                "pagination.default_limit must be between 1 and max_limit".to_string(),
            ));
        }
        if self.accepted_payment_methods.is_empty() {
            return Err(ConfigError::Invalid("accepted_payment_methods must not be empty".to_string()));
        }
        Ok(())
    }
}
