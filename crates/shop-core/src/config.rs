//! Shop settings
//!
//! Settings are read from an optional TOML file and overlaid with
//! `SHOP__*` environment variables, e.g. `SHOP__DATABASE__PATH` or
//! `SHOP__CURRENCIES=EUR,USD`.

use crate::error::{Result, ShopError};
use crate::validation;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file used when none is given explicitly
pub const DEFAULT_CONFIG_PATH: &str = "config/shop.toml";

const ENV_PREFIX: &str = "SHOP";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    /// Currencies the shop sells in, in display order
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
    /// Falls back to the first entry of `currencies`
    #[serde(default)]
    pub default_currency: Option<String>,
    #[serde(default = "default_true")]
    pub price_includes_tax: bool,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Lifetime of cached price sets; entries live until flushed when unset
    #[serde(default)]
    pub price_ttl_secs: Option<u64>,
}

fn default_currencies() -> Vec<String> {
    ["CHF", "EUR", "USD", "CAD"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_db_path() -> String {
    "data/shop.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            currencies: default_currencies(),
            default_currency: None,
            price_includes_tax: true,
            database: DatabaseSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl ShopSettings {
    /// Load settings from `path` (or the default location) plus environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, env_source())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let required = path != Path::new(DEFAULT_CONFIG_PATH);

        let settings: ShopSettings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text, without consulting the environment
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings: ShopSettings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Currency used when a caller does not ask for one
    pub fn default_currency(&self) -> &str {
        self.default_currency
            .as_deref()
            .or_else(|| self.currencies.first().map(String::as_str))
            .unwrap_or_default()
    }

    pub fn is_known_currency(&self, currency: &str) -> bool {
        self.currencies.iter().any(|c| c == currency)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currencies.is_empty() {
            return Err(ShopError::Config(
                "at least one currency must be configured".to_string(),
            ));
        }

        for currency in &self.currencies {
            validation::validate_currency_code(currency)
                .map_err(|e| ShopError::Config(e.to_string()))?;
        }

        if let Some(ref default) = self.default_currency {
            if !self.is_known_currency(default) {
                return Err(ShopError::Config(format!(
                    "default currency {} is not one of the configured currencies",
                    default
                )));
            }
        }

        if self.database.max_connections == 0 {
            return Err(ShopError::Config(
                "database.max_connections must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("currencies")
        .try_parsing(true)
}
