use crate::core::convert::ConversionMode;
use crate::core::error::ConverterError;
use crate::core::options::DEFAULT_PREFERRED_CURRENCIES;
use crate::core::render::TableScope;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AccessKeyConfig {
    /// Environment variable holding the key.
    pub env: String,
    /// Query parameter the key is sent as.
    #[serde(default = "default_access_key_param")]
    pub param: String,
}

fn default_access_key_param() -> String {
    "access_key".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Query parameter carrying the base currency. When unset the base is
    /// appended to `base_url` as a path segment.
    #[serde(default)]
    pub base_param: Option<String>,
    #[serde(default)]
    pub access_key: Option<AccessKeyConfig>,
    #[serde(default)]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            base_param: None,
            access_key: None,
            retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: None,
        }
    }
}

impl ProviderConfig {
    /// Resolves the configured access key from the process environment.
    pub fn resolve_access_key(&self) -> Result<Option<(String, String)>, ConverterError> {
        self.resolve_access_key_with(|name| std::env::var(name).ok())
    }

    /// Resolves the access key through `lookup`, returning the query
    /// parameter name and the key. A configured key that resolves to nothing
    /// is an error so that no unauthenticated request is ever sent.
    pub fn resolve_access_key_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<(String, String)>, ConverterError> {
        let Some(access_key) = &self.access_key else {
            return Ok(None);
        };

        match lookup(&access_key.env).filter(|key| !key.trim().is_empty()) {
            Some(key) => Ok(Some((access_key.param.clone(), key.trim().to_string()))),
            None => Err(ConverterError::Configuration(format!(
                "access key environment variable {} is not set",
                access_key.env
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_currency")]
    pub base_currency: String,
    /// Currency rates are quoted against in cross-rate mode.
    #[serde(default = "default_currency")]
    pub reference_currency: String,
    #[serde(default)]
    pub mode: ConversionMode,
    #[serde(default)]
    pub scope: TableScope,
    #[serde(default = "default_preferred_currencies")]
    pub preferred_currencies: Vec<String>,
    /// Currencies shown initially.
    #[serde(default = "default_preferred_currencies")]
    pub currencies: Vec<String>,
    #[serde(default = "default_amount")]
    pub amount: f64,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_preferred_currencies() -> Vec<String> {
    DEFAULT_PREFERRED_CURRENCIES
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_amount() -> f64 {
    1.0
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            base_currency: default_currency(),
            reference_currency: default_currency(),
            mode: ConversionMode::default(),
            scope: TableScope::default(),
            preferred_currencies: default_preferred_currencies(),
            currencies: default_preferred_currencies(),
            amount: default_amount(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxtable", "fxtable")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
