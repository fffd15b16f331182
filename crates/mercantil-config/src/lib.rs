//! Configuration loading for the Mercantil console.
//! Reads mercantil.toml from the current directory or the path in MERCANTIL_CONFIG,
//! then applies environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub const CONFIG_PATH_ENV: &str = "MERCANTIL_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "mercantil.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_bind()       -> String { "127.0.0.1:3001".to_string() }
fn default_static_dir() -> String { "static".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), static_dir: default_static_dir() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// The business API usually runs on a self-signed dev certificate.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_base_url()     -> String { "https://localhost:7177".to_string() }
fn default_timeout_secs() -> u64    { 30 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_page_size()       -> usize  { 10 }
fn default_tax_rate()        -> f64    { 0.16 }
fn default_currency_symbol() -> String { "$".to_string() }

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            tax_rate: default_tax_rate(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Report embed URL of the third-party analytics service.
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(default = "default_analytics_title")]
    pub title: String,
}

fn default_analytics_title() -> String { "Analytics".to_string() }

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self { embed_url: None, title: default_analytics_title() }
    }
}


impl Config {
    /// Load configuration: `.env`, then the TOML file (missing file means
    /// defaults), then `MERCANTIL_*` environment overrides.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }

        let path = std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            info!(%path, "Reading configuration");
            Self::from_file(Path::new(&path))?
        } else {
            info!(%path, "No configuration file, using defaults");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse { path: display, source })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `MERCANTIL_API_URL`, `MERCANTIL_BIND` and `MERCANTIL_ANALYTICS_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MERCANTIL_API_URL") {
            self.api.base_url = url;
        }
        if let Some(bind) = lookup("MERCANTIL_BIND") {
            self.server.bind = bind;
        }
        if let Some(url) = lookup("MERCANTIL_ANALYTICS_URL") {
            self.analytics.embed_url = Some(url).filter(|u| !u.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api.base_url).map_err(|e| ConfigError::Invalid {
            key: "api.base_url".to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "api.base_url".to_string(),
                reason: format!("unsupported scheme {}", base.scheme()),
            });
        }
        if self.console.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "console.page_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.console.tax_rate) {
            return Err(ConfigError::Invalid {
                key: "console.tax_rate".to_string(),
                reason: "must be a fraction between 0 and 1".to_string(),
            });
        }
        Ok(())
    }
}
