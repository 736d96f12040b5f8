//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Auth headers sent with every claim request
    #[serde(alias = "binance")]
    pub credentials: BTreeMap<String, String>,

    /// The watched public channel
    #[serde(alias = "telegram")]
    pub channel: ChannelConfig,

    /// Poll timing and cooldown settings
    #[serde(default)]
    pub poller: PollerConfig,

    /// HTTP client and endpoint settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a JSON (or `.toml`) file.
    ///
    /// A missing or malformed file is a configuration error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::config(format!(
                "Configuration file '{}' not found",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| AppError::config(format!("{}: {e}", path.display())))?,
            _ => serde_json::from_str(&content)
                .map_err(|e| AppError::config(format!("{}: {e}", path.display())))?,
        };
        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.credentials.is_empty() {
            return Err(AppError::validation("credentials are empty"));
        }
        if self.channel.channel_id.trim().is_empty() {
            return Err(AppError::validation("channel.channel_id is empty"));
        }
        if self.poller.interval_ms == 0 {
            return Err(AppError::validation("poller.interval_ms must be > 0"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        url::Url::parse(&self.http.channel_base_url).map_err(|e| {
            AppError::validation(format!("http.channel_base_url is invalid: {e}"))
        })?;
        url::Url::parse(&self.http.claim_url)
            .map_err(|e| AppError::validation(format!("http.claim_url is invalid: {e}")))?;
        Ok(())
    }
}

/// The public channel whose latest message is watched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub channel_id: String,
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Time between cycle starts in milliseconds
    #[serde(default = "defaults::interval_ms")]
    pub interval_ms: u64,

    /// Added to every cooldown the service announces
    #[serde(default = "defaults::cooldown_margin_secs")]
    pub cooldown_margin_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: defaults::interval_ms(),
            cooldown_margin_secs: defaults::cooldown_margin_secs(),
        }
    }
}

/// HTTP client and endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds, applied to fetch and claim calls
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Origin of the public channel preview pages
    #[serde(default = "defaults::channel_base_url")]
    pub channel_base_url: String,

    /// Redeem endpoint
    #[serde(default = "defaults::claim_url")]
    pub claim_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            channel_base_url: defaults::channel_base_url(),
            claim_url: defaults::claim_url(),
        }
    }
}

mod defaults {
    pub fn interval_ms() -> u64 {
        1000
    }
    pub fn cooldown_margin_secs() -> u64 {
        60
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn channel_base_url() -> String {
        "https://t.me".into()
    }
    pub fn claim_url() -> String {
        "https://www.binance.com/bapi/pay/v1/private/binance-pay/gift-box/code/grabV2".into()
    }
}
