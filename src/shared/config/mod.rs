//! Application configuration module
//!
//! Provides the configuration shared by the sync client and its hosts:
//! where the store lives, how often to poll and how long the quiet period
//! before a push lasts.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Default store URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
/// Default presence poll period
pub const DEFAULT_PRESENCE_INTERVAL_MS: u64 = 1_000;
/// Default document poll period
pub const DEFAULT_DOCUMENT_INTERVAL_MS: u64 = 2_000;
/// Default debounce quiet period
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// How the document poller treats a fetched document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Load every fetched document into the editor
    Always,
    /// Skip the load when the fetched text equals the last text known to be in sync
    #[default]
    SkipUnchanged,
}

impl FromStr for ReconcilePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "skip_unchanged" | "skip-unchanged" => Ok(Self::SkipUnchanged),
            other => Err(ConfigError::InvalidValue {
                field: "reconcile",
                value: other.to_string(),
            }),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Store URL
    pub server_url: Option<String>,
    /// Presence poll period in milliseconds
    pub presence_interval_ms: u64,
    /// Document poll period in milliseconds
    pub document_interval_ms: u64,
    /// Debounce quiet period in milliseconds
    pub debounce_ms: u64,
    /// Reconciliation policy of the document poller
    pub reconcile: ReconcilePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            presence_interval_ms: DEFAULT_PRESENCE_INTERVAL_MS,
            document_interval_ms: DEFAULT_DOCUMENT_INTERVAL_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            reconcile: ReconcilePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    ///
    /// The document poll must be coarser than the debounce window, otherwise a
    /// poll can land between every local edit and its push.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.presence_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("presence_interval_ms"));
        }
        if self.document_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("document_interval_ms"));
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::ZeroInterval("debounce_ms"));
        }
        if self.document_interval_ms <= self.debounce_ms {
            return Err(ConfigError::PollFinerThanDebounce {
                document_interval_ms: self.document_interval_ms,
                debounce_ms: self.debounce_ms,
            });
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    presence_interval_ms: Option<u64>,
    document_interval_ms: Option<u64>,
    debounce_ms: Option<u64>,
    reconcile: Option<ReconcilePolicy>,
}

impl AppConfigBuilder {
    /// Set the store URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn presence_interval_ms(mut self, ms: u64) -> Self {
        self.presence_interval_ms = Some(ms);
        self
    }

    pub fn document_interval_ms(mut self, ms: u64) -> Self {
        self.document_interval_ms = Some(ms);
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = Some(ms);
        self
    }

    pub fn reconcile(mut self, policy: ReconcilePolicy) -> Self {
        self.reconcile = Some(policy);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self.server_url.map(|url| url.trim_end_matches('/').to_string()),
            presence_interval_ms: self
                .presence_interval_ms
                .unwrap_or(defaults.presence_interval_ms),
            document_interval_ms: self
                .document_interval_ms
                .unwrap_or(defaults.document_interval_ms),
            debounce_ms: self.debounce_ms.unwrap_or(defaults.debounce_ms),
            reconcile: self.reconcile.unwrap_or(defaults.reconcile),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("document poll ({document_interval_ms} ms) must be coarser than the debounce window ({debounce_ms} ms)")]
    PollFinerThanDebounce {
        document_interval_ms: u64,
        debounce_ms: u64,
    },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
