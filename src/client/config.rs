use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::client::sync::SyncConfig;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError, DEFAULT_SERVER_URL};

/// Default timeout of a single store request
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Client configuration file layout
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    #[serde(flatten)]
    sync: AppConfig,
    request_timeout_ms: Option<u64>,
}

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid sync environment: {}", e);
            Self {
                app: AppConfig::default(),
                request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            }
        })
    }
}

fn env_u64(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { field: name, value }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Create a new configuration from the environment, falling back to defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `CLIENT_API_URL`, `SYNC_PRESENCE_INTERVAL_MS`,
    /// `SYNC_DOCUMENT_INTERVAL_MS`, `SYNC_DEBOUNCE_MS`, `SYNC_RECONCILE` and
    /// `SYNC_REQUEST_TIMEOUT_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder().server_url(
            std::env::var("CLIENT_API_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
        );
        if let Some(ms) = env_u64("SYNC_PRESENCE_INTERVAL_MS")? {
            builder = builder.presence_interval_ms(ms);
        }
        if let Some(ms) = env_u64("SYNC_DOCUMENT_INTERVAL_MS")? {
            builder = builder.document_interval_ms(ms);
        }
        if let Some(ms) = env_u64("SYNC_DEBOUNCE_MS")? {
            builder = builder.debounce_ms(ms);
        }
        if let Ok(policy) = std::env::var("SYNC_RECONCILE") {
            builder = builder.reconcile(policy.parse()?);
        }
        let timeout_ms = env_u64("SYNC_REQUEST_TIMEOUT_MS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

        let mut config = Self::with_builder(builder)?;
        config.request_timeout = Duration::from_millis(timeout_ms);
        Ok(config)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self {
            app,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        })
    }

    /// Parse a TOML configuration document
    ///
    /// ```toml
    /// server_url = "http://127.0.0.1:3000"
    /// debounce_ms = 500
    /// reconcile = "always"
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let FileConfig {
            sync,
            request_timeout_ms,
        } = toml::from_str(text)?;
        if request_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroInterval("request_timeout_ms"));
        }

        let mut builder = AppConfig::builder()
            .presence_interval_ms(sync.presence_interval_ms)
            .document_interval_ms(sync.document_interval_ms)
            .debounce_ms(sync.debounce_ms)
            .reconcile(sync.reconcile);
        if let Some(url) = sync.server_url {
            builder = builder.server_url(url);
        }

        let mut config = Self::with_builder(builder)?;
        config.request_timeout =
            Duration::from_millis(request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS));
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Get the full URL for a store endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Timing and policy of the sync engine
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::from(&self.app)
    }
}
