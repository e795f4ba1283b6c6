use coinlore_data::{client::DEFAULT_BASE_URL, client::DEFAULT_MARKET_COIN_ID, ClientConfig};
use std::{path::PathBuf, time::Duration};
use tracing::warn;

pub const ENV_API_URL: &str = "COINLORE_API_URL";
pub const ENV_MARKET_ID: &str = "COINLORE_MARKET_ID";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_TICK_MS: &str = "DASHBOARD_TICK_MS";
pub const ENV_LOG_FILE: &str = "DASHBOARD_LOG";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TICK_MS: u64 = 250;
pub const DEFAULT_LOG_FILE: &str = "coinlore-dashboard.log";

/// Startup configuration of the dashboard binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_url: String,
    pub market_coin_id: u64,
    pub http_timeout: Duration,
    /// UI poll and redraw interval
    pub tick: Duration,
    pub log_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            market_coin_id: DEFAULT_MARKET_COIN_ID,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl DashboardConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults for missing, blank or
    /// unparsable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let number = |key: &str, default: u64| match text(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(key, value = %raw, default, "ignoring invalid numeric setting");
                default
            }),
        };

        Self {
            api_url: text(ENV_API_URL).unwrap_or(defaults.api_url),
            market_coin_id: number(ENV_MARKET_ID, defaults.market_coin_id),
            http_timeout: Duration::from_secs(number(ENV_HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS)),
            tick: Duration::from_millis(number(ENV_TICK_MS, DEFAULT_TICK_MS).max(1)),
            log_file: text(ENV_LOG_FILE)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }

    /// Client settings for the Coinlore REST API
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone())
            .with_market_coin_id(self.market_coin_id)
            .with_timeout(self.http_timeout)
    }
}
