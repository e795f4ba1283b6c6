use crate::{
    error::FetchError,
    model::{CoinRecord, ExchangeRecord, TickerList},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default Coinlore REST base.
pub const DEFAULT_BASE_URL: &str = "https://api.coinlore.net/api/";

/// Coinlore id of Bitcoin, whose market list is shown as the exchange table by default.
pub const DEFAULT_MARKET_COIN_ID: u64 = 90;

/// Async source of the two collections a dashboard refresh needs.
///
/// Implementations may fail with a network, status or decode [`FetchError`].
#[async_trait]
pub trait MarketFetcher: Send + Sync {
    /// Fetch the coin ticker list.
    async fn fetch_coins(&self) -> Result<Vec<CoinRecord>, FetchError>;

    /// Fetch the exchange market list for the configured coin.
    async fn fetch_exchanges(&self) -> Result<Vec<ExchangeRecord>, FetchError>;
}

/// [`CoinloreClient`] configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// REST base URL, eg/ "https://api.coinlore.net/api/"
    pub base_url: String,
    /// Coin whose market list is fetched as the exchange collection
    pub market_coin_id: u64,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            market_coin_id: DEFAULT_MARKET_COIN_ID,
            timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with custom base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set market coin id
    pub fn with_market_coin_id(mut self, coin_id: u64) -> Self {
        self.market_coin_id = coin_id;
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `<base>tickers/`
    pub fn tickers_url(&self) -> Result<Url, FetchError> {
        self.base()?
            .join("tickers/")
            .map_err(|error| self.invalid_url(error))
    }

    /// `<base>coin/markets/?id=<market_coin_id>`
    pub fn markets_url(&self) -> Result<Url, FetchError> {
        let mut url = self
            .base()?
            .join("coin/markets/")
            .map_err(|error| self.invalid_url(error))?;
        url.query_pairs_mut()
            .append_pair("id", &self.market_coin_id.to_string());
        Ok(url)
    }

    fn base(&self) -> Result<Url, FetchError> {
        // Url::join replaces the last path segment unless the base ends with '/'
        let base = if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        };

        let url = Url::parse(&base).map_err(|error| self.invalid_url(error))?;
        if url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: self.base_url.clone(),
                reason: "cannot be used as a base".to_string(),
            });
        }
        Ok(url)
    }

    fn invalid_url(&self, error: url::ParseError) -> FetchError {
        FetchError::InvalidUrl {
            url: self.base_url.clone(),
            reason: error.to_string(),
        }
    }
}

/// `reqwest` based [`MarketFetcher`] for the public Coinlore API.
#[derive(Debug, Clone)]
pub struct CoinloreClient {
    http: reqwest::Client,
    tickers_url: Url,
    markets_url: Url,
}

impl CoinloreClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| FetchError::Client(error.to_string()))?;

        Ok(Self {
            http,
            tickers_url: config.tickers_url()?,
            markets_url: config.markets_url()?,
        })
    }

    pub fn tickers_url(&self) -> &Url {
        &self.tickers_url
    }

    pub fn markets_url(&self) -> &Url {
        &self.markets_url
    }

    async fn get_json<T>(&self, url: &Url) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "sending GET request");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|error| FetchError::Transport {
                url: url.to_string(),
                reason: error.to_string(),
            })?;

        check_status(url, response.status())?;

        let body = response
            .bytes()
            .await
            .map_err(|error| FetchError::Transport {
                url: url.to_string(),
                reason: error.to_string(),
            })?;

        decode(url, &body)
    }
}

#[async_trait]
impl MarketFetcher for CoinloreClient {
    async fn fetch_coins(&self) -> Result<Vec<CoinRecord>, FetchError> {
        let tickers = self.get_json::<TickerList>(&self.tickers_url).await?;
        info!(
            coins = tickers.data.len(),
            coins_tracked = ?tickers.info.as_ref().and_then(|info| info.coins_num),
            "fetched coin tickers"
        );
        Ok(tickers.data)
    }

    async fn fetch_exchanges(&self) -> Result<Vec<ExchangeRecord>, FetchError> {
        let exchanges = self
            .get_json::<Vec<ExchangeRecord>>(&self.markets_url)
            .await?;
        info!(exchanges = exchanges.len(), "fetched exchange markets");
        Ok(exchanges)
    }
}

/// Reject any non-2xx response before its body is decoded.
fn check_status(url: &Url, status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Decode a response body, attributing failures to the originating url.
fn decode<T>(url: &Url, body: &[u8]) -> Result<T, FetchError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|error| FetchError::Decode {
        url: url.to_string(),
        reason: error.to_string(),
    })
}
