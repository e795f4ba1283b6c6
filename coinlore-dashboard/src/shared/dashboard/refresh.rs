use crate::shared::{
    aggregation::DerivedViews,
    chart::ChartRenderer,
    format::{format_currency, DEFAULT_FRACTION_DIGITS},
    search::SearchController,
    table::render_table,
    target::{ids, ChartBackend, RenderTarget, StatDisplay},
};
use chrono::{DateTime, Utc};
use coinlore_data::{CoinRecord, ExchangeRecord, FetchError, MarketFetcher};
use std::sync::Arc;
use tracing::{error, info};

/// Refresh cycle state machine: Idle → Loading → {Success, Failed} → Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// Both collections of one refresh cycle, replaced wholesale each cycle
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    pub coins: Arc<[CoinRecord]>,
    pub exchanges: Arc<[ExchangeRecord]>,
}

/// How the last completed refresh cycle ended
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Success { coins: usize, exchanges: usize },
    Failed(FetchError),
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RefreshOutcome::Success { .. })
    }
}

/// Fetch the coin ticker list and the exchange market list concurrently
///
/// Either failure fails the whole fetch; nothing is returned until both have completed.
pub async fn fetch_market_data<F>(fetcher: &F) -> Result<MarketData, FetchError>
where
    F: MarketFetcher + ?Sized,
{
    let (coins, exchanges) = futures::try_join!(fetcher.fetch_coins(), fetcher.fetch_exchanges())?;

    Ok(MarketData {
        coins: Arc::from(coins),
        exchanges: Arc::from(exchanges),
    })
}

/// Text of the failure banner for `error`
pub fn failure_banner(error: &FetchError) -> String {
    if error.is_transient() {
        format!("Refresh failed: {error} (temporary, reload to retry)")
    } else {
        format!("Refresh failed: {error}")
    }
}

/// Refresh orchestrator
///
/// Owns everything that outlives one refresh cycle: the live chart handles, the search bindings
/// (and through them the displayed dataset snapshot) and the refresh state. The page itself is
/// passed in to every operation.
///
/// Cycles are expected to run one at a time; overlapping cycles are applied in completion order
/// with no further coordination.
#[derive(Debug)]
pub struct Dashboard {
    state: RefreshState,
    charts: ChartRenderer,
    coin_search: SearchController<CoinRecord>,
    exchange_search: SearchController<ExchangeRecord>,
    last_refreshed: Option<DateTime<Utc>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            state: RefreshState::Idle,
            charts: ChartRenderer::new(),
            coin_search: SearchController::new(ids::SEARCH_COIN, ids::COIN_TABLE),
            exchange_search: SearchController::new(ids::SEARCH_EXCHANGE, ids::EXCHANGE_TABLE),
            last_refreshed: None,
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == RefreshState::Loading
    }

    /// Time of the last successful refresh
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    /// Coins currently bound to the coin search, ie/ the displayed snapshot
    pub fn coins(&self) -> Option<&Arc<[CoinRecord]>> {
        self.coin_search.dataset()
    }

    pub fn exchanges(&self) -> Option<&Arc<[ExchangeRecord]>> {
        self.exchange_search.dataset()
    }

    /// Idle → Loading: show both loading indicators
    pub fn begin_refresh<P>(&mut self, page: &mut P)
    where
        P: RenderTarget + ?Sized,
    {
        self.state = RefreshState::Loading;
        page.set_loading(ids::SPIN_COINS, true);
        page.set_loading(ids::SPIN_EXCHANGES, true);
    }

    /// Loading → {Success, Failed} → Idle: apply the result of a fetch
    ///
    /// On success every derived view is recomputed and rendered, then both searches are rebound
    /// to the new collections. On failure the error is logged and shown in the status banner,
    /// and nothing else on the page is touched. The loading indicators are hidden either way.
    pub fn complete_refresh<P>(
        &mut self,
        result: Result<MarketData, FetchError>,
        page: &mut P,
    ) -> RefreshOutcome
    where
        P: RenderTarget + ChartBackend + ?Sized,
    {
        let outcome = match result {
            Ok(data) => {
                self.state = RefreshState::Success;
                self.apply(data, page)
            }
            Err(error) => {
                self.state = RefreshState::Failed;
                error!(%error, transient = error.is_transient(), "market data refresh failed");
                page.set_banner(ids::STATUS_BANNER, Some(failure_banner(&error)));
                RefreshOutcome::Failed(error)
            }
        };

        page.set_loading(ids::SPIN_COINS, false);
        page.set_loading(ids::SPIN_EXCHANGES, false);
        self.state = RefreshState::Idle;
        outcome
    }

    /// Run one full refresh cycle against `fetcher`
    pub async fn refresh<F, P>(&mut self, fetcher: &F, page: &mut P) -> RefreshOutcome
    where
        F: MarketFetcher + ?Sized,
        P: RenderTarget + ChartBackend + ?Sized,
    {
        self.begin_refresh(page);
        let result = fetch_market_data(fetcher).await;
        self.complete_refresh(result, page)
    }

    /// Route a keystroke in search input `input_id` to its controller
    ///
    /// Returns `false` for unknown inputs, before the first successful refresh, or if the target
    /// table is missing.
    pub fn handle_search<P>(&self, input_id: &str, query: &str, page: &mut P) -> bool
    where
        P: RenderTarget + ?Sized,
    {
        match input_id {
            ids::SEARCH_COIN => self.coin_search.on_input(query, page),
            ids::SEARCH_EXCHANGE => self.exchange_search.on_input(query, page),
            _ => false,
        }
    }

    fn apply<P>(&mut self, data: MarketData, page: &mut P) -> RefreshOutcome
    where
        P: RenderTarget + ChartBackend + ?Sized,
    {
        let views = DerivedViews::compute(&data.coins, &data.exchanges);

        page.set_stat(
            ids::TOTAL_EXCHANGES,
            StatDisplay::new(views.total_exchange_count.to_string()),
        );
        page.set_stat(
            ids::AVG_PRICE,
            StatDisplay::new(format_currency(
                Some(views.average_coin_price),
                DEFAULT_FRACTION_DIGITS,
            )),
        );
        let top = &views.most_expensive_coin;
        page.set_stat(
            ids::MOST_EXPENSIVE_COIN,
            StatDisplay::new(format_currency(top.price_usd.value(), DEFAULT_FRACTION_DIGITS))
                .with_caption(format!("({} / {})", top.name, top.symbol)),
        );

        self.charts
            .render(views.top_coins_by_price.iter().copied(), page);
        self.charts
            .render(views.top_exchanges_by_volume.iter().copied(), page);

        render_table(data.coins.iter(), ids::COIN_TABLE, page);
        render_table(data.exchanges.iter(), ids::EXCHANGE_TABLE, page);

        self.coin_search.rebind(Arc::clone(&data.coins));
        self.exchange_search.rebind(Arc::clone(&data.exchanges));

        page.set_banner(ids::STATUS_BANNER, None);
        self.last_refreshed = Some(Utc::now());

        info!(
            coins = data.coins.len(),
            exchanges = data.exchanges.len(),
            average_price = views.average_coin_price,
            most_expensive = %top.name,
            "market data refreshed"
        );

        RefreshOutcome::Success {
            coins: data.coins.len(),
            exchanges: data.exchanges.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::page::Page;
    use async_trait::async_trait;

    struct Fixed {
        coins: Result<Vec<CoinRecord>, FetchError>,
        exchanges: Result<Vec<ExchangeRecord>, FetchError>,
    }

    #[async_trait]
    impl MarketFetcher for Fixed {
        async fn fetch_coins(&self) -> Result<Vec<CoinRecord>, FetchError> {
            self.coins.clone()
        }

        async fn fetch_exchanges(&self) -> Result<Vec<ExchangeRecord>, FetchError> {
            self.exchanges.clone()
        }
    }

    fn status(code: u16) -> FetchError {
        FetchError::Status {
            url: "https://api.coinlore.net/api/tickers/".to_string(),
            status: code,
        }
    }

    #[tokio::test]
    async fn test_fetch_market_data_requires_both() {
        let fetcher = Fixed {
            coins: Ok(vec![CoinRecord::new("Bitcoin", "BTC", 1.0)]),
            exchanges: Err(status(503)),
        };

        assert_eq!(fetch_market_data(&fetcher).await, Err(status(503)));
    }

    #[test]
    fn test_failure_banner() {
        assert_eq!(
            failure_banner(&status(404)),
            "Refresh failed: HTTP error from https://api.coinlore.net/api/tickers/: 404"
        );
        assert!(failure_banner(&status(500)).ends_with("(temporary, reload to retry)"));
    }

    #[test]
    fn test_begin_refresh_shows_spinners() {
        let mut dashboard = Dashboard::new();
        let mut page = Page::standard();

        dashboard.begin_refresh(&mut page);

        assert!(dashboard.is_loading());
        assert_eq!(page.spinner_visible(ids::SPIN_COINS), Some(true));
        assert_eq!(page.spinner_visible(ids::SPIN_EXCHANGES), Some(true));
    }

    #[test]
    fn test_complete_refresh_on_partial_page() {
        let mut dashboard = Dashboard::new();
        let mut page = Page::with_elements([ids::COIN_TABLE, ids::SPIN_COINS]);
        let data = MarketData {
            coins: Arc::from(vec![CoinRecord::new("Bitcoin", "BTC", 50000.0)]),
            exchanges: Arc::from(Vec::new()),
        };

        dashboard.begin_refresh(&mut page);
        let outcome = dashboard.complete_refresh(Ok(data), &mut page);

        assert_eq!(outcome, RefreshOutcome::Success { coins: 1, exchanges: 0 });
        assert_eq!(dashboard.state(), RefreshState::Idle);
        assert_eq!(page.rows(ids::COIN_TABLE).map(|rows| rows.len()), Some(1));
        assert_eq!(page.spinner_visible(ids::SPIN_COINS), Some(false));
        assert_eq!(page.live_chart_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_search_routes_by_input() {
        let fetcher = Fixed {
            coins: Ok(vec![
                CoinRecord::new("Bitcoin", "BTC", 50000.0),
                CoinRecord::new("Ether", "ETH", 3000.0),
            ]),
            exchanges: Ok(vec![ExchangeRecord::new("ExA", 100.0).with_pair("BTC/USD")]),
        };
        let mut dashboard = Dashboard::new();
        let mut page = Page::standard();

        assert!(!dashboard.handle_search(ids::SEARCH_COIN, "eth", &mut page));

        dashboard.refresh(&fetcher, &mut page).await;

        assert!(dashboard.handle_search(ids::SEARCH_COIN, "eth", &mut page));
        assert!(dashboard.handle_search(ids::SEARCH_EXCHANGE, "nomatch", &mut page));
        assert!(!dashboard.handle_search("search-unknown", "eth", &mut page));

        assert_eq!(page.rows(ids::COIN_TABLE).map(|rows| rows.len()), Some(1));
        assert_eq!(page.rows(ids::EXCHANGE_TABLE).map(|rows| rows.len()), Some(0));
    }
}
