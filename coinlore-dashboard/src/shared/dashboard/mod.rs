//! Coinlore dashboard: refresh orchestration, configuration and terminal rendering
pub mod config;
pub mod refresh;
pub mod widget;

pub use config::DashboardConfig;
pub use refresh::{fetch_market_data, Dashboard, MarketData, RefreshOutcome, RefreshState};
pub use widget::{render_dashboard, SearchFocus, UiState};
