/// Coinlore Dashboard - Shared Library
///
/// Everything behind the `coinlore-dashboard` terminal binary:
/// - Formatting utilities and aggregation functions over fetched market data
/// - Table, chart and search renderers writing to an abstract render target
/// - The refresh orchestrator tying fetch, aggregation and rendering together
/// - An in-memory page plus the ratatui widgets that draw it
pub mod shared;

// Re-export commonly used types for convenience
pub use shared::aggregation::{
    average_price, count_all, most_expensive, top_coins_by_price, top_exchanges_by_volume,
    DerivedViews, TOP_N,
};

pub use shared::chart::{BarChartSpec, ChartRenderer, ChartSlot, Chartable};
pub use shared::format::{color_palette, format_currency, format_usd};
pub use shared::page::Page;
pub use shared::search::{filter_records, SearchController, Searchable};
pub use shared::table::{render_table, table_rows, Cell, CellTone, TableRow, Tabular};
pub use shared::target::{ids, ChartBackend, ChartHandle, RenderTarget, StatDisplay};

// Refresh orchestration and terminal front end
pub use shared::dashboard::{
    fetch_market_data, render_dashboard, Dashboard, DashboardConfig, MarketData,
    RefreshOutcome, RefreshState, SearchFocus, UiState,
};
