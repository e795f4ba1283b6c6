//! Render target and chart library seams
//!
//! The dashboard never touches a terminal directly. Renderers write to a [`RenderTarget`]
//! addressed by element id, and charts are created and disposed through a [`ChartBackend`].
//! An id the target does not know is a silent no-op reported by a `false` return.

use super::{chart::BarChartSpec, table::TableRow};

/// Element identifiers of the dashboard page
pub mod ids {
    pub const SPIN_COINS: &str = "spin-coins";
    pub const SPIN_EXCHANGES: &str = "spin-exchanges";

    pub const CHART_COINS: &str = "chart-coins";
    pub const CHART_EXCHANGES: &str = "chart-exchanges";

    pub const COIN_TABLE: &str = "coin-table";
    pub const EXCHANGE_TABLE: &str = "exchange-table";

    pub const SEARCH_COIN: &str = "search-coin";
    pub const SEARCH_EXCHANGE: &str = "search-exchange";

    pub const TOTAL_EXCHANGES: &str = "total-exchanges";
    pub const AVG_PRICE: &str = "avg-price";
    pub const MOST_EXPENSIVE_COIN: &str = "most-expensive-coin";

    pub const STATUS_BANNER: &str = "status-banner";
}

/// Scalar stat shown in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatDisplay {
    pub value: String,
    pub caption: Option<String>,
}

impl StatDisplay {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Page elements the renderers write to
pub trait RenderTarget {
    /// Show or hide a loading indicator
    fn set_loading(&mut self, id: &str, visible: bool) -> bool;

    /// Replace every row of a table body
    fn replace_rows(&mut self, id: &str, rows: Vec<TableRow>) -> bool;

    /// Set a scalar stat display
    fn set_stat(&mut self, id: &str, stat: StatDisplay) -> bool;

    /// Show (`Some`) or clear (`None`) a status banner
    fn set_banner(&mut self, id: &str, message: Option<String>) -> bool;
}

/// Live chart instance owned by whoever created it
///
/// Not `Clone`: a handle is disposed of exactly once via [`ChartBackend::destroy_chart`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ChartHandle(u64);

impl ChartHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Charting capability: draws a bar chart into a canvas and tears it down again
pub trait ChartBackend {
    /// Create a chart in `canvas_id`, returning `None` if the canvas does not exist
    fn create_chart(&mut self, canvas_id: &str, spec: BarChartSpec) -> Option<ChartHandle>;

    /// Dispose of a chart and release its canvas
    fn destroy_chart(&mut self, handle: ChartHandle);
}
