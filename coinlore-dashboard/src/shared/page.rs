//! In-memory dashboard page: the element store the renderers write to and the TUI draws from

use super::{
    chart::BarChartSpec,
    table::TableRow,
    target::{ids, ChartBackend, ChartHandle, RenderTarget, StatDisplay},
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
enum Element {
    Spinner { visible: bool },
    Canvas { chart: Option<u64> },
    TableBody { rows: Vec<TableRow> },
    Stat { stat: Option<StatDisplay> },
    Banner { message: Option<String> },
    Input { value: String },
}

impl Element {
    /// Element kind implied by the id naming convention of [`ids`]
    fn for_id(id: &str) -> Self {
        if id.starts_with("spin-") {
            Element::Spinner { visible: false }
        } else if id.starts_with("chart-") {
            Element::Canvas { chart: None }
        } else if id.ends_with("-table") {
            Element::TableBody { rows: Vec::new() }
        } else if id.starts_with("search-") {
            Element::Input {
                value: String::new(),
            }
        } else if id.ends_with("-banner") {
            Element::Banner { message: None }
        } else {
            Element::Stat { stat: None }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LiveChart {
    canvas_id: String,
    spec: BarChartSpec,
}

/// Dashboard page model
///
/// Implements [`RenderTarget`] and [`ChartBackend`]. Writes to ids the page does not contain, or
/// to an element of a different kind, are rejected with `false`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    elements: HashMap<String, Element>,
    charts: HashMap<u64, LiveChart>,
    next_chart_id: u64,
}

impl Page {
    /// Page with every element of the dashboard layout
    pub fn standard() -> Self {
        Self::with_elements([
            ids::SPIN_COINS,
            ids::SPIN_EXCHANGES,
            ids::CHART_COINS,
            ids::CHART_EXCHANGES,
            ids::COIN_TABLE,
            ids::EXCHANGE_TABLE,
            ids::SEARCH_COIN,
            ids::SEARCH_EXCHANGE,
            ids::TOTAL_EXCHANGES,
            ids::AVG_PRICE,
            ids::MOST_EXPENSIVE_COIN,
            ids::STATUS_BANNER,
        ])
    }

    /// Page containing only `element_ids`
    pub fn with_elements<'a>(element_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            elements: element_ids
                .into_iter()
                .map(|id| (id.to_string(), Element::for_id(id)))
                .collect(),
            ..Self::default()
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn rows(&self, id: &str) -> Option<&[TableRow]> {
        match self.elements.get(id)? {
            Element::TableBody { rows } => Some(rows),
            _ => None,
        }
    }

    pub fn spinner_visible(&self, id: &str) -> Option<bool> {
        match self.elements.get(id)? {
            Element::Spinner { visible } => Some(*visible),
            _ => None,
        }
    }

    pub fn stat(&self, id: &str) -> Option<&StatDisplay> {
        match self.elements.get(id)? {
            Element::Stat { stat } => stat.as_ref(),
            _ => None,
        }
    }

    pub fn banner(&self, id: &str) -> Option<&str> {
        match self.elements.get(id)? {
            Element::Banner { message } => message.as_deref(),
            _ => None,
        }
    }

    /// Spec of the chart currently drawn in `canvas_id`
    pub fn chart(&self, canvas_id: &str) -> Option<&BarChartSpec> {
        match self.elements.get(canvas_id)? {
            Element::Canvas { chart: Some(id) } => self.charts.get(id).map(|live| &live.spec),
            _ => None,
        }
    }

    /// Charts created and not yet destroyed, across every canvas
    pub fn live_chart_count(&self) -> usize {
        self.charts.len()
    }

    pub fn input_value(&self, id: &str) -> Option<&str> {
        match self.elements.get(id)? {
            Element::Input { value } => Some(value),
            _ => None,
        }
    }

    /// Append a typed character to an input, returning its new value
    pub fn input_push(&mut self, id: &str, ch: char) -> Option<&str> {
        match self.elements.get_mut(id)? {
            Element::Input { value } => {
                value.push(ch);
                Some(value)
            }
            _ => None,
        }
    }

    /// Delete the last character of an input, returning its new value
    pub fn input_pop(&mut self, id: &str) -> Option<&str> {
        match self.elements.get_mut(id)? {
            Element::Input { value } => {
                value.pop();
                Some(value)
            }
            _ => None,
        }
    }
}

impl RenderTarget for Page {
    fn set_loading(&mut self, id: &str, visible: bool) -> bool {
        match self.elements.get_mut(id) {
            Some(Element::Spinner { visible: current }) => {
                *current = visible;
                true
            }
            _ => false,
        }
    }

    fn replace_rows(&mut self, id: &str, rows: Vec<TableRow>) -> bool {
        match self.elements.get_mut(id) {
            Some(Element::TableBody { rows: current }) => {
                *current = rows;
                true
            }
            _ => false,
        }
    }

    fn set_stat(&mut self, id: &str, stat: StatDisplay) -> bool {
        match self.elements.get_mut(id) {
            Some(Element::Stat { stat: current }) => {
                *current = Some(stat);
                true
            }
            _ => false,
        }
    }

    fn set_banner(&mut self, id: &str, message: Option<String>) -> bool {
        match self.elements.get_mut(id) {
            Some(Element::Banner { message: current }) => {
                *current = message;
                true
            }
            _ => false,
        }
    }
}

impl ChartBackend for Page {
    fn create_chart(&mut self, canvas_id: &str, spec: BarChartSpec) -> Option<ChartHandle> {
        let Some(Element::Canvas { chart }) = self.elements.get_mut(canvas_id) else {
            return None;
        };

        // A canvas draws one chart; anything still attached is released first
        let id = self.next_chart_id;
        self.next_chart_id += 1;
        if let Some(stale) = chart.replace(id) {
            self.charts.remove(&stale);
        }

        self.charts.insert(
            id,
            LiveChart {
                canvas_id: canvas_id.to_string(),
                spec,
            },
        );
        Some(ChartHandle::new(id))
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        let Some(live) = self.charts.remove(&handle.id()) else {
            return;
        };

        if let Some(Element::Canvas { chart }) = self.elements.get_mut(&live.canvas_id) {
            if *chart == Some(handle.id()) {
                *chart = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinlore_data::CoinRecord;

    #[test]
    fn test_element_kind_from_id() {
        let page = Page::standard();

        assert_eq!(page.spinner_visible(ids::SPIN_COINS), Some(false));
        assert_eq!(page.rows(ids::EXCHANGE_TABLE), Some(&[][..]));
        assert_eq!(page.input_value(ids::SEARCH_EXCHANGE), Some(""));
        assert_eq!(page.stat(ids::AVG_PRICE), None);
        assert_eq!(page.banner(ids::STATUS_BANNER), None);
        assert!(page.contains(ids::MOST_EXPENSIVE_COIN));
    }

    #[test]
    fn test_writes_to_unknown_or_mismatched_ids_are_rejected() {
        let mut page = Page::with_elements([ids::COIN_TABLE]);
        let no_coins: Vec<CoinRecord> = Vec::new();

        assert!(!page.set_loading(ids::SPIN_COINS, true));
        assert!(!page.set_stat(ids::COIN_TABLE, StatDisplay::new("1")));
        assert!(!page.set_banner("missing", Some("boom".to_string())));
        assert!(page
            .create_chart(ids::COIN_TABLE, BarChartSpec::build(&no_coins))
            .is_none());
        assert!(page.replace_rows(ids::COIN_TABLE, Vec::new()));
    }

    #[test]
    fn test_create_and_destroy_chart() {
        let mut page = Page::standard();
        let coins = vec![CoinRecord::new("Bitcoin", "BTC", 1.0)];
        let spec = BarChartSpec::build(&coins);

        let handle = page.create_chart(ids::CHART_COINS, spec.clone()).unwrap();
        assert_eq!(page.live_chart_count(), 1);
        assert_eq!(page.chart(ids::CHART_COINS), Some(&spec));

        page.destroy_chart(handle);
        assert_eq!(page.live_chart_count(), 0);
        assert_eq!(page.chart(ids::CHART_COINS), None);
    }

    #[test]
    fn test_input_editing() {
        let mut page = Page::standard();

        assert_eq!(page.input_push(ids::SEARCH_COIN, 'b'), Some("b"));
        assert_eq!(page.input_push(ids::SEARCH_COIN, 't'), Some("bt"));
        assert_eq!(page.input_pop(ids::SEARCH_COIN), Some("b"));
        assert_eq!(page.input_pop(ids::COIN_TABLE), None);
    }
}
