//! Chart renderer: one horizontal bar chart per slot, disposed before every redraw

use super::{
    format::{color_palette, format_currency, with_alpha, DEFAULT_FRACTION_DIGITS, FILL_ALPHA},
    target::{ids, ChartBackend, ChartHandle},
};
use coinlore_data::{CoinRecord, ExchangeRecord, Numeric};
use tracing::{debug, warn};

/// Bar border width
pub const BORDER_WIDTH: f64 = 1.5;

/// Singly occupied chart region of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    CoinsByPrice,
    ExchangesByVolume,
}

impl ChartSlot {
    pub fn canvas_id(&self) -> &'static str {
        match self {
            ChartSlot::CoinsByPrice => ids::CHART_COINS,
            ChartSlot::ExchangesByVolume => ids::CHART_EXCHANGES,
        }
    }

    pub fn dataset_label(&self) -> &'static str {
        match self {
            ChartSlot::CoinsByPrice => "Price (USD)",
            ChartSlot::ExchangesByVolume => "Volume (USD)",
        }
    }

    /// Fraction digits of the value axis tick labels
    pub fn tick_fraction_digits(&self) -> usize {
        match self {
            ChartSlot::CoinsByPrice => 0,
            ChartSlot::ExchangesByVolume => DEFAULT_FRACTION_DIGITS,
        }
    }
}

/// Record that can be plotted as one bar
pub trait Chartable {
    const SLOT: ChartSlot;

    fn chart_label(&self) -> &str;

    fn chart_value(&self) -> Numeric;
}

impl Chartable for CoinRecord {
    const SLOT: ChartSlot = ChartSlot::CoinsByPrice;

    fn chart_label(&self) -> &str {
        &self.symbol
    }

    fn chart_value(&self) -> Numeric {
        self.price_usd
    }
}

impl Chartable for ExchangeRecord {
    const SLOT: ChartSlot = ChartSlot::ExchangesByVolume;

    fn chart_label(&self) -> &str {
        &self.name
    }

    fn chart_value(&self) -> Numeric {
        self.volume_usd
    }
}

/// Everything a [`ChartBackend`] needs to draw one bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub dataset_label: String,
    pub labels: Vec<String>,
    /// `None` for records without a usable value; drawn as an empty bar
    pub values: Vec<Option<f64>>,
    /// "#rrggbbaa", palette colour with [`FILL_ALPHA`]
    pub fill_colors: Vec<String>,
    /// "#rrggbb", solid palette colour
    pub border_colors: Vec<String>,
    pub border_width: f64,
    /// Bars grow along the x axis
    pub horizontal: bool,
    pub tick_fraction_digits: usize,
}

impl BarChartSpec {
    pub fn build<'a, R>(records: impl IntoIterator<Item = &'a R>) -> Self
    where
        R: Chartable + 'a,
    {
        let (labels, values): (Vec<String>, Vec<Option<f64>>) = records
            .into_iter()
            .map(|record| (record.chart_label().to_string(), record.chart_value().value()))
            .unzip();

        let colors = color_palette(labels.len());

        Self {
            dataset_label: R::SLOT.dataset_label().to_string(),
            labels,
            values,
            fill_colors: colors
                .iter()
                .map(|color| with_alpha(color, FILL_ALPHA))
                .collect(),
            border_colors: colors.iter().map(|color| color.to_string()).collect(),
            border_width: BORDER_WIDTH,
            horizontal: true,
            tick_fraction_digits: R::SLOT.tick_fraction_digits(),
        }
    }

    /// Value axis tick label
    pub fn format_tick(&self, value: f64) -> String {
        format_currency(Some(value), self.tick_fraction_digits)
    }

    /// Largest plotted value, 0.0 if there is none
    pub fn max_value(&self) -> f64 {
        self.values.iter().flatten().copied().fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Owner of the live chart in each [`ChartSlot`]
#[derive(Debug, Default)]
pub struct ChartRenderer {
    coins_by_price: Option<ChartHandle>,
    exchanges_by_volume: Option<ChartHandle>,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw the slot of `R` with `records`
    ///
    /// Any chart already in the slot is destroyed before its replacement is created, so a slot
    /// never holds two live charts. Returns `false` if the backend has no canvas for the slot.
    pub fn render<'a, R, B>(&mut self, records: impl IntoIterator<Item = &'a R>, backend: &mut B) -> bool
    where
        R: Chartable + 'a,
        B: ChartBackend + ?Sized,
    {
        let slot = R::SLOT;

        if let Some(previous) = self.slot_mut(slot).take() {
            debug!(?slot, handle = previous.id(), "disposing previous chart");
            backend.destroy_chart(previous);
        }

        let spec = BarChartSpec::build(records);
        let handle = backend.create_chart(slot.canvas_id(), spec);
        if handle.is_none() {
            warn!(?slot, canvas = slot.canvas_id(), "chart canvas missing, skipping render");
        }

        let created = handle.is_some();
        *self.slot_mut(slot) = handle;
        created
    }

    pub fn is_occupied(&self, slot: ChartSlot) -> bool {
        self.slot(slot).is_some()
    }

    fn slot(&self, slot: ChartSlot) -> &Option<ChartHandle> {
        match slot {
            ChartSlot::CoinsByPrice => &self.coins_by_price,
            ChartSlot::ExchangesByVolume => &self.exchanges_by_volume,
        }
    }

    fn slot_mut(&mut self, slot: ChartSlot) -> &mut Option<ChartHandle> {
        match slot {
            ChartSlot::CoinsByPrice => &mut self.coins_by_price,
            ChartSlot::ExchangesByVolume => &mut self.exchanges_by_volume,
        }
    }
}
