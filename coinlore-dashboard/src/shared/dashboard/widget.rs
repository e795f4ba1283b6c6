//! Ratatui rendering of the dashboard [`Page`]

use super::refresh::Dashboard;
use crate::shared::{
    chart::{BarChartSpec, ChartSlot},
    format::parse_hex_color,
    page::Page,
    table::{CellTone, Tabular, TableRow},
    target::ids,
};
use chrono::Local;
use coinlore_data::{CoinRecord, ExchangeRecord};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

const C_BACKGROUND: (u8, u8, u8) = (16, 16, 24);
const C_POSITIVE: Color = Color::Rgb(100, 220, 100);
const C_NEGATIVE: Color = Color::Rgb(220, 100, 100);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);
const C_HEADER: Color = Color::Yellow;

/// Bar lengths are scaled into this many units before drawing
const BAR_RESOLUTION: u64 = 1_000;

/// Search input holding keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFocus {
    #[default]
    Coins,
    Exchanges,
}

impl SearchFocus {
    pub fn input_id(&self) -> &'static str {
        match self {
            SearchFocus::Coins => ids::SEARCH_COIN,
            SearchFocus::Exchanges => ids::SEARCH_EXCHANGE,
        }
    }

    pub fn table_id(&self) -> &'static str {
        match self {
            SearchFocus::Coins => ids::COIN_TABLE,
            SearchFocus::Exchanges => ids::EXCHANGE_TABLE,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SearchFocus::Coins => SearchFocus::Exchanges,
            SearchFocus::Exchanges => SearchFocus::Coins,
        }
    }
}

/// Terminal-only view state: focus and table scroll offsets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub focus: SearchFocus,
    pub coin_scroll: usize,
    pub exchange_scroll: usize,
}

impl UiState {
    pub fn scroll(&self, focus: SearchFocus) -> usize {
        match focus {
            SearchFocus::Coins => self.coin_scroll,
            SearchFocus::Exchanges => self.exchange_scroll,
        }
    }

    fn scroll_mut(&mut self) -> &mut usize {
        match self.focus {
            SearchFocus::Coins => &mut self.coin_scroll,
            SearchFocus::Exchanges => &mut self.exchange_scroll,
        }
    }

    /// Scroll the focused table down, never past its last of `row_count` rows
    pub fn scroll_down(&mut self, row_count: usize) {
        let scroll = self.scroll_mut();
        *scroll = (*scroll + 1).min(row_count.saturating_sub(1));
    }

    pub fn scroll_up(&mut self) {
        let scroll = self.scroll_mut();
        *scroll = scroll.saturating_sub(1);
    }

    /// Back to the top of the focused table, eg/ after its rows were re-filtered
    pub fn reset_scroll(&mut self) {
        *self.scroll_mut() = 0;
    }
}

/// Render the whole dashboard
pub fn render_dashboard(f: &mut Frame, page: &Page, dashboard: &Dashboard, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(14),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], page);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_chart(f, charts[0], page, ChartSlot::CoinsByPrice, "TOP 10 COINS BY PRICE");
    render_chart(
        f,
        charts[1],
        page,
        ChartSlot::ExchangesByVolume,
        "TOP 10 EXCHANGES BY VOLUME",
    );

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    render_table_panel::<CoinRecord>(f, tables[0], page, ui, SearchFocus::Coins, "COINS");
    render_table_panel::<ExchangeRecord>(f, tables[1], page, ui, SearchFocus::Exchanges, "EXCHANGES");

    render_footer(f, chunks[3], page, dashboard);
}

fn render_header(f: &mut Frame, area: Rect, page: &Page) {
    let loading = page.spinner_visible(ids::SPIN_COINS).unwrap_or(false)
        || page.spinner_visible(ids::SPIN_EXCHANGES).unwrap_or(false);
    let (status, status_color) = if loading {
        ("LOADING", C_HEADER)
    } else {
        ("IDLE", C_POSITIVE)
    };

    let stat = |id: &str| {
        page.stat(id)
            .map(|stat| stat.value.clone())
            .unwrap_or_else(|| "--".to_string())
    };
    let caption = page
        .stat(ids::MOST_EXPENSIVE_COIN)
        .and_then(|stat| stat.caption.clone())
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled("Exchanges ", Style::default().fg(C_DIM)),
        Span::styled(
            stat(ids::TOTAL_EXCHANGES),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Avg price ", Style::default().fg(C_DIM)),
        Span::styled(
            stat(ids::AVG_PRICE),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Most expensive ", Style::default().fg(C_DIM)),
        Span::styled(
            stat(ids::MOST_EXPENSIVE_COIN),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {caption}"), Style::default().fg(C_DIM)),
        Span::raw("   "),
        Span::styled(format!("[{status}]"), Style::default().fg(status_color)),
    ]);

    let block = Block::default()
        .title(" COINLORE MARKET DASHBOARD ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_chart(f: &mut Frame, area: Rect, page: &Page, slot: ChartSlot, title: &str) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(spec) = page.chart(slot.canvas_id()).filter(|spec| !spec.is_empty()) else {
        f.render_widget(
            Paragraph::new(Span::styled("No data", Style::default().fg(C_DIM))),
            inner,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(spec.dataset_label.as_str(), Style::default().fg(C_DIM))),
        rows[0],
    );

    let bars = chart_bars(spec);
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(BAR_RESOLUTION);
    f.render_widget(chart, rows[1]);

    f.render_widget(
        Paragraph::new(Span::styled(
            tick_line(spec, rows[2].width as usize),
            Style::default().fg(C_DIM),
        )),
        rows[2],
    );
}

fn chart_bars(spec: &BarChartSpec) -> Vec<Bar<'static>> {
    let max = spec.max_value();

    spec.labels
        .iter()
        .zip(&spec.values)
        .enumerate()
        .map(|(index, (label, value))| {
            let fill = spec
                .fill_colors
                .get(index)
                .map(|hex| blend_over(hex, C_BACKGROUND))
                .unwrap_or(C_DIM);
            let border = spec
                .border_colors
                .get(index)
                .map(|hex| blend_over(hex, C_BACKGROUND))
                .unwrap_or(C_BRIGHT);

            let text = value
                .map(|value| spec.format_tick(value))
                .unwrap_or_else(|| "--".to_string());

            Bar::default()
                .label(Line::from(label.clone()))
                .value(scale_bar(value.unwrap_or(0.0), max))
                .text_value(text)
                .style(Style::default().fg(fill))
                .value_style(Style::default().fg(Color::Black).bg(border))
        })
        .collect()
}

/// Bar length in [0, BAR_RESOLUTION] relative to the largest value
fn scale_bar(value: f64, max: f64) -> u64 {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max).min(1.0) * BAR_RESOLUTION as f64).round() as u64
}

/// Value axis ticks at 0, half of the max and the max, spread over `width` columns
pub fn tick_line(spec: &BarChartSpec, width: usize) -> String {
    let max = spec.max_value();
    let low = spec.format_tick(0.0);
    let mid = spec.format_tick(max / 2.0);
    let high = spec.format_tick(max);

    let used = low.chars().count() + mid.chars().count() + high.chars().count();
    if width < used + 2 {
        return format!("{low} {high}");
    }

    let gap = width - used;
    let left = gap / 2;
    let right = gap - left;
    format!("{low}{}{mid}{}{high}", " ".repeat(left), " ".repeat(right))
}

/// Terminal colour of a "#rrggbb[aa]" colour drawn over `background`
pub fn blend_over(hex: &str, background: (u8, u8, u8)) -> Color {
    let Some((r, g, b, a)) = parse_hex_color(hex) else {
        return C_DIM;
    };

    let alpha = a as f64 / 255.0;
    let mix = |fg: u8, bg: u8| (fg as f64 * alpha + bg as f64 * (1.0 - alpha)).round() as u8;
    Color::Rgb(
        mix(r, background.0),
        mix(g, background.1),
        mix(b, background.2),
    )
}

fn render_table_panel<R>(
    f: &mut Frame,
    area: Rect,
    page: &Page,
    ui: &UiState,
    focus: SearchFocus,
    title: &str,
) where
    R: Tabular,
{
    let focused = ui.focus == focus;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let query = page.input_value(focus.input_id()).unwrap_or_default();
    let input = Paragraph::new(Line::from(vec![
        Span::styled(query.to_string(), Style::default().fg(C_BRIGHT)),
        Span::styled(if focused { "▏" } else { "" }, Style::default().fg(C_HEADER)),
    ]))
    .block(
        Block::default()
            .title(format!(" Search {} ", title.to_lowercase()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { C_HEADER } else { C_DIM })),
    );
    f.render_widget(input, chunks[0]);

    let rows = page.rows(focus.table_id()).unwrap_or_default();
    let header = Row::new(R::HEADERS.iter().map(|header| {
        Cell::from(*header).style(Style::default().fg(C_HEADER).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let table = Table::new(
        rows.iter().skip(ui.scroll(focus)).map(table_row),
        column_widths(R::HEADERS.len()),
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(" {title} ({}) ", rows.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_ACCENT)),
    );

    f.render_widget(table, chunks[1]);
}

fn table_row(row: &TableRow) -> Row<'static> {
    Row::new(row.cells.iter().map(|cell| {
        let color = match cell.tone {
            CellTone::Plain => C_BRIGHT,
            CellTone::Positive => C_POSITIVE,
            CellTone::Negative => C_NEGATIVE,
            CellTone::Neutral => C_DIM,
        };
        Cell::from(cell.text.clone()).style(Style::default().fg(color))
    }))
    .height(1)
}

fn column_widths(columns: usize) -> Vec<Constraint> {
    (0..columns)
        .map(|column| match column {
            0 => Constraint::Length(4),
            1 => Constraint::Min(12),
            _ => Constraint::Length(14),
        })
        .collect()
}

fn render_footer(f: &mut Frame, area: Rect, page: &Page, dashboard: &Dashboard) {
    let mut spans = Vec::new();

    if let Some(banner) = page.banner(ids::STATUS_BANNER) {
        spans.push(Span::styled(
            banner.to_string(),
            Style::default().fg(C_NEGATIVE).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("   "));
    }

    let refreshed = dashboard
        .last_refreshed()
        .map(|time| time.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    spans.push(Span::styled(
        format!("Last refresh {refreshed}"),
        Style::default().fg(C_DIM),
    ));
    spans.push(Span::styled(
        "   Esc quit | Tab switch search | F5/Ctrl-R reload | ↑↓ scroll",
        Style::default().fg(C_DIM),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
