//! Table renderer: records → render-ready rows

use super::{
    format::{format_currency, format_usd, PLACEHOLDER},
    target::RenderTarget,
};
use coinlore_data::{CoinRecord, ExchangeRecord};
use tracing::warn;

/// Colouring hint for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellTone {
    #[default]
    Plain,
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: CellTone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: CellTone::Plain,
        }
    }

    pub fn toned(text: impl Into<String>, tone: CellTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

impl TableRow {
    /// Cell texts, eg/ for assertions and plain-text export
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|cell| cell.text.as_str()).collect()
    }
}

/// Record kinds the dashboard tabulates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Coin,
    Exchange,
}

/// Record that can be rendered as one table row
pub trait Tabular {
    const KIND: RecordKind;

    /// Column headers, matching the cells produced by [`Tabular::cells`]
    const HEADERS: &'static [&'static str];

    /// Cells for this record at 1-based display `rank`
    fn cells(&self, rank: usize) -> Vec<Cell>;
}

impl Tabular for CoinRecord {
    const KIND: RecordKind = RecordKind::Coin;
    const HEADERS: &'static [&'static str] =
        &["#", "Name", "Symbol", "Price (USD)", "24h %", "Price (BTC)"];

    fn cells(&self, rank: usize) -> Vec<Cell> {
        let change = match self.percent_change_24h.non_zero() {
            Some(change) if change > 0.0 => Cell::toned(format!("{change:.2}%"), CellTone::Positive),
            Some(change) => Cell::toned(format!("{change:.2}%"), CellTone::Negative),
            None => Cell::toned(PLACEHOLDER, CellTone::Neutral),
        };

        let price_btc = self
            .price_btc
            .non_zero()
            .map(|price| format!("{price:.8}"))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        vec![
            Cell::plain(rank.to_string()),
            Cell::plain(self.name.clone()),
            Cell::plain(self.symbol.clone()),
            Cell::plain(format_currency(self.price_usd.value(), 4)),
            change,
            Cell::plain(price_btc),
        ]
    }
}

impl Tabular for ExchangeRecord {
    const KIND: RecordKind = RecordKind::Exchange;
    const HEADERS: &'static [&'static str] = &["#", "Exchange", "Pair", "Volume (USD)", "Price (USD)"];

    fn cells(&self, rank: usize) -> Vec<Cell> {
        vec![
            Cell::plain(rank.to_string()),
            Cell::plain(self.name.clone()),
            Cell::plain(self.pair.as_deref().unwrap_or(PLACEHOLDER)),
            Cell::plain(format_usd(self.volume_usd.value())),
            Cell::plain(format_currency(self.price.value(), 4)),
        ]
    }
}

/// Rows for `records` in input order, ranked from 1
pub fn table_rows<'a, R>(records: impl IntoIterator<Item = &'a R>) -> Vec<TableRow>
where
    R: Tabular + 'a,
{
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| TableRow {
            cells: record.cells(index + 1),
        })
        .collect()
}

/// Replace the rows of table body `target_id` with `records`
///
/// Full replace, so rendering the same input twice leaves the same rows. Returns `false` if the
/// target has no such table.
pub fn render_table<'a, R, T>(
    records: impl IntoIterator<Item = &'a R>,
    target_id: &str,
    target: &mut T,
) -> bool
where
    R: Tabular + 'a,
    T: RenderTarget + ?Sized,
{
    let rendered = target.replace_rows(target_id, table_rows(records));
    if !rendered {
        warn!(target_id, kind = ?R::KIND, "table target missing, skipping render");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{page::Page, target::ids};
    use coinlore_data::Numeric;

    #[test]
    fn test_coin_cells() {
        let coin = CoinRecord::new("Bitcoin", "BTC", 50000.0)
            .with_change_24h(2.345)
            .with_price_btc(1.0);

        let actual = coin.cells(1);

        assert_eq!(
            TableRow { cells: actual.clone() }.texts(),
            vec!["1", "Bitcoin", "BTC", "$50.00K", "2.35%", "1.00000000"]
        );
        assert_eq!(actual[4].tone, CellTone::Positive);
    }

    #[test]
    fn test_coin_cells_placeholders() {
        struct TestCase {
            coin: CoinRecord,
            expected_change: (&'static str, CellTone),
            expected_btc: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: negative change
                coin: CoinRecord::new("Doge", "DOGE", 0.08)
                    .with_change_24h(-3.1)
                    .with_price_btc(0.0000016),
                expected_change: ("-3.10%", CellTone::Negative),
                expected_btc: "0.00000160",
            },
            TestCase {
                // TC1: zero change and zero BTC price are placeholders
                coin: CoinRecord::new("Flat", "FLT", 1.0)
                    .with_change_24h(0.0)
                    .with_price_btc(0.0),
                expected_change: ("—", CellTone::Neutral),
                expected_btc: "—",
            },
            TestCase {
                // TC2: missing fields are placeholders
                coin: CoinRecord::new("Broken", "BRK", Numeric::INVALID),
                expected_change: ("—", CellTone::Neutral),
                expected_btc: "—",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let cells = test.coin.cells(1);
            assert_eq!(
                (cells[4].text.as_str(), cells[4].tone),
                test.expected_change,
                "TC{} failed",
                index
            );
            assert_eq!(cells[5].text, test.expected_btc, "TC{} failed", index);
        }

        let broken = CoinRecord::new("Broken", "BRK", Numeric::INVALID).cells(1);
        assert_eq!(broken[3].text, "—");
    }

    #[test]
    fn test_exchange_cells() {
        let with_pair = ExchangeRecord::new("ExA", 1_500_000_000.0)
            .with_pair("BTC/USD")
            .with_price(0.5);
        let without_pair = ExchangeRecord::new("ExB", 100.0);

        assert_eq!(
            TableRow { cells: with_pair.cells(3) }.texts(),
            vec!["3", "ExA", "BTC/USD", "$1.50B", "$0.5000"]
        );
        assert_eq!(
            TableRow { cells: without_pair.cells(4) }.texts(),
            vec!["4", "ExB", "—", "$100.00", "—"]
        );
    }

    #[test]
    fn test_headers_match_cells() {
        let coin = CoinRecord::new("Bitcoin", "BTC", 1.0);
        let exchange = ExchangeRecord::new("ExA", 1.0);
        assert_eq!(coin.cells(1).len(), CoinRecord::HEADERS.len());
        assert_eq!(exchange.cells(1).len(), ExchangeRecord::HEADERS.len());
    }

    #[test]
    fn test_render_table_is_idempotent() {
        let coins = vec![
            CoinRecord::new("Bitcoin", "BTC", 50000.0),
            CoinRecord::new("Ether", "ETH", 3000.0),
        ];
        let mut page = Page::standard();

        assert!(render_table(&coins, ids::COIN_TABLE, &mut page));
        let once = page.rows(ids::COIN_TABLE).unwrap().to_vec();

        assert!(render_table(&coins, ids::COIN_TABLE, &mut page));
        let twice = page.rows(ids::COIN_TABLE).unwrap().to_vec();

        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_render_table_missing_target_is_noop() {
        let coins = vec![CoinRecord::new("Bitcoin", "BTC", 50000.0)];
        let mut page = Page::with_elements([ids::EXCHANGE_TABLE]);

        assert!(!render_table(&coins, ids::COIN_TABLE, &mut page));
        assert_eq!(page.rows(ids::EXCHANGE_TABLE), Some(&[][..]));
    }
}
