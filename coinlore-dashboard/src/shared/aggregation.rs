/// Aggregation functions over fetched coin and exchange collections
///
/// All functions are total: malformed numeric fields are excluded or ranked last, never raised.
use coinlore_data::{CoinRecord, ExchangeRecord};
use std::{borrow::Cow, cmp::Ordering};

/// Length of the ranked subsets shown in the charts
pub const TOP_N: usize = 10;

/// Number of records, unfiltered
pub fn count_all<T>(records: &[T]) -> usize {
    records.len()
}

/// Arithmetic mean of valid, strictly positive `price_usd` values
///
/// Returns 0.0 when no coin has a usable price.
pub fn average_price(coins: &[CoinRecord]) -> f64 {
    let (sum, count) = coins
        .iter()
        .filter_map(|coin| coin.price_usd.positive())
        .fold((0.0, 0usize), |(sum, count), price| (sum + price, count + 1));

    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}

/// Coin with the highest `price_usd`
///
/// Folds in input order starting from [`CoinRecord::sentinel`], so the first of several equally
/// priced coins wins and an empty (or entirely unpriced) input yields the sentinel.
pub fn most_expensive(coins: &[CoinRecord]) -> Cow<'_, CoinRecord> {
    coins
        .iter()
        .fold(Cow::Owned(CoinRecord::sentinel()), |max, current| {
            match current.price_usd.value() {
                Some(price) if price > max.price_usd.or_zero() => Cow::Borrowed(current),
                _ => max,
            }
        })
}

/// First `n` records by descending `key`
///
/// Stable: ties keep their input order. Records whose key is `None` rank after every valid key.
pub fn top_n_by<T, F>(records: &[T], n: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> Option<f64>,
{
    let mut ranked: Vec<(f64, &T)> = records
        .iter()
        .map(|record| (key(record).unwrap_or(f64::NEG_INFINITY), record))
        .collect();

    // sort_by is stable
    ranked.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    ranked.into_iter().take(n).map(|(_, record)| record).collect()
}

/// Top `n` coins by `price_usd`
pub fn top_coins_by_price(coins: &[CoinRecord], n: usize) -> Vec<&CoinRecord> {
    top_n_by(coins, n, |coin| coin.price_usd.value())
}

/// Top `n` exchanges by `volume_usd`, considering only named exchanges with positive volume
pub fn top_exchanges_by_volume(exchanges: &[ExchangeRecord], n: usize) -> Vec<&ExchangeRecord> {
    let mut ranked: Vec<(f64, &ExchangeRecord)> = exchanges
        .iter()
        .filter(|exchange| exchange.has_usable_name())
        .filter_map(|exchange| exchange.volume_usd.positive().map(|volume| (volume, exchange)))
        .collect();

    ranked.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    ranked.into_iter().take(n).map(|(_, record)| record).collect()
}

/// Every view derived from one refresh cycle's collections
///
/// Borrowed from the collections it was computed from; recomputed, never updated.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews<'a> {
    pub total_exchange_count: usize,
    pub average_coin_price: f64,
    pub most_expensive_coin: Cow<'a, CoinRecord>,
    pub top_coins_by_price: Vec<&'a CoinRecord>,
    pub top_exchanges_by_volume: Vec<&'a ExchangeRecord>,
}

impl<'a> DerivedViews<'a> {
    pub fn compute(coins: &'a [CoinRecord], exchanges: &'a [ExchangeRecord]) -> Self {
        Self {
            total_exchange_count: count_all(exchanges),
            average_coin_price: average_price(coins),
            most_expensive_coin: most_expensive(coins),
            top_coins_by_price: top_coins_by_price(coins, TOP_N),
            top_exchanges_by_volume: top_exchanges_by_volume(exchanges, TOP_N),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinlore_data::Numeric;

    fn coin_with_raw_price(raw: &str) -> CoinRecord {
        CoinRecord::new("coin", raw, Numeric::parse(raw))
    }

    #[test]
    fn test_average_price_ignores_unusable_prices() {
        let coins = vec![
            coin_with_raw_price("10"),
            coin_with_raw_price("-5"),
            coin_with_raw_price("abc"),
        ];
        assert_eq!(average_price(&coins), 10.0);
    }

    #[test]
    fn test_average_price_empty() {
        assert_eq!(average_price(&[]), 0.0);
        assert_eq!(average_price(&[coin_with_raw_price("0")]), 0.0);
    }

    #[test]
    fn test_most_expensive_empty_is_sentinel() {
        let actual = most_expensive(&[]);
        assert_eq!(actual.name, "N/A");
        assert_eq!(actual.symbol, "");
        assert_eq!(actual.price_usd.value(), Some(0.0));
    }

    #[test]
    fn test_most_expensive_first_wins_on_tie() {
        let coins = vec![
            CoinRecord::new("Cheap", "CHP", 1.0),
            CoinRecord::new("First", "AAA", 100.0),
            CoinRecord::new("Second", "BBB", 100.0),
            CoinRecord::new("Broken", "BRK", Numeric::INVALID),
        ];

        let actual = most_expensive(&coins);

        assert_eq!(actual.name, "First");
        assert!(matches!(actual, Cow::Borrowed(_)));
    }

    #[test]
    fn test_most_expensive_unpriced_is_sentinel() {
        let coins = vec![
            CoinRecord::new("Zero", "ZRO", 0.0),
            CoinRecord::new("Broken", "BRK", Numeric::INVALID),
        ];
        assert_eq!(most_expensive(&coins).into_owned(), CoinRecord::sentinel());
    }

    #[test]
    fn test_top_coins_stable_descending() {
        let coins = vec![
            CoinRecord::new("A", "A", 5.0),
            CoinRecord::new("Broken", "X", Numeric::INVALID),
            CoinRecord::new("B", "B", 7.0),
            CoinRecord::new("C", "C", 5.0),
        ];

        let actual: Vec<&str> = top_coins_by_price(&coins, TOP_N)
            .into_iter()
            .map(|coin| coin.symbol.as_str())
            .collect();

        assert_eq!(actual, vec!["B", "A", "C", "X"]);
    }

    #[test]
    fn test_top_coins_caps_at_top_n() {
        let coins: Vec<CoinRecord> = (0..15)
            .map(|i| CoinRecord::new(format!("Coin{i}"), format!("C{i}"), i as f64))
            .collect();

        let actual = top_coins_by_price(&coins, TOP_N);

        assert_eq!(actual.len(), TOP_N);
        assert_eq!(actual[0].symbol, "C14");
        assert_eq!(actual[9].symbol, "C5");
        assert!(actual
            .windows(2)
            .all(|pair| pair[0].price_usd.or_zero() >= pair[1].price_usd.or_zero()));
    }

    #[test]
    fn test_top_exchanges_filters_and_caps() {
        let mut exchanges: Vec<ExchangeRecord> = (0..12)
            .map(|i| ExchangeRecord::new(format!("Ex{i}"), (i + 1) as f64 * 10.0))
            .collect();
        exchanges.push(ExchangeRecord::new("", 1_000_000.0));
        exchanges.push(ExchangeRecord::new("Zero", 0.0));
        exchanges.push(ExchangeRecord::new("Negative", -5.0));
        exchanges.push(ExchangeRecord::new("Broken", Numeric::INVALID));

        let actual = top_exchanges_by_volume(&exchanges, TOP_N);

        assert_eq!(actual.len(), 10);
        assert_eq!(actual[0].name, "Ex11");
        assert_eq!(actual[9].name, "Ex2");
        assert!(actual.iter().all(|exchange| exchange.has_usable_name()));
    }

    #[test]
    fn test_top_exchanges_fewer_than_n() {
        let exchanges = vec![
            ExchangeRecord::new("Low", 1.0),
            ExchangeRecord::new("High", 300.0),
            ExchangeRecord::new("", 500.0),
            ExchangeRecord::new("Mid", 20.0),
        ];

        let actual: Vec<&str> = top_exchanges_by_volume(&exchanges, TOP_N)
            .into_iter()
            .map(|exchange| exchange.name.as_str())
            .collect();

        assert_eq!(actual, vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_derived_views() {
        let coins = vec![
            CoinRecord::new("Bitcoin", "BTC", 50000.0),
            CoinRecord::new("Ether", "ETH", 3000.0),
        ];
        let exchanges = vec![ExchangeRecord::new("ExA", 100.0)
            .with_pair("BTC/USD")
            .with_price(50000.0)];

        let views = DerivedViews::compute(&coins, &exchanges);

        assert_eq!(views.total_exchange_count, 1);
        assert_eq!(views.average_coin_price, 26500.0);
        assert_eq!(views.most_expensive_coin.name, "Bitcoin");
        assert_eq!(
            views
                .top_coins_by_price
                .iter()
                .map(|coin| coin.symbol.as_str())
                .collect::<Vec<_>>(),
            vec!["BTC", "ETH"]
        );
        assert_eq!(views.top_exchanges_by_volume.len(), 1);
    }
}
