use crate::numeric::Numeric;
use serde::{Deserialize, Deserializer, Serialize};

/// Coinlore ticker list envelope returned by `GET /api/tickers/`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TickerList {
    pub data: Vec<CoinRecord>,
    #[serde(default)]
    pub info: Option<TickerInfo>,
}

/// Metadata accompanying a [`TickerList`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TickerInfo {
    /// Total number of coins tracked by Coinlore (not the page size).
    #[serde(default)]
    pub coins_num: Option<u64>,
    /// Unix timestamp (seconds) of the snapshot.
    #[serde(default)]
    pub time: Option<i64>,
}

/// One cryptocurrency's market snapshot.
///
/// ### Raw Payload Example
/// ```json
/// {
///     "id": "90",
///     "symbol": "BTC",
///     "name": "Bitcoin",
///     "price_usd": "50000.12",
///     "percent_change_24h": "-1.27",
///     "price_btc": "1.00"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CoinRecord {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub symbol: String,
    #[serde(default)]
    pub price_usd: Numeric,
    #[serde(default)]
    pub percent_change_24h: Numeric,
    #[serde(default)]
    pub price_btc: Numeric,
}

impl CoinRecord {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, price_usd: impl Into<Numeric>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            price_usd: price_usd.into(),
            percent_change_24h: Numeric::INVALID,
            price_btc: Numeric::INVALID,
        }
    }

    /// Placeholder returned when there is no most expensive coin to report.
    pub fn sentinel() -> Self {
        Self::new("N/A", "", 0.0)
    }

    pub fn with_change_24h(mut self, percent: impl Into<Numeric>) -> Self {
        self.percent_change_24h = percent.into();
        self
    }

    pub fn with_price_btc(mut self, price_btc: impl Into<Numeric>) -> Self {
        self.price_btc = price_btc.into();
        self
    }
}

/// One trading venue's market for the configured coin, as returned by
/// `GET /api/coin/markets/?id=<coin>`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExchangeRecord {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub name: String,
    /// Trading pair, eg/ "BTC/USDT". Blank values are treated as absent.
    #[serde(default, deserialize_with = "de_optional_string")]
    pub pair: Option<String>,
    #[serde(default)]
    pub volume_usd: Numeric,
    #[serde(default)]
    pub price: Numeric,
}

impl ExchangeRecord {
    pub fn new(name: impl Into<String>, volume_usd: impl Into<Numeric>) -> Self {
        Self {
            name: name.into(),
            pair: None,
            volume_usd: volume_usd.into(),
            price: Numeric::INVALID,
        }
    }

    pub fn with_pair(mut self, pair: impl Into<String>) -> Self {
        let pair = pair.into();
        self.pair = (!pair.trim().is_empty()).then_some(pair);
        self
    }

    pub fn with_price(mut self, price: impl Into<Numeric>) -> Self {
        self.price = price.into();
        self
    }

    /// Determine if this record carries a name that can be displayed and ranked.
    pub fn has_usable_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Textual field that tolerates `null` and bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientText {
    Text(String),
    Integer(i64),
    Float(f64),
    Other(serde::de::IgnoredAny),
}

impl LenientText {
    fn into_string(self) -> String {
        match self {
            LenientText::Text(text) => text,
            LenientText::Integer(value) => value.to_string(),
            LenientText::Float(value) => value.to_string(),
            LenientText::Other(_) => String::new(),
        }
    }
}

fn de_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<LenientText>::deserialize(deserializer)
        .map(|text| text.map(LenientText::into_string).unwrap_or_default())
}

fn de_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    de_lenient_string(deserializer).map(|text| (!text.trim().is_empty()).then_some(text))
}
