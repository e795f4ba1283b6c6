#![forbid(unsafe_code)]

//! # Coinlore-Data
//! Typed integration with the public Coinlore REST API.
//!
//! Provides:
//! - [`CoinRecord`] and [`ExchangeRecord`] market snapshots, decoded leniently so that a single
//!   malformed numeric field never rejects a whole payload.
//! - [`Numeric`], the parse-or-default value every numeric field is ingested as.
//! - [`MarketFetcher`], the async fetch seam, and [`CoinloreClient`], its `reqwest` implementation.
//!
//! ## Example
//! ```rust,no_run
//! use coinlore_data::{ClientConfig, CoinloreClient, MarketFetcher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = CoinloreClient::new(ClientConfig::default()).unwrap();
//!     let coins = client.fetch_coins().await.unwrap();
//!     println!("fetched {} coins", coins.len());
//! }
//! ```

/// [`MarketFetcher`] trait, [`ClientConfig`] and the `reqwest` based [`CoinloreClient`].
pub mod client;

/// All errors generated in `coinlore-data`.
pub mod error;

/// Coin and exchange record definitions.
pub mod model;

/// Parse-or-default numeric field.
pub mod numeric;

pub use client::{ClientConfig, CoinloreClient, MarketFetcher};
pub use error::FetchError;
pub use model::{CoinRecord, ExchangeRecord, TickerInfo, TickerList};
pub use numeric::Numeric;
