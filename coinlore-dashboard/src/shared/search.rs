//! Live search over the dataset snapshot of the latest refresh

use super::{
    table::{render_table, Tabular},
    target::RenderTarget,
};
use coinlore_data::{CoinRecord, ExchangeRecord};
use std::sync::Arc;
use tracing::debug;

/// Record that can be matched against a search query
pub trait Searchable {
    /// Text fields the query is matched against
    fn search_fields(&self) -> [Option<&str>; 2];

    /// Case-insensitive substring match on any search field; an empty query matches everything
    ///
    /// `query` must already be normalised with [`normalise_query`].
    fn matches(&self, query: &str) -> bool {
        query.is_empty()
            || self
                .search_fields()
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(query))
    }
}

impl Searchable for CoinRecord {
    fn search_fields(&self) -> [Option<&str>; 2] {
        [Some(&self.name), Some(&self.symbol)]
    }
}

impl Searchable for ExchangeRecord {
    fn search_fields(&self) -> [Option<&str>; 2] {
        [Some(&self.name), self.pair.as_deref()]
    }
}

/// Lower-case and trim a raw input value
pub fn normalise_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Records of `dataset` matching the raw `query`, in dataset order
pub fn filter_records<'a, R>(dataset: &'a [R], query: &str) -> Vec<&'a R>
where
    R: Searchable,
{
    let query = normalise_query(query);
    dataset.iter().filter(|record| record.matches(&query)).collect()
}

/// Search handler bound to one input field
///
/// Holds the one active binding of its input: [`SearchController::rebind`] swaps the dataset
/// snapshot in place, so handlers never stack and an old snapshot is simply dropped.
#[derive(Debug)]
pub struct SearchController<R> {
    input_id: &'static str,
    target_id: &'static str,
    dataset: Option<Arc<[R]>>,
    generation: u64,
}

impl<R> SearchController<R>
where
    R: Searchable + Tabular,
{
    /// Unbound controller; keystrokes are ignored until the first [`SearchController::rebind`]
    pub fn new(input_id: &'static str, target_id: &'static str) -> Self {
        Self {
            input_id,
            target_id,
            dataset: None,
            generation: 0,
        }
    }

    /// Replace the bound dataset snapshot
    pub fn rebind(&mut self, dataset: Arc<[R]>) {
        self.dataset = Some(dataset);
        self.generation += 1;
        debug!(
            input_id = self.input_id,
            generation = self.generation,
            "search handler rebound"
        );
    }

    pub fn is_bound(&self) -> bool {
        self.dataset.is_some()
    }

    /// Number of times this input has been (re)bound
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dataset(&self) -> Option<&Arc<[R]>> {
        self.dataset.as_ref()
    }

    /// Handle a keystroke: filter the bound snapshot by `raw_query` and re-render the target table
    ///
    /// Returns `false` if unbound or if the target table is missing.
    pub fn on_input<T>(&self, raw_query: &str, target: &mut T) -> bool
    where
        T: RenderTarget + ?Sized,
    {
        let Some(dataset) = &self.dataset else {
            return false;
        };

        let filtered = filter_records(dataset, raw_query);
        debug!(
            input_id = self.input_id,
            query = raw_query,
            matches = filtered.len(),
            total = dataset.len(),
            "search re-filter"
        );
        render_table(filtered, self.target_id, target)
    }
}
