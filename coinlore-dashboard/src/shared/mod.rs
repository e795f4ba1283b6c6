/// Shared modules for the Coinlore dashboard
pub mod aggregation;
pub mod chart;
pub mod dashboard;
pub mod format;
pub mod page;
pub mod search;
pub mod table;
pub mod target;
