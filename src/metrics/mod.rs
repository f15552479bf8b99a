//! Differencing and aggregate statistics over aligned series.

pub mod difference;
pub mod summary;

pub use difference::{DiffSample, DiffSummary, SeriesDiff};
pub use summary::ErrorStats;
