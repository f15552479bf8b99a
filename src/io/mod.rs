//! Log file ingestion.

pub mod parser;
pub mod series;

pub use series::EstimateSeries;
