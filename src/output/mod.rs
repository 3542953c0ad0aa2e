//! Output writers for aggregated series.

pub mod json;

pub use json::write_series;
