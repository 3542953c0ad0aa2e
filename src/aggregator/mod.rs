//! Aggregation of normalized events into renderable series.
//!
//! Both modes run per source, independently, over the current working
//! set of every source in the store, and tag each output series with its
//! deterministic color so the rendering collaborator keeps hues stable.

pub mod color;
pub mod histogram;
pub mod scatter;

use crate::parser::schema::{ScatterPoint, TimeBin};
use crate::store::TimelineStore;
use serde::Serialize;

// Re-export main types and functions
pub use color::{color_for_source, Rgb};
pub use histogram::histogram_series;
pub use scatter::scatter_series;

/// Which series computation to run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregationMode {
    Histogram,
    Scatter { threshold: f64 },
}

/// Time-bucketed counts for one source.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramSeries {
    pub source: String,
    pub color: Rgb,
    pub bins: Vec<TimeBin>,
}

/// Threshold-filtered duration samples for one source.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterSeries {
    pub source: String,
    pub color: Rgb,
    pub points: Vec<ScatterPoint>,
}

/// One output series, handed to the rendering collaborator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SourceSeries {
    Histogram(HistogramSeries),
    Scatter(ScatterSeries),
}

/// Compute one series per source with events in its working set.
///
/// Sources whose working set yields nothing (empty, untimestamped, or
/// fully below the scatter threshold) are skipped.
pub fn aggregate(store: &TimelineStore, mode: AggregationMode) -> Vec<SourceSeries> {
    store
        .sources()
        .filter_map(|source| match mode {
            AggregationMode::Histogram => {
                histogram_series(source).map(SourceSeries::Histogram)
            }
            AggregationMode::Scatter { threshold } => {
                scatter_series(source, threshold).map(SourceSeries::Scatter)
            }
        })
        .collect()
}
