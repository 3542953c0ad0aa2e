//! Fixed-width histogram binning over a source's working set.

use crate::aggregator::color::color_for_source;
use crate::aggregator::HistogramSeries;
use crate::parser::schema::{NormalizedEvent, TimeBin};
use crate::parser::timestamp::format_epoch;
use crate::store::EventSource;
use crate::utils::config::{HISTOGRAM_BIN_WIDTH_SECS, MAX_BIN_SAMPLES};
use log::debug;

/// Bin one source's working set; `None` when it has no timestamped events
/// (the source is skipped, not rendered empty).
pub fn histogram_series(source: &EventSource) -> Option<HistogramSeries> {
    let bins = build_bins(source.working())?;
    debug!(
        "Histogram for '{}': {} bins over {} events",
        source.name,
        bins.len(),
        source.working().len()
    );
    Some(HistogramSeries {
        source: source.name.clone(),
        color: color_for_source(&source.name),
        bins,
    })
}

/// Compute fixed-width bins over the timestamped events of a sequence.
///
/// `num_bins = ceil((max - min) / width)` with a floor of one bin when all
/// events share a single instant. Bins are half-open `[edge_i, edge_i+1)`;
/// an event landing exactly on the final edge counts in the last bin, so
/// bin counts always sum to the number of timestamped events.
pub(crate) fn build_bins(events: &[NormalizedEvent]) -> Option<Vec<TimeBin>> {
    let timed: Vec<(f64, &NormalizedEvent)> = events
        .iter()
        .filter_map(|ev| ev.timestamp_epoch.map(|ts| (ts, ev)))
        .collect();
    let (min_ts, max_ts) = timed.iter().fold(None, |acc: Option<(f64, f64)>, (ts, _)| {
        Some(match acc {
            Some((min, max)) => (min.min(*ts), max.max(*ts)),
            None => (*ts, *ts),
        })
    })?;

    let width = HISTOGRAM_BIN_WIDTH_SECS;
    let num_bins = (((max_ts - min_ts) / width).ceil() as usize).max(1);

    let mut bins: Vec<TimeBin> = (0..num_bins)
        .map(|i| TimeBin {
            start: min_ts + i as f64 * width,
            end: min_ts + (i + 1) as f64 * width,
            count: 0,
            samples: Vec::new(),
        })
        .collect();

    for (ts, ev) in timed {
        let index = (((ts - min_ts) / width) as usize).min(num_bins - 1);
        let bin = &mut bins[index];
        bin.count += 1;
        if bin.samples.len() < MAX_BIN_SAMPLES {
            bin.samples.push(sample_label(ts, ev));
        }
    }

    Some(bins)
}

/// Short hover string for one event inside a bin.
fn sample_label(ts: f64, ev: &NormalizedEvent) -> String {
    if ev.timestamp_text.is_empty() {
        format_epoch(ts)
    } else {
        ev.timestamp_text.clone()
    }
}
